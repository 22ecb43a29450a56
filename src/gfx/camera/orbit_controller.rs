use std::cell::RefCell;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::rc::{Rc, Weak};

use cgmath::{Quaternion, Rad, Rotation, Rotation3, Vector3};

use crate::gfx::scene::{Node, Transform};
use crate::input::{EventKind, InputEvent, InputSurface, PointerId, Subscription};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControllerOptions {
    /// Radians of yaw/pitch per pixel of pointer movement
    pub move_sensitivity: f32,
    /// Exponential zoom rate per wheel pixel
    pub zoom_sensitivity: f32,
    /// Initial distance from the origin
    pub distance: f32,
}

impl Default for OrbitControllerOptions {
    fn default() -> Self {
        Self {
            move_sensitivity: 0.004,
            zoom_sensitivity: 0.002,
            distance: 2.0,
        }
    }
}

struct OrbitState {
    options: OrbitControllerOptions,
    yaw: f32,
    pitch: f32,
    distance: f32,
    dragged_pointer: Option<PointerId>,
    pointer_down: Option<Subscription>,
    pointer_up: Option<Subscription>,
    pointer_move: Option<Subscription>,
    wheel: Option<Subscription>,
}

/// Rotates a node around the origin while the pointer is dragged and moves
/// it closer or further away on wheel input.
///
/// Handles are cheap to clone and share the same state, so one can live in
/// the node's component bag while another drives [`OrbitController::update`].
/// Listeners are removed and a drag in progress is released on
/// [`OrbitController::dispose`] or when the last handle is dropped.
#[derive(Clone)]
pub struct OrbitController {
    state: Rc<RefCell<OrbitState>>,
    surface: InputSurface,
}

impl OrbitController {
    pub fn new(surface: &InputSurface, options: OrbitControllerOptions) -> Self {
        let state = Rc::new(RefCell::new(OrbitState {
            options,
            yaw: 0.0,
            pitch: 0.0,
            distance: options.distance,
            dragged_pointer: None,
            pointer_down: None,
            pointer_up: None,
            pointer_move: None,
            wheel: None,
        }));

        let weak = Rc::downgrade(&state);
        let pointer_down = listen(surface, EventKind::PointerDown, &weak, on_pointer_down);
        let wheel = listen(surface, EventKind::Wheel, &weak, on_wheel);
        {
            let mut state = state.borrow_mut();
            state.pointer_down = Some(pointer_down);
            state.wheel = Some(wheel);
        }

        Self {
            state,
            surface: surface.clone(),
        }
    }

    /// Writes the orbit pose into the node's [`Transform`], if it has one.
    pub fn update(&self, node: &mut Node) {
        let Some(transform) = node.component_mut::<Transform>() else {
            return;
        };
        let state = self.state.borrow();
        let rotation = orbit_rotation(state.yaw, state.pitch);
        transform.rotation = rotation;
        transform.translation = rotation.rotate_vector(Vector3::new(0.0, 0.0, state.distance));
    }

    /// Removes every listener and releases a drag in progress.
    pub fn dispose(&self) {
        let (subscriptions, dragged_pointer) = {
            let mut state = self.state.borrow_mut();
            let subscriptions = [
                state.pointer_down.take(),
                state.pointer_up.take(),
                state.pointer_move.take(),
                state.wheel.take(),
            ];
            (subscriptions, state.dragged_pointer.take())
        };
        drop(subscriptions);

        if let Some(pointer_id) = dragged_pointer {
            end_drag(&self.surface, pointer_id);
        }
    }

    pub fn is_disposed(&self) -> bool {
        let state = self.state.borrow();
        state.pointer_down.is_none() && state.pointer_up.is_none() && state.wheel.is_none()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().dragged_pointer.is_some()
    }

    /// Rotation around the vertical axis, in `[0, 2pi)`.
    pub fn yaw(&self) -> f32 {
        self.state.borrow().yaw
    }

    /// Rotation around the horizontal axis, in `[-pi/2, pi/2]`.
    pub fn pitch(&self) -> f32 {
        self.state.borrow().pitch
    }

    pub fn distance(&self) -> f32 {
        self.state.borrow().distance
    }

    pub fn set_distance(&self, distance: f32) {
        self.state.borrow_mut().distance = distance;
    }

    pub fn options(&self) -> OrbitControllerOptions {
        self.state.borrow().options
    }
}

impl Drop for OrbitController {
    fn drop(&mut self) {
        // listeners only hold weak references, so this is the last handle
        if Rc::strong_count(&self.state) != 1 {
            return;
        }
        let dragged_pointer = match self.state.try_borrow_mut() {
            Ok(mut state) => state.dragged_pointer.take(),
            Err(_) => None,
        };
        if let Some(pointer_id) = dragged_pointer {
            end_drag(&self.surface, pointer_id);
        }
    }
}

impl std::fmt::Debug for OrbitController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("OrbitController")
            .field("yaw", &state.yaw)
            .field("pitch", &state.pitch)
            .field("distance", &state.distance)
            .field("dragged_pointer", &state.dragged_pointer)
            .finish()
    }
}

pub(crate) fn orbit_rotation(yaw: f32, pitch: f32) -> Quaternion<f32> {
    Quaternion::from_angle_y(Rad(yaw)) * Quaternion::from_angle_x(Rad(pitch))
}

/// Applies pointer movement to yaw and pitch, keeping pitch in
/// `[-pi/2, pi/2]` and yaw in `[0, 2pi)`.
pub(crate) fn look(yaw: &mut f32, pitch: &mut f32, dx: f32, dy: f32, sensitivity: f32) {
    *pitch = (*pitch - dy * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    *yaw = (*yaw - dx * sensitivity).rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs
    if *yaw >= TAU {
        *yaw = 0.0;
    }
}

type Handler = fn(&Rc<RefCell<OrbitState>>, &InputEvent, &InputSurface);

fn listen(
    surface: &InputSurface,
    kind: EventKind,
    state: &Weak<RefCell<OrbitState>>,
    handler: Handler,
) -> Subscription {
    let state = Weak::clone(state);
    surface.add_listener(kind, move |event, surface| {
        if let Some(state) = state.upgrade() {
            handler(&state, event, surface);
        }
    })
}

fn on_pointer_down(state: &Rc<RefCell<OrbitState>>, event: &InputEvent, surface: &InputSurface) {
    let InputEvent::PointerDown { pointer_id } = *event else {
        return;
    };

    surface.set_pointer_capture(pointer_id);
    if let Err(err) = surface.request_pointer_lock() {
        log::warn!("orbit controller could not lock the pointer: {err}");
    }

    let weak = Rc::downgrade(state);
    let pointer_up = listen(surface, EventKind::PointerUp, &weak, on_pointer_up);
    let pointer_move = listen(surface, EventKind::PointerMove, &weak, on_pointer_move);
    let pointer_down = {
        let mut state = state.borrow_mut();
        state.dragged_pointer = Some(pointer_id);
        state.pointer_up = Some(pointer_up);
        state.pointer_move = Some(pointer_move);
        state.pointer_down.take()
    };
    drop(pointer_down);
}

fn on_pointer_up(state: &Rc<RefCell<OrbitState>>, event: &InputEvent, surface: &InputSurface) {
    let InputEvent::PointerUp { pointer_id } = *event else {
        return;
    };

    end_drag(surface, pointer_id);

    let weak = Rc::downgrade(state);
    let pointer_down = listen(surface, EventKind::PointerDown, &weak, on_pointer_down);
    let released = {
        let mut state = state.borrow_mut();
        state.dragged_pointer = None;
        state.pointer_down = Some(pointer_down);
        (state.pointer_up.take(), state.pointer_move.take())
    };
    drop(released);
}

fn on_pointer_move(state: &Rc<RefCell<OrbitState>>, event: &InputEvent, _surface: &InputSurface) {
    let InputEvent::PointerMove {
        movement_x,
        movement_y,
    } = *event
    else {
        return;
    };

    let mut state = state.borrow_mut();
    let state = &mut *state;
    let sensitivity = state.options.move_sensitivity;
    look(&mut state.yaw, &mut state.pitch, movement_x, movement_y, sensitivity);
}

fn on_wheel(state: &Rc<RefCell<OrbitState>>, event: &InputEvent, _surface: &InputSurface) {
    let InputEvent::Wheel { delta_y } = *event else {
        return;
    };

    let mut state = state.borrow_mut();
    state.distance *= (state.options.zoom_sensitivity * delta_y).exp();
}

fn end_drag(surface: &InputSurface, pointer_id: PointerId) {
    surface.release_pointer_capture(pointer_id);
    if let Err(err) = surface.exit_pointer_lock() {
        log::warn!("orbit controller could not release the pointer lock: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Rotation};
    use rand::Rng;

    fn drag(surface: &InputSurface, moves: &[(f32, f32)]) {
        surface.dispatch(InputEvent::PointerDown { pointer_id: 1 });
        for &(movement_x, movement_y) in moves {
            surface.dispatch(InputEvent::PointerMove {
                movement_x,
                movement_y,
            });
        }
        surface.dispatch(InputEvent::PointerUp { pointer_id: 1 });
    }

    #[test]
    fn test_registers_down_and_wheel_only_when_idle() {
        let surface = InputSurface::new(800, 600);
        let controller = OrbitController::new(&surface, Default::default());

        assert_eq!(surface.listener_count_for(EventKind::PointerDown), 1);
        assert_eq!(surface.listener_count_for(EventKind::Wheel), 1);
        assert_eq!(surface.listener_count_for(EventKind::PointerMove), 0);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_drag_state_machine() {
        let surface = InputSurface::new(800, 600);
        let controller = OrbitController::new(&surface, Default::default());

        surface.dispatch(InputEvent::PointerDown { pointer_id: 7 });
        assert!(controller.is_dragging());
        assert!(surface.has_pointer_capture(7));
        assert!(surface.is_pointer_locked());
        assert_eq!(surface.listener_count_for(EventKind::PointerDown), 0);
        assert_eq!(surface.listener_count_for(EventKind::PointerUp), 1);
        assert_eq!(surface.listener_count_for(EventKind::PointerMove), 1);

        surface.dispatch(InputEvent::PointerUp { pointer_id: 7 });
        assert!(!controller.is_dragging());
        assert!(!surface.has_pointer_capture(7));
        assert!(!surface.is_pointer_locked());
        assert_eq!(surface.listener_count_for(EventKind::PointerDown), 1);
        assert_eq!(surface.listener_count_for(EventKind::PointerUp), 0);
        assert_eq!(surface.listener_count_for(EventKind::PointerMove), 0);
    }

    #[test]
    fn test_moves_only_count_while_dragging() {
        let surface = InputSurface::new(800, 600);
        let controller = OrbitController::new(&surface, Default::default());

        surface.dispatch(InputEvent::PointerMove {
            movement_x: 0.0,
            movement_y: 100.0,
        });
        assert_eq!(controller.pitch(), 0.0);

        drag(&surface, &[(0.0, 100.0)]);
        assert!((controller.pitch() + 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_yaw_wraps_into_full_turn() {
        let surface = InputSurface::new(800, 600);
        let controller = OrbitController::new(&surface, Default::default());

        drag(&surface, &[(100.0, 0.0)]);
        assert!((controller.yaw() - (TAU - 0.4)).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_stays_clamped_for_random_input() {
        let surface = InputSurface::new(800, 600);
        let controller = OrbitController::new(&surface, Default::default());
        let mut rng = rand::rng();

        for _ in 0..50 {
            let moves: Vec<(f32, f32)> = (0..rng.random_range(1..20))
                .map(|_| {
                    (
                        rng.random_range(-5000.0..5000.0f32),
                        rng.random_range(-5000.0..5000.0f32),
                    )
                })
                .collect();
            drag(&surface, &moves);

            assert!((-FRAC_PI_2..=FRAC_PI_2).contains(&controller.pitch()));
            assert!((0.0..TAU).contains(&controller.yaw()));
        }
    }

    #[test]
    fn test_wheel_scales_distance_exponentially() {
        let surface = InputSurface::new(800, 600);
        let controller = OrbitController::new(&surface, Default::default());
        assert_eq!(controller.distance(), 2.0);

        surface.dispatch(InputEvent::Wheel { delta_y: 500.0 });
        assert!((controller.distance() - 2.0 * 1.0f32.exp()).abs() < 1e-5);

        surface.dispatch(InputEvent::Wheel { delta_y: -500.0 });
        assert!((controller.distance() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_update_orbits_around_origin() {
        let surface = InputSurface::new(800, 600);
        let controller = OrbitController::new(&surface, Default::default());
        let mut node = Node::new().with_component(Transform::default());

        controller.update(&mut node);
        let transform = node.component::<Transform>().unwrap();
        assert!((transform.translation - Vector3::new(0.0, 0.0, 2.0)).magnitude() < 1e-6);

        // a quarter turn of yaw
        drag(&surface, &[(-FRAC_PI_2 / 0.004, 0.0)]);
        controller.update(&mut node);
        let transform = node.component::<Transform>().unwrap();
        assert!((transform.translation - Vector3::new(2.0, 0.0, 0.0)).magnitude() < 1e-4);

        // the node looks back at the origin along its -z axis
        let forward = transform.rotation.rotate_vector(-Vector3::unit_z());
        assert!((forward + transform.translation.normalize()).magnitude() < 1e-4);
    }

    #[test]
    fn test_update_without_transform_is_noop() {
        let surface = InputSurface::new(800, 600);
        let controller = OrbitController::new(&surface, Default::default());
        let mut node = Node::new();
        controller.update(&mut node);
        assert!(!node.has_component::<Transform>());
    }

    #[test]
    fn test_dispose_removes_every_listener() {
        let surface = InputSurface::new(800, 600);
        let controller = OrbitController::new(&surface, Default::default());

        surface.dispatch(InputEvent::PointerDown { pointer_id: 1 });
        controller.dispose();

        assert!(controller.is_disposed());
        assert_eq!(surface.listener_count(), 0);
        assert!(!surface.is_pointer_locked());
        assert!(!surface.has_pointer_capture(1));
    }

    #[test]
    fn test_dropping_last_handle_removes_listeners() {
        let surface = InputSurface::new(800, 600);
        let controller = OrbitController::new(&surface, Default::default());
        let mut node = Node::new().with_component(controller.clone());
        drop(controller);
        assert_eq!(surface.listener_count(), 2);

        node.take_component::<OrbitController>();
        assert_eq!(surface.listener_count(), 0);
    }

    #[test]
    fn test_dropping_last_handle_mid_drag_releases_pointer() {
        let surface = InputSurface::new(800, 600);
        let controller = OrbitController::new(&surface, Default::default());
        let other = controller.clone();

        surface.dispatch(InputEvent::PointerDown { pointer_id: 3 });
        drop(other);
        assert!(surface.is_pointer_locked());
        assert!(surface.has_pointer_capture(3));

        drop(controller);
        assert_eq!(surface.listener_count(), 0);
        assert!(!surface.is_pointer_locked());
        assert!(!surface.has_pointer_capture(3));
    }
}
