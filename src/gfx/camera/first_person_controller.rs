use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use cgmath::{InnerSpace, Vector3, Zero};
use winit::keyboard::KeyCode;

use super::orbit_controller::{look, orbit_rotation};
use crate::gfx::scene::{Node, Transform};
use crate::input::{EventKind, InputEvent, InputSurface, Subscription};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonControllerOptions {
    /// Initial velocity in units per second
    pub velocity: Vector3<f32>,
    /// Acceleration while a movement key is held, in units per second squared
    pub acceleration: f32,
    pub max_speed: f32,
    /// Fraction of the velocity lost per second without movement input
    pub decay: f32,
    /// Radians of yaw/pitch per pixel of pointer movement
    pub pointer_sensitivity: f32,
}

impl Default for FirstPersonControllerOptions {
    fn default() -> Self {
        Self {
            velocity: Vector3::zero(),
            acceleration: 20.0,
            max_speed: 3.0,
            decay: 0.9,
            pointer_sensitivity: 0.002,
        }
    }
}

struct FirstPersonState {
    options: FirstPersonControllerOptions,
    keys: HashSet<KeyCode>,
    yaw: f32,
    pitch: f32,
    velocity: Vector3<f32>,
    key_down: Option<Subscription>,
    key_up: Option<Subscription>,
    click: Option<Subscription>,
    pointer_lock_change: Option<Subscription>,
    pointer_move: Option<Subscription>,
}

/// WASD movement with mouse look.
///
/// Clicking the surface requests a pointer lock; pointer movement only turns
/// the view while the lock is held.
#[derive(Clone)]
pub struct FirstPersonController {
    state: Rc<RefCell<FirstPersonState>>,
}

impl FirstPersonController {
    pub fn new(surface: &InputSurface, options: FirstPersonControllerOptions) -> Self {
        let state = Rc::new(RefCell::new(FirstPersonState {
            options,
            keys: HashSet::new(),
            yaw: 0.0,
            pitch: 0.0,
            velocity: options.velocity,
            key_down: None,
            key_up: None,
            click: None,
            pointer_lock_change: None,
            pointer_move: None,
        }));

        let weak = Rc::downgrade(&state);
        let key_down = listen(surface, EventKind::KeyDown, &weak, on_key_down);
        let key_up = listen(surface, EventKind::KeyUp, &weak, on_key_up);
        let click = listen(surface, EventKind::Click, &weak, on_click);
        let pointer_lock_change = listen(
            surface,
            EventKind::PointerLockChange,
            &weak,
            on_pointer_lock_change,
        );
        {
            let mut state = state.borrow_mut();
            state.key_down = Some(key_down);
            state.key_up = Some(key_up);
            state.click = Some(click);
            state.pointer_lock_change = Some(pointer_lock_change);
        }

        Self { state }
    }

    /// Advances the controller by `dt` seconds.
    ///
    /// The velocity is integrated even if the node has no [`Transform`]; the
    /// transform, if present, receives the new translation and the look
    /// rotation.
    pub fn update(&self, node: &mut Node, dt: f32) {
        let mut state = self.state.borrow_mut();

        let (sin, cos) = state.yaw.sin_cos();
        let forward = Vector3::new(-sin, 0.0, -cos);
        let right = Vector3::new(cos, 0.0, -sin);

        let mut acc = Vector3::zero();
        let mut moving = false;
        for (key, direction) in [
            (KeyCode::KeyW, forward),
            (KeyCode::KeyS, -forward),
            (KeyCode::KeyD, right),
            (KeyCode::KeyA, -right),
        ] {
            if state.keys.contains(&key) {
                acc += direction;
                moving = true;
            }
        }

        let acceleration = state.options.acceleration;
        state.velocity += acc * (dt * acceleration);

        if !moving {
            // exp(dt * ln(1 - decay)), well-defined for decay = 1 and dt = 0
            let decay = (1.0 - state.options.decay).powf(dt);
            state.velocity *= decay;
        }

        let speed = state.velocity.magnitude();
        if speed > state.options.max_speed {
            let max_speed = state.options.max_speed;
            state.velocity *= max_speed / speed;
        }

        if let Some(transform) = node.component_mut::<Transform>() {
            transform.translation += state.velocity * dt;
            transform.rotation = orbit_rotation(state.yaw, state.pitch);
        }
    }

    /// Removes every listener.
    pub fn dispose(&self) {
        let subscriptions = {
            let mut state = self.state.borrow_mut();
            [
                state.key_down.take(),
                state.key_up.take(),
                state.click.take(),
                state.pointer_lock_change.take(),
                state.pointer_move.take(),
            ]
        };
        drop(subscriptions);
    }

    pub fn is_disposed(&self) -> bool {
        let state = self.state.borrow();
        state.key_down.is_none() && state.click.is_none() && state.pointer_lock_change.is_none()
    }

    /// Whether pointer movement currently turns the view.
    pub fn is_looking(&self) -> bool {
        self.state.borrow().pointer_move.is_some()
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.state.borrow().keys.contains(&key)
    }

    pub fn yaw(&self) -> f32 {
        self.state.borrow().yaw
    }

    pub fn pitch(&self) -> f32 {
        self.state.borrow().pitch
    }

    pub fn velocity(&self) -> Vector3<f32> {
        self.state.borrow().velocity
    }

    pub fn options(&self) -> FirstPersonControllerOptions {
        self.state.borrow().options
    }
}

impl std::fmt::Debug for FirstPersonController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("FirstPersonController")
            .field("yaw", &state.yaw)
            .field("pitch", &state.pitch)
            .field("velocity", &state.velocity)
            .field("keys", &state.keys)
            .finish()
    }
}

type Handler = fn(&Rc<RefCell<FirstPersonState>>, &InputEvent, &InputSurface);

fn listen(
    surface: &InputSurface,
    kind: EventKind,
    state: &Weak<RefCell<FirstPersonState>>,
    handler: Handler,
) -> Subscription {
    let state = Weak::clone(state);
    surface.add_listener(kind, move |event, surface| {
        if let Some(state) = state.upgrade() {
            handler(&state, event, surface);
        }
    })
}

fn on_key_down(state: &Rc<RefCell<FirstPersonState>>, event: &InputEvent, _surface: &InputSurface) {
    if let InputEvent::KeyDown(code) = *event {
        state.borrow_mut().keys.insert(code);
    }
}

fn on_key_up(state: &Rc<RefCell<FirstPersonState>>, event: &InputEvent, _surface: &InputSurface) {
    if let InputEvent::KeyUp(code) = *event {
        state.borrow_mut().keys.remove(&code);
    }
}

fn on_click(_state: &Rc<RefCell<FirstPersonState>>, _event: &InputEvent, surface: &InputSurface) {
    if let Err(err) = surface.request_pointer_lock() {
        log::warn!("first person controller could not lock the pointer: {err}");
    }
}

fn on_pointer_lock_change(
    state: &Rc<RefCell<FirstPersonState>>,
    event: &InputEvent,
    surface: &InputSurface,
) {
    let InputEvent::PointerLockChange { locked } = *event else {
        return;
    };

    if locked {
        if state.borrow().pointer_move.is_some() {
            return;
        }
        let pointer_move = listen(surface, EventKind::PointerMove, &Rc::downgrade(state), on_pointer_move);
        state.borrow_mut().pointer_move = Some(pointer_move);
    } else {
        let pointer_move = state.borrow_mut().pointer_move.take();
        drop(pointer_move);
    }
}

fn on_pointer_move(state: &Rc<RefCell<FirstPersonState>>, event: &InputEvent, _surface: &InputSurface) {
    let InputEvent::PointerMove {
        movement_x,
        movement_y,
    } = *event
    else {
        return;
    };

    let mut state = state.borrow_mut();
    let state = &mut *state;
    let sensitivity = state.options.pointer_sensitivity;
    look(&mut state.yaw, &mut state.pitch, movement_x, movement_y, sensitivity);
}
