use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use thiserror::Error;
use winit::{
    event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window},
};

use super::event::{EventKind, InputEvent, PointerId, MOUSE_POINTER_ID};

/// Pixels scrolled per wheel line, matching what browsers report.
pub const PIXELS_PER_LINE: f32 = 100.0;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("the windowing system refused to change the pointer lock")]
    PointerLock(#[from] winit::error::ExternalError),
    #[error("pointer lock is not available on this surface")]
    PointerLockUnavailable,
}

/// Platform side of an [`InputSurface`].
pub trait SurfaceHost {
    /// Locks (hides and pins) or releases the cursor.
    fn set_pointer_locked(&self, locked: bool) -> Result<(), InputError>;
}

/// Host for surfaces without a window, e.g. in tests. Pointer lock always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl SurfaceHost for Headless {
    fn set_pointer_locked(&self, _locked: bool) -> Result<(), InputError> {
        Ok(())
    }
}

impl SurfaceHost for Window {
    fn set_pointer_locked(&self, locked: bool) -> Result<(), InputError> {
        if locked {
            // Not every platform supports Locked; Confined is the closest fallback
            self.set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.set_cursor_grab(CursorGrabMode::Confined))?;
        } else {
            self.set_cursor_grab(CursorGrabMode::None)?;
        }
        self.set_cursor_visible(!locked);
        Ok(())
    }
}

impl<T: SurfaceHost + ?Sized> SurfaceHost for Arc<T> {
    fn set_pointer_locked(&self, locked: bool) -> Result<(), InputError> {
        (**self).set_pointer_locked(locked)
    }
}

type Handler = Rc<dyn Fn(&InputEvent, &InputSurface)>;

struct Listener {
    id: u64,
    kind: EventKind,
    handler: Handler,
}

struct SurfaceState {
    host: Box<dyn SurfaceHost>,
    listeners: Vec<Listener>,
    next_id: u64,
    captured_pointer: Option<PointerId>,
    pointer_locked: bool,
    width: u32,
    height: u32,
}

/// A single-threaded source of input events with listener registration.
///
/// Cloning an `InputSurface` yields another handle to the same surface.
/// Handlers receive the surface they were dispatched from, so they can
/// register or drop listeners and request pointer capture or lock while
/// being called.
#[derive(Clone)]
pub struct InputSurface {
    state: Rc<RefCell<SurfaceState>>,
}

/// Registration of one listener on an [`InputSurface`].
///
/// Dropping the subscription removes the listener. It does not keep the
/// surface alive.
#[must_use = "dropping a Subscription immediately removes its listener"]
pub struct Subscription {
    surface: Weak<RefCell<SurfaceState>>,
    id: u64,
    kind: EventKind,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(state) = self.surface.upgrade() else {
            return;
        };
        let removed = {
            let mut state = state.borrow_mut();
            state
                .listeners
                .iter()
                .position(|listener| listener.id == self.id)
                .map(|index| state.listeners.remove(index))
        };
        // Drop the handler outside the borrow; it may own state whose drop
        // touches this surface again.
        if removed.is_some() {
            log::debug!("removed {:?} listener #{}", self.kind, self.id);
        }
        drop(removed);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

impl InputSurface {
    /// A windowless surface of the given pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_host(Headless, width, height)
    }

    pub fn with_host(host: impl SurfaceHost + 'static, width: u32, height: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(SurfaceState {
                host: Box::new(host),
                listeners: Vec::new(),
                next_id: 0,
                captured_pointer: None,
                pointer_locked: false,
                width,
                height,
            })),
        }
    }

    /// A surface driven by `window`, sized to its inner size.
    pub fn for_window(window: Arc<Window>) -> Self {
        let size = window.inner_size();
        Self::with_host(window, size.width, size.height)
    }

    /// Registers `handler` for events of `kind` until the returned
    /// [`Subscription`] is dropped.
    pub fn add_listener<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&InputEvent, &InputSurface) + 'static,
    {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push(Listener {
            id,
            kind,
            handler: Rc::new(handler),
        });
        log::debug!("added {kind:?} listener #{id}");

        Subscription {
            surface: Rc::downgrade(&self.state),
            id,
            kind,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.kind == kind)
            .count()
    }

    fn is_registered(&self, id: u64) -> bool {
        self.state
            .borrow()
            .listeners
            .iter()
            .any(|listener| listener.id == id)
    }

    /// Calls every listener registered for the kind of `event`, in
    /// registration order.
    ///
    /// Listeners added during the dispatch are not called for this event;
    /// listeners removed during the dispatch are not called anymore.
    pub fn dispatch(&self, event: InputEvent) {
        if let InputEvent::PointerLockChange { locked } = event {
            self.state.borrow_mut().pointer_locked = locked;
        }

        let kind = event.kind();
        let targets: Vec<(u64, Handler)> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.kind == kind)
            .map(|listener| (listener.id, Rc::clone(&listener.handler)))
            .collect();

        for (id, handler) in targets {
            if self.is_registered(id) {
                handler(&event, self);
            }
        }
    }

    pub fn set_pointer_capture(&self, pointer_id: PointerId) {
        self.state.borrow_mut().captured_pointer = Some(pointer_id);
    }

    /// Releases the capture if `pointer_id` holds it.
    pub fn release_pointer_capture(&self, pointer_id: PointerId) {
        let mut state = self.state.borrow_mut();
        if state.captured_pointer == Some(pointer_id) {
            state.captured_pointer = None;
        }
    }

    pub fn has_pointer_capture(&self, pointer_id: PointerId) -> bool {
        self.state.borrow().captured_pointer == Some(pointer_id)
    }

    /// Asks the host to lock the pointer and dispatches a
    /// [`InputEvent::PointerLockChange`] once it is locked.
    pub fn request_pointer_lock(&self) -> Result<(), InputError> {
        if self.is_pointer_locked() {
            return Ok(());
        }
        self.state.borrow().host.set_pointer_locked(true)?;
        self.dispatch(InputEvent::PointerLockChange { locked: true });
        Ok(())
    }

    pub fn exit_pointer_lock(&self) -> Result<(), InputError> {
        if !self.is_pointer_locked() {
            return Ok(());
        }
        self.state.borrow().host.set_pointer_locked(false)?;
        self.dispatch(InputEvent::PointerLockChange { locked: false });
        Ok(())
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.state.borrow().pointer_locked
    }

    /// Surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        let state = self.state.borrow();
        (state.width, state.height)
    }

    pub fn resize(&self, width: u32, height: u32) {
        let mut state = self.state.borrow_mut();
        state.width = width;
        state.height = height;
    }

    /// Translates a winit window event and dispatches the result.
    ///
    /// Releasing the left mouse button dispatches a pointer-up followed by a
    /// click. Resizes update [`InputSurface::size`].
    pub fn handle_window_event(&self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.dispatch(InputEvent::PointerDown {
                    pointer_id: MOUSE_POINTER_ID,
                }),
                ElementState::Released => {
                    self.dispatch(InputEvent::PointerUp {
                        pointer_id: MOUSE_POINTER_ID,
                    });
                    self.dispatch(InputEvent::Click);
                }
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, lines) => -lines * PIXELS_PER_LINE,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
                self.dispatch(InputEvent::Wheel { delta_y });
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.dispatch(match event.state {
                        ElementState::Pressed => InputEvent::KeyDown(code),
                        ElementState::Released => InputEvent::KeyUp(code),
                    });
                }
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::Focused(false) => {
                if let Err(err) = self.exit_pointer_lock() {
                    log::warn!("failed to release pointer lock on focus loss: {err}");
                }
            }
            _ => (),
        }
    }

    /// Translates raw mouse motion into [`InputEvent::PointerMove`].
    ///
    /// Device events keep reporting motion while the cursor is locked, unlike
    /// cursor positions.
    pub fn handle_device_event(&self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.dispatch(InputEvent::PointerMove {
                movement_x: delta.0 as f32,
                movement_y: delta.1 as f32,
            });
        }
    }
}

impl std::fmt::Debug for InputSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("InputSurface")
            .field("listeners", &state.listeners.len())
            .field("captured_pointer", &state.captured_pointer)
            .field("pointer_locked", &state.pointer_locked)
            .field("size", &(state.width, state.height))
            .finish()
    }
}
