use winit::keyboard::KeyCode;

/// Identifier of a pointing device (mouse, pen, touch contact).
pub type PointerId = u64;

/// Pointer id used for the mouse when translating winit events.
pub const MOUSE_POINTER_ID: PointerId = 0;

/// Input delivered by an [`InputSurface`](super::InputSurface).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { pointer_id: PointerId },
    PointerUp { pointer_id: PointerId },
    /// Relative pointer motion in pixels, reported even while the pointer is locked
    PointerMove { movement_x: f32, movement_y: f32 },
    /// Vertical scroll in pixels; positive values scroll down, toward the user
    Wheel { delta_y: f32 },
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Primary button pressed and released on the surface
    Click,
    PointerLockChange { locked: bool },
}

/// Discriminant of [`InputEvent`], used to register listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerUp,
    PointerMove,
    Wheel,
    KeyDown,
    KeyUp,
    Click,
    PointerLockChange,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::PointerDown { .. } => EventKind::PointerDown,
            InputEvent::PointerUp { .. } => EventKind::PointerUp,
            InputEvent::PointerMove { .. } => EventKind::PointerMove,
            InputEvent::Wheel { .. } => EventKind::Wheel,
            InputEvent::KeyDown(_) => EventKind::KeyDown,
            InputEvent::KeyUp(_) => EventKind::KeyUp,
            InputEvent::Click => EventKind::Click,
            InputEvent::PointerLockChange { .. } => EventKind::PointerLockChange,
        }
    }
}
