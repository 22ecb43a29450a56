//! # Input
//!
//! A single-threaded event surface standing between the windowing system and
//! the camera controllers.
//!
//! winit events are translated into a small set of [`InputEvent`]s and handed
//! to every listener registered for that kind. Registrations are
//! [`Subscription`] guards: dropping one removes its listener, so a controller
//! that goes away can never leave a handler behind.
//!
//! ```rust
//! use gpu_workshop::input::{EventKind, InputEvent, InputSurface};
//!
//! let surface = InputSurface::new(800, 600);
//! let subscription = surface.add_listener(EventKind::Click, |_, _| println!("click"));
//! surface.dispatch(InputEvent::Click);
//! drop(subscription);
//! assert_eq!(surface.listener_count(), 0);
//! ```

pub mod event;
pub mod surface;

pub use event::{EventKind, InputEvent, PointerId, MOUSE_POINTER_ID};
pub use surface::{Headless, InputError, InputSurface, Subscription, SurfaceHost, PIXELS_PER_LINE};
