//! Platform-agnostic input events and state.
//!
//! The runtime translates window-system events into [`InputEvent`]s
//! (`platform::winit`), tracks current state in [`InputState`], and the
//! owning container routes them into screen hooks.

pub mod platform;

mod state;
mod types;

pub use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};
