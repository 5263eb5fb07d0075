use std::collections::HashSet;

use super::types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for a single window.
///
/// Holds "is down" information plus the pointer position, which containers
/// use to compute move/drag deltas and to decide whether a move is a drag.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a platform-agnostic input event to the current state.
    pub fn apply(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // On focus loss, clear "down" sets so keys/buttons held
                    // across a focus change cannot get stuck.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        self.keys_down.insert(*key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
                modifiers,
            }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    /// Any button currently held; lowest-priority wins Left > Right > Middle.
    pub fn held_button(&self) -> Option<MouseButton> {
        [MouseButton::Left, MouseButton::Right, MouseButton::Middle]
            .into_iter()
            .find(|b| self.buttons_down.contains(b))
            .or_else(|| self.buttons_down.iter().next().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state: MouseButtonState::Pressed,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn pointer_and_button_tracking() {
        let mut state = InputState::new();
        state.apply(&press(MouseButton::Middle, 10.0, 20.0));

        assert_eq!(state.pointer_pos, Some((10.0, 20.0)));
        assert!(state.button_down(MouseButton::Middle));
        assert_eq!(state.held_button(), Some(MouseButton::Middle));

        state.apply(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Middle,
            state: MouseButtonState::Released,
            x: 15.0,
            y: 25.0,
            modifiers: Modifiers::default(),
        }));
        assert!(!state.button_down(MouseButton::Middle));
        assert_eq!(state.held_button(), None);
    }

    #[test]
    fn focus_loss_clears_held_sets() {
        let mut state = InputState::new();
        state.apply(&InputEvent::Key {
            key: Key::A,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });
        state.apply(&press(MouseButton::Left, 0.0, 0.0));
        assert!(state.key_down(Key::A));

        state.apply(&InputEvent::Focused(false));
        assert!(!state.key_down(Key::A));
        assert!(!state.button_down(MouseButton::Left));
    }

    #[test]
    fn pointer_left_clears_position() {
        let mut state = InputState::new();
        state.apply(&InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 2.0 }));
        state.apply(&InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }
}
