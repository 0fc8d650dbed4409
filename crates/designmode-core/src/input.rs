//! Input state management for the editor.
//!
//! The host feeds pointer and key events in as they arrive and calls
//! `begin_frame` once per tick; the controller then asks "pressed" and
//! "just pressed" questions against the accumulated state.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Pointer buttons the editor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// Grab and drag.
    Primary,
    /// Background/visibility toggle.
    Secondary,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Grid snap while dragging; also the accelerator prefix.
    pub precision: bool,
    /// Free movement while dragging; also part of the reset accelerator.
    pub free: bool,
}

/// Keys with editor meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKey {
    /// Number keys 1-9, the property edit triggers.
    Digit(u8),
    /// Save accelerator (with the precision modifier).
    Save,
    /// Coordinate copy accelerator (with the precision modifier).
    Copy,
    /// Undo (precision) or full reset (precision + free).
    Confirm,
}

/// Pointer event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: PointerButton },
    Up { position: Point, button: PointerButton },
    Move { position: Point },
}

/// Keyboard event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(EditKey),
    Released(EditKey),
}

/// Tracks the current input state across frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Pointer position at the previous frame boundary.
    previous_pointer_position: Point,
    pressed_buttons: HashSet<PointerButton>,
    just_pressed_buttons: HashSet<PointerButton>,
    just_released_buttons: HashSet<PointerButton>,
    pressed_keys: HashSet<EditKey>,
    just_pressed_keys: HashSet<EditKey>,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.just_pressed_buttons.clear();
        self.just_released_buttons.clear();
        self.just_pressed_keys.clear();
        self.previous_pointer_position = self.pointer_position;
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                if self.pressed_buttons.insert(button) {
                    self.just_pressed_buttons.insert(button);
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                if self.pressed_buttons.remove(&button) {
                    self.just_released_buttons.insert(button);
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
            }
        }
    }

    /// Process a key event.
    pub fn handle_key_event(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Pressed(key) => {
                if self.pressed_keys.insert(key) {
                    self.just_pressed_keys.insert(key);
                }
            }
            KeyEvent::Released(key) => {
                self.pressed_keys.remove(&key);
            }
        }
    }

    /// Update modifier keys state.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn is_button_pressed(&self, button: PointerButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn is_button_just_pressed(&self, button: PointerButton) -> bool {
        self.just_pressed_buttons.contains(&button)
    }

    pub fn is_button_just_released(&self, button: PointerButton) -> bool {
        self.just_released_buttons.contains(&button)
    }

    pub fn is_key_pressed(&self, key: EditKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn is_key_just_pressed(&self, key: EditKey) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// The digit key (1-9) that went down this frame, if any.
    pub fn digit_just_pressed(&self) -> Option<u8> {
        self.just_pressed_keys.iter().find_map(|key| match key {
            EditKey::Digit(d) => Some(*d),
            _ => None,
        })
    }

    /// Whether the pointer has moved since the previous frame boundary.
    pub fn pointer_moved(&self) -> bool {
        self.pointer_position != self.previous_pointer_position
    }
}
