//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit events into engine RawInputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → RawInputEvent (engine type) → InputBuffer
//
// Keys carry the character they produce: the committed text when Winit
// reports one, otherwise the logical key. Raw pointer motion arrives in
// fractional device units and is accumulated so sub-pixel movement is
// not lost between events.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta},
    keyboard::{Key, KeyCode as WinitKeyCode, NamedKey, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{KeyCode, MouseButton, RawInputEvent};

//=== InputProcessor ======================================================

/// Converts Winit events to engine events, carrying sub-pixel motion
/// between calls.
#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    motion_remainder: (f64, f64),
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a Winit key event. Keys without a physical code are
    /// reported as `Unidentified` so the character still reaches text
    /// entry.
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> RawInputEvent {
        let code = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            PhysicalKey::Unidentified(_) => KeyCode::Unidentified,
        };

        RawInputEvent::Key {
            code,
            ch: key_char(key_event.text.as_deref(), &key_event.logical_key),
            down: key_event.state == ElementState::Pressed,
        }
    }

    pub(crate) fn process_mouse_button(&self, button: WinitMouseButton, state: ElementState) -> RawInputEvent {
        RawInputEvent::MouseButton {
            button: MouseButton::from(button),
            down: state == ElementState::Pressed,
        }
    }

    /// Cursor position in physical window pixels.
    pub(crate) fn process_mouse_move(&self, x: f64, y: f64) -> RawInputEvent {
        RawInputEvent::MouseMoved {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }

    /// Wheel scroll; only the vertical direction matters.
    pub(crate) fn process_mouse_wheel(&self, delta: MouseScrollDelta) -> Option<RawInputEvent> {
        let amount = match delta {
            MouseScrollDelta::LineDelta(_, y) => f64::from(y),
            MouseScrollDelta::PixelDelta(position) => position.y,
        };

        if amount == 0.0 {
            return None;
        }

        Some(RawInputEvent::MouseWheel {
            delta: if amount > 0.0 { 1 } else { -1 },
        })
    }

    /// Raw device motion. Returns whole pixels and keeps the fraction for
    /// the next call.
    pub(crate) fn process_mouse_motion(&mut self, dx: f64, dy: f64) -> Option<RawInputEvent> {
        let x = self.motion_remainder.0 + dx;
        let y = self.motion_remainder.1 + dy;
        let (whole_x, whole_y) = (x.trunc(), y.trunc());

        self.motion_remainder = (x - whole_x, y - whole_y);

        if whole_x == 0.0 && whole_y == 0.0 {
            return None;
        }

        Some(RawInputEvent::MouseMotion {
            dx: whole_x as i32,
            dy: whole_y as i32,
        })
    }
}

//--- Internal Helpers ----------------------------------------------------

/// Character produced by a key: committed text first, then the logical
/// key, then the control character of editing keys.
fn key_char(text: Option<&str>, logical: &Key) -> Option<char> {
    if let Some(ch) = text.and_then(|t| t.chars().next()) {
        return Some(ch);
    }

    match logical {
        Key::Character(s) => s.chars().next(),
        Key::Named(NamedKey::Space) => Some(' '),
        Key::Named(NamedKey::Enter) => Some('\r'),
        Key::Named(NamedKey::Tab) => Some('\t'),
        Key::Named(NamedKey::Backspace) => Some('\u{8}'),
        Key::Named(NamedKey::Escape) => Some('\u{1b}'),
        Key::Named(NamedKey::Delete) => Some('\u{7f}'),
        _ => None,
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to engine key codes.
///
/// Keys the engine has no name for map to `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Numpad -------------------------------------------------------

            Numpad0 => KeyCode::Numpad0,
            Numpad1 => KeyCode::Numpad1,
            Numpad2 => KeyCode::Numpad2,
            Numpad3 => KeyCode::Numpad3,
            Numpad4 => KeyCode::Numpad4,
            Numpad5 => KeyCode::Numpad5,
            Numpad6 => KeyCode::Numpad6,
            Numpad7 => KeyCode::Numpad7,
            Numpad8 => KeyCode::Numpad8,
            Numpad9 => KeyCode::Numpad9,

            //--- Function Keys ------------------------------------------------

            F1 => KeyCode::F1,
            F2 => KeyCode::F2,
            F3 => KeyCode::F3,
            F4 => KeyCode::F4,
            F5 => KeyCode::F5,
            F6 => KeyCode::F6,
            F7 => KeyCode::F7,
            F8 => KeyCode::F8,
            F9 => KeyCode::F9,
            F10 => KeyCode::F10,
            F11 => KeyCode::F11,
            F12 => KeyCode::F12,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Modifiers ----------------------------------------------------

            AltLeft => KeyCode::AltLeft,
            AltRight => KeyCode::AltRight,
            ControlLeft => KeyCode::ControlLeft,
            ControlRight => KeyCode::ControlRight,
            ShiftLeft => KeyCode::ShiftLeft,
            ShiftRight => KeyCode::ShiftRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter | NumpadEnter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,
            Insert => KeyCode::Insert,
            Home => KeyCode::Home,
            End => KeyCode::End,
            PageUp => KeyCode::PageUp,
            PageDown => KeyCode::PageDown,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

/// Converts Winit mouse buttons to engine buttons.
///
/// Back/Forward become `Other(3)` / `Other(4)`.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back => MouseButton::Other(3),
            WinitMouseButton::Forward => MouseButton::Other(4),
            WinitMouseButton::Other(index) => MouseButton::Other(index),
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
