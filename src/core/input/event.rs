//=========================================================================
// Input Event Types
//
// Defines the engine's representation of low-level input events.
//
// This module abstracts away platform-specific input (e.g. Winit, gilrs)
// into a unified, engine-friendly format consumed by the dispatcher.
//
// Responsibilities:
// - Represent keyboard, mouse and controller input in a portable way
// - Carry the character a key produced alongside its physical code
// - Keep events cheap to copy between the platform and the dispatcher
//
// Event Flow:
// ```text
// Platform Layer (Winit / gilrs)
//         ↓
//    RawInputEvent / ControllerEvent (this module)
//         ↓
//    InputDispatcher (snapshots + hotkeys)
//         ↓
//    Active Screen
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs, carrying the platform's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other(u16),
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// The character travels separately in [`RawInputEvent::Key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Numpad Keys ------------------------------------------------------

    /// Numpad digits, used for Alt+code character entry.
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Arrow Keys -------------------------------------------------------

    /// Directional navigation keys
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Modifier Keys ----------------------------------------------------

    AltLeft,
    AltRight,
    ControlLeft,
    ControlRight,
    ShiftLeft,
    ShiftRight,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified,
}

impl KeyCode {
    /// Returns `true` for either Alt key.
    pub fn is_alt(self) -> bool {
        matches!(self, Self::AltLeft | Self::AltRight)
    }
}

//=== RawInputEvent =======================================================

/// Keyboard and mouse event produced by the platform layer.
///
/// Mouse positions are window pixels with a top-left origin, as reported by
/// the platform. The dispatcher flips them before they reach a screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInputEvent {
    /// Key pressed or released, with the character it currently produces.
    Key {
        code: KeyCode,
        ch: Option<char>,
        down: bool,
    },

    /// Mouse button pressed or released.
    MouseButton { button: MouseButton, down: bool },

    /// Cursor moved to an absolute window position.
    MouseMoved { x: i32, y: i32 },

    /// Relative pointer motion (used while the pointer is grabbed).
    MouseMotion { dx: i32, dy: i32 },

    /// Wheel scrolled; sign gives the direction.
    MouseWheel { delta: i32 },

    /// Unrecognized or unsupported event.
    Unidentified,
}

impl RawInputEvent {
    /// Returns `true` for keyboard and button events, whose order matters.
    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            Self::Key { .. } | Self::MouseButton { .. } | Self::MouseWheel { .. }
        )
    }
}

//=== ControllerEvent =====================================================

/// Event from the acquired game controller.
///
/// Axis and button indices are the controller's own numbering; the
/// dispatcher maps them to logical axes through the configured binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerEvent {
    /// D-pad horizontal position (-1.0, 0.0 or 1.0).
    PovX(f32),

    /// D-pad vertical position (-1.0, 0.0 or 1.0).
    PovY(f32),

    /// Analog axis moved.
    Axis { index: usize, value: f32 },

    /// Button pressed or released.
    Button { index: usize, down: bool },
}

//=== ControllerAxis ======================================================

/// Logical movement axis a controller axis is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerAxis {
    X,
    Y,
    Z,
    /// Unbound axis, by controller index.
    Other(usize),
}

//=========================================================================
// Unit Tests
//=========================================================================
