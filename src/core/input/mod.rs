//=========================================================================
// Input
//=========================================================================
//
// Engine-side input handling: platform-neutral event types and the
// dispatcher that routes them to the active screen.
//
// Components:
// - `event`: Key, mouse and controller event types
// - `keyboard`, `mouse`, `controller`: per-device snapshot and routing
// - `dispatcher`: owns the device states and the engine hotkeys
//
//=========================================================================

//=== Module Declarations =================================================

pub mod controller;
pub mod dispatcher;
pub mod event;
pub mod keyboard;
pub mod mouse;

//=== Public API ==========================================================

pub use controller::{AxisBinding, ControllerState, AXIS_DEADZONE};
pub use dispatcher::InputDispatcher;
pub use event::{ControllerAxis, ControllerEvent, KeyCode, MouseButton, RawInputEvent};
pub use keyboard::{Hotkey, KeyboardState};
pub use mouse::MouseState;
