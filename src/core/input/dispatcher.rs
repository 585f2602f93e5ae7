//=========================================================================
// Input Dispatcher
//=========================================================================
//
// Routes platform input to the active screen.
//
// Architecture:
//   RawInputEvent    → KeyboardState / MouseState → ScreenManager
//   ControllerEvent  → ControllerState            → ScreenManager
//
// Each device is optional. Events for a device that was not acquired
// are dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::controller::ControllerState;
use super::event::{ControllerEvent, RawInputEvent};
use super::keyboard::{Hotkey, KeyboardState};
use super::mouse::MouseState;
use crate::core::screen::{ScreenKey, ScreenManager};

//=== InputDispatcher =====================================================

/// Per-device snapshots plus the routing between them and the screens.
#[derive(Debug, Default)]
pub struct InputDispatcher {
    keyboard: Option<KeyboardState>,
    mouse: Option<MouseState>,
    controller: Option<ControllerState>,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Devices ----------------------------------------------------------

    pub fn acquire_keyboard(&mut self) {
        self.keyboard = Some(KeyboardState::new());
    }

    pub fn acquire_mouse(&mut self) {
        self.mouse = Some(MouseState::new());
    }

    pub fn attach_controller(&mut self, state: ControllerState) {
        self.controller = Some(state);
    }

    /// Releases every device. Input arriving afterwards is dropped.
    pub fn release_all(&mut self) {
        self.keyboard = None;
        self.mouse = None;
        self.controller = None;
    }

    pub fn has_keyboard(&self) -> bool {
        self.keyboard.is_some()
    }

    pub fn has_mouse(&self) -> bool {
        self.mouse.is_some()
    }

    pub fn has_controller(&self) -> bool {
        self.controller.is_some()
    }

    pub fn keyboard(&self) -> Option<&KeyboardState> {
        self.keyboard.as_ref()
    }

    pub fn mouse(&self) -> Option<&MouseState> {
        self.mouse.as_ref()
    }

    pub fn controller(&self) -> Option<&ControllerState> {
        self.controller.as_ref()
    }

    //--- Pointer Mode -----------------------------------------------------

    /// Switches between absolute (free) and relative (grabbed) motion.
    pub fn set_mouse_grabbed(&mut self, grabbed: bool) {
        if let Some(mouse) = &mut self.mouse {
            mouse.grabbed = grabbed;
        }
    }

    pub fn mouse_grabbed(&self) -> bool {
        self.mouse.as_ref().is_some_and(|mouse| mouse.grabbed)
    }

    /// Delivers the current pointer position as a motion event.
    pub fn report_cursor<K: ScreenKey>(&mut self, x: i32, y: i32, screens: &mut ScreenManager<K>) {
        if let Some(mouse) = &mut self.mouse {
            mouse.report_position(x, y, screens);
        }
    }

    //--- Dispatch ---------------------------------------------------------

    /// Routes one keyboard or mouse event. Returns a hotkey the engine
    /// must execute, if the event triggered one.
    pub fn dispatch_input<K: ScreenKey>(
        &mut self,
        event: RawInputEvent,
        screens: &mut ScreenManager<K>,
    ) -> Option<Hotkey> {
        match event {
            RawInputEvent::Key { code, ch, down } => match &mut self.keyboard {
                Some(keyboard) => keyboard.handle(code, ch, down, screens),
                None => None,
            },
            RawInputEvent::Unidentified => {
                trace!(target: "platform::input", "Unidentified input ignored");
                None
            }
            mouse_event => {
                if let Some(mouse) = &mut self.mouse {
                    mouse.handle(mouse_event, screens);
                }
                None
            }
        }
    }

    /// Routes one controller event.
    pub fn dispatch_controller<K: ScreenKey>(
        &mut self,
        event: ControllerEvent,
        screens: &mut ScreenManager<K>,
    ) {
        if let Some(controller) = &mut self.controller {
            controller.handle(event, screens);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
