//=========================================================================
// Keyboard Dispatch
//=========================================================================
//
// Keyboard snapshot and key routing to the active screen.
//
// Key down:  record char → hotkeys / key_down → text_entered (printable)
// Key up:    key_up(char at press time) → text_entered on Alt release
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::event::KeyCode;
use crate::core::screen::{ScreenKey, ScreenManager};

//=== Hotkey ==============================================================

/// Engine-level key binding that needs a collaborator to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    /// F6 with cheats enabled.
    ToggleWireframe,
    /// F12.
    Screenshot,
}

//=== KeyboardState =======================================================

/// Last key event plus the character each key produced when pressed.
///
/// Key-up events report the press-time character because the character
/// reported with the release may differ (modifiers released first, dead
/// keys, layouts).
#[derive(Debug, Default)]
pub struct KeyboardState {
    code: Option<KeyCode>,
    ch: Option<char>,
    down: bool,
    orig_chars: HashMap<KeyCode, char>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last key seen, its character and whether it was a press.
    pub fn last(&self) -> Option<(KeyCode, Option<char>, bool)> {
        self.code.map(|code| (code, self.ch, self.down))
    }

    /// Character recorded at the most recent press of `code`.
    pub fn pressed_char(&self, code: KeyCode) -> Option<char> {
        self.orig_chars.get(&code).copied()
    }

    //--- Dispatch ---------------------------------------------------------

    /// Routes one key event. Returns a hotkey for the engine to execute.
    pub fn handle<K: ScreenKey>(
        &mut self,
        code: KeyCode,
        ch: Option<char>,
        down: bool,
        screens: &mut ScreenManager<K>,
    ) -> Option<Hotkey> {
        self.code = Some(code);
        self.ch = ch;
        self.down = down;

        if down {
            self.key_down(code, ch, screens)
        } else {
            self.key_up(code, ch, screens);
            None
        }
    }

    fn key_down<K: ScreenKey>(
        &mut self,
        code: KeyCode,
        ch: Option<char>,
        screens: &mut ScreenManager<K>,
    ) -> Option<Hotkey> {
        match ch {
            Some(c) => {
                self.orig_chars.insert(code, c);
            }
            None => {
                self.orig_chars.remove(&code);
            }
        }

        let mut hotkey = None;

        match code {
            KeyCode::F6 => {
                if screens.context().settings().debug.cheat {
                    hotkey = Some(Hotkey::ToggleWireframe);
                }
            }
            KeyCode::F9 => {
                let debug_settings = &mut screens.context_mut().settings_mut().debug;
                debug_settings.fps = !debug_settings.fps;
                debug!(target: "engine", "FPS overlay {}", if debug_settings.fps { "on" } else { "off" });
            }
            KeyCode::F12 => hotkey = Some(Hotkey::Screenshot),
            KeyCode::Escape => screens.dispatch(|screen, ctx| screen.exit_requested(ctx)),
            _ => screens.dispatch(|screen, ctx| screen.key_down(code, ch, ctx)),
        }

        if !screens.is_active() {
            return hotkey;
        }

        if let Some(c) = ch.filter(|c| is_printable(*c)) {
            screens.dispatch(|screen, ctx| screen.text_entered(c, ctx));
        }

        hotkey
    }

    fn key_up<K: ScreenKey>(&mut self, code: KeyCode, ch: Option<char>, screens: &mut ScreenManager<K>) {
        let orig_ch = self.pressed_char(code);

        screens.dispatch(|screen, ctx| screen.key_up(code, ch, orig_ch, ctx));

        if !screens.is_active() {
            return;
        }

        // Alt+numpad composition delivers its character with the Alt release.
        if code.is_alt() {
            if let Some(c) = ch.filter(|c| is_printable(*c)) {
                screens.dispatch(|screen, ctx| screen.text_entered(c, ctx));
            }
        }
    }
}

fn is_printable(c: char) -> bool {
    !c.is_control()
}
