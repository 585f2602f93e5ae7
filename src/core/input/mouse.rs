//=========================================================================
// Mouse Dispatch
//=========================================================================
//
// Mouse snapshot and routing to the active screen.
//
// Precedence: button → wheel (normalized to ±1) → motion.
// Motion is absolute with a bottom-left origin while the pointer is free,
// and a relative delta (optionally Y-inverted) while it is grabbed.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::event::{MouseButton, RawInputEvent};
use crate::core::screen::{ScreenKey, ScreenManager};

//=== MouseState ==========================================================

/// Last-known pointer state.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    pub button: Option<MouseButton>,
    pub down: bool,
    pub wheel: i32,
    pub grabbed: bool,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Dispatch ---------------------------------------------------------

    /// Updates the snapshot from `event` and forwards it.
    ///
    /// Absolute moves are swallowed while grabbed, relative motion while
    /// free, so each mode sees one stream.
    pub fn handle<K: ScreenKey>(&mut self, event: RawInputEvent, screens: &mut ScreenManager<K>) {
        match event {
            RawInputEvent::MouseButton { button, down } => {
                self.button = Some(button);
                self.down = down;
                self.wheel = 0;
            }
            RawInputEvent::MouseWheel { delta } if delta != 0 => {
                self.button = None;
                self.wheel = delta;
            }
            RawInputEvent::MouseMoved { x, y } => {
                self.dx = x - self.x;
                self.dy = y - self.y;
                self.x = x;
                self.y = y;
                self.button = None;
                self.wheel = 0;

                if self.grabbed {
                    return;
                }
            }
            RawInputEvent::MouseMotion { dx, dy } => {
                if !self.grabbed {
                    return;
                }

                self.dx = dx;
                self.dy = dy;
                self.button = None;
                self.wheel = 0;
            }
            _ => return,
        }

        self.forward(screens);
    }

    /// Reports the pointer position without a native event (after setup).
    pub fn report_position<K: ScreenKey>(&mut self, x: i32, y: i32, screens: &mut ScreenManager<K>) {
        self.x = x;
        self.y = y;

        let height = screen_height(screens);
        screens.dispatch(|screen, ctx| screen.mouse_move(x, height - y, 0, 0, ctx));
    }

    //--- Internal Helpers -------------------------------------------------

    fn forward<K: ScreenKey>(&self, screens: &mut ScreenManager<K>) {
        if let Some(button) = self.button {
            let down = self.down;
            screens.dispatch(|screen, ctx| {
                if down {
                    screen.mouse_down(button, ctx)
                } else {
                    screen.mouse_up(button, ctx)
                }
            });
        } else if self.wheel != 0 {
            let step = self.wheel.signum();
            screens.dispatch(|screen, ctx| screen.mouse_wheel(step, ctx));
        } else if self.grabbed {
            let invert = screens.context().settings().controls.mouse_invert;
            let (dx, dy) = (self.dx, if invert { self.dy } else { -self.dy });
            screens.dispatch(|screen, ctx| screen.mouse_move(0, 0, dx, dy, ctx));
        } else {
            let (x, y) = (self.x, screen_height(screens) - self.y);
            screens.dispatch(|screen, ctx| screen.mouse_move(x, y, 0, 0, ctx));
        }
    }
}

fn screen_height<K: ScreenKey>(screens: &ScreenManager<K>) -> i32 {
    i32::try_from(screens.context().settings().display.screen_height).unwrap_or(i32::MAX)
}
