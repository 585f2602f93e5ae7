//=========================================================================
// Screen System
//=========================================================================
//
// Single-active-screen state machine with an enter/leave handshake.
//
// Architecture:
//   ScreenManager
//     ├─ screens: HashMap<K, Box<dyn Screen<K>>>
//     ├─ active: Option<K>        (None = loop terminates)
//     └─ context: ScreenContext<K>
//          ├─ settings, mode, screen time
//          ├─ transitions: TransitionQueue<K>
//          └─ requests: Vec<EngineRequest>
//
// Flow:
//   goto() → leave(next) → swap → enter(previous) → apply queued transitions
//
//=========================================================================

//=== Module Declarations =================================================

mod context;
mod manager;
mod transition_queue;

//=== Public API ==========================================================

pub use context::{EngineRequest, ScreenContext};
pub use manager::{ScreenKey, ScreenManager};
pub use transition_queue::{Transition, TransitionQueue};

//=== Internal Dependencies ===============================================

use crate::core::input::{ControllerAxis, KeyCode, MouseButton};

//=== Screen Trait ========================================================

/// An interactive mode of the game (menu, gameplay, replay, dialog).
///
/// Screens are registered with the [`ScreenManager`] under a key and
/// activated one at a time. The engine never inspects a screen's state; it
/// only invokes this contract. Any callback may request a transition through
/// the context; the request is applied once the callback returns.
///
/// Only `paint()` is required. Everything else defaults to doing nothing.
///
/// ```rust
/// # use tiltball_engine::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum GameScreen { Title, Play }
/// # impl ScreenKey for GameScreen {}
/// struct TitleScreen;
///
/// impl Screen<GameScreen> for TitleScreen {
///     fn paint(&mut self, _time: f32, _ctx: &mut ScreenContext<GameScreen>) {}
///
///     fn exit_requested(&mut self, ctx: &mut ScreenContext<GameScreen>) {
///         ctx.exit();
///     }
/// }
/// ```
pub trait Screen<K: ScreenKey> {
    //--- Lifecycle --------------------------------------------------------

    /// Called when the screen becomes active. `previous` is the screen that
    /// was active before (if any).
    fn enter(&mut self, _previous: Option<K>, _ctx: &mut ScreenContext<K>) {}

    /// Called before `next` is entered. `None` means the engine is closing.
    fn leave(&mut self, _next: Option<K>, _ctx: &mut ScreenContext<K>) {}

    /// Draws the screen. `time` is seconds since the engine started.
    fn paint(&mut self, time: f32, ctx: &mut ScreenContext<K>);

    /// Advances the screen's simulation by `dt` seconds.
    fn timer(&mut self, _dt: f32, _ctx: &mut ScreenContext<K>) {}

    //--- Keyboard ---------------------------------------------------------

    fn key_down(&mut self, _code: KeyCode, _ch: Option<char>, _ctx: &mut ScreenContext<K>) {}

    /// `orig_ch` is the character the key produced when it went down.
    fn key_up(
        &mut self,
        _code: KeyCode,
        _ch: Option<char>,
        _orig_ch: Option<char>,
        _ctx: &mut ScreenContext<K>,
    ) {
    }

    fn text_entered(&mut self, _ch: char, _ctx: &mut ScreenContext<K>) {}

    //--- Mouse ------------------------------------------------------------

    fn mouse_down(&mut self, _button: MouseButton, _ctx: &mut ScreenContext<K>) {}

    fn mouse_up(&mut self, _button: MouseButton, _ctx: &mut ScreenContext<K>) {}

    /// Absolute position (bottom-left origin) when the pointer is free,
    /// relative delta when it is grabbed.
    fn mouse_move(&mut self, _x: i32, _y: i32, _dx: i32, _dy: i32, _ctx: &mut ScreenContext<K>) {}

    /// `step` is -1 or +1.
    fn mouse_wheel(&mut self, _step: i32, _ctx: &mut ScreenContext<K>) {}

    //--- Controller -------------------------------------------------------

    fn controller_down(&mut self, _button: usize, _ctx: &mut ScreenContext<K>) {}

    fn controller_up(&mut self, _button: usize, _ctx: &mut ScreenContext<K>) {}

    /// `recentered` is set when the axis was centered before this event,
    /// distinguishing a fresh push from holding.
    fn controller_move(
        &mut self,
        _axis: ControllerAxis,
        _value: f32,
        _recentered: bool,
        _ctx: &mut ScreenContext<K>,
    ) {
    }

    //--- Window -----------------------------------------------------------

    /// Escape or the controller exit button was pressed.
    fn exit_requested(&mut self, _ctx: &mut ScreenContext<K>) {}

    /// The window lost focus.
    fn window_deactivated(&mut self, _ctx: &mut ScreenContext<K>) {}
}
