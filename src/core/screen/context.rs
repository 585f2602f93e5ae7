//=========================================================================
// Screen Context
//=========================================================================
//
// Shared data container handed to every screen callback.
//
// Contains state that screens read/write:
// - settings: live settings (options screens edit these)
// - mode: how the application was launched
// - screen_time: seconds the active screen has been ticking
// - transitions / requests: commands applied after the callback returns
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{ScreenKey, Transition, TransitionQueue};
use crate::core::config::Settings;
use crate::core::mode::ApplicationMode;

//=== EngineRequest =======================================================

/// Engine-level command a screen can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRequest {
    /// Grab (hide and lock) or release the mouse pointer.
    SetMouseGrabbed(bool),

    /// Recreate window, graphics and everything that depends on them.
    Rebuild,

    /// Reload renderer resources without touching the window.
    RebuildRenderers,
}

//=== ScreenContext =======================================================

/// Context passed to screen callbacks.
pub struct ScreenContext<K: ScreenKey> {
    settings: Settings,
    mode: ApplicationMode,
    pub(super) screen_time: f32,
    pub(super) transitions: TransitionQueue<K>,
    requests: Vec<EngineRequest>,
}

impl<K: ScreenKey> ScreenContext<K> {
    /// Creates a context with no pending commands.
    pub fn new(settings: Settings, mode: ApplicationMode) -> Self {
        Self {
            settings,
            mode,
            screen_time: 0.0,
            transitions: TransitionQueue::new(),
            requests: Vec::new(),
        }
    }

    //--- State ------------------------------------------------------------

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn mode(&self) -> &ApplicationMode {
        &self.mode
    }

    /// Seconds accumulated by `timer` since the active screen was entered.
    pub fn screen_time(&self) -> f32 {
        self.screen_time
    }

    //--- Commands ---------------------------------------------------------

    /// Switches to `screen`, restarting the timer warm-up.
    pub fn goto(&mut self, screen: K) {
        self.transitions.push(Transition {
            target: Some(screen),
            seamless: false,
        });
    }

    /// Switches to `screen` without interrupting simulation timing.
    pub fn goto_seamless(&mut self, screen: K) {
        self.transitions.push(Transition {
            target: Some(screen),
            seamless: true,
        });
    }

    /// Leaves the active screen without entering another; the loop ends.
    pub fn exit(&mut self) {
        self.transitions.push(Transition {
            target: None,
            seamless: false,
        });
    }

    pub fn set_mouse_grabbed(&mut self, grabbed: bool) {
        self.requests.push(EngineRequest::SetMouseGrabbed(grabbed));
    }

    pub fn request_rebuild(&mut self) {
        self.requests.push(EngineRequest::Rebuild);
    }

    pub fn request_rebuild_renderers(&mut self) {
        self.requests.push(EngineRequest::RebuildRenderers);
    }

    /// Takes pending engine requests in the order they were issued.
    pub(crate) fn take_requests(&mut self) -> Vec<EngineRequest> {
        std::mem::take(&mut self.requests)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScreen {
        Title,
    }

    impl ScreenKey for TestScreen {}

    #[test]
    fn commands_queue_in_order() {
        let mut ctx = ScreenContext::<TestScreen>::new(Settings::default(), ApplicationMode::Standard);

        ctx.goto(TestScreen::Title);
        ctx.goto_seamless(TestScreen::Title);
        ctx.exit();
        ctx.set_mouse_grabbed(true);
        ctx.request_rebuild();

        let transitions = ctx.transitions.take();
        assert_eq!(transitions.len(), 3);
        assert!(!transitions[0].seamless);
        assert!(transitions[1].seamless);
        assert_eq!(transitions[2].target, None);

        assert_eq!(
            ctx.take_requests(),
            vec![EngineRequest::SetMouseGrabbed(true), EngineRequest::Rebuild]
        );
        assert!(ctx.take_requests().is_empty());
    }

    #[test]
    fn settings_are_editable() {
        let mut ctx = ScreenContext::<TestScreen>::new(Settings::default(), ApplicationMode::Standard);
        ctx.settings_mut().debug.fps = true;
        assert!(ctx.settings().debug.fps);
    }
}
