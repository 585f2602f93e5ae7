//=========================================================================
// Tiltball Engine
//
// Main entry point and coordinator for the game runtime.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──initialize()──>  run()  ──>  deinitialize()
//         │                          │
//         ├─ with_settings()         ├─ rebuild()            (display + dependents)
//         ├─ with_mode()             └─ rebuild_renderers()  (3D resources only)
//         └─ register_screen()
// ```
//
// Submodules:
// - `lifecycle`: ordered bring-up and teardown of every subsystem
// - `frame_loop`: the single execution loop and request servicing
//
//=========================================================================

//=== Module Declarations =================================================

mod frame_loop;
mod lifecycle;

//=== External Dependencies ===============================================

use std::time::Instant;

use crossbeam_channel::{bounded, Sender};
use log::info;

//=== Internal Dependencies ===============================================

use crate::core::backend::{Backends, ControllerSource, StartupScreens};
use crate::core::config::Settings;
use crate::core::display::{sorted_modes, DisplayMode};
use crate::core::error::UiError;
use crate::core::input::{ControllerEvent, InputDispatcher};
use crate::core::mode::ApplicationMode;
use crate::core::platform_bridge::{EventCollector, PlatformEvent};
use crate::core::screen::{Screen, ScreenContext, ScreenKey, ScreenManager};
use crate::core::timing::{FpsCounter, FrameClock};

use lifecycle::Subsystems;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Settings**: [`Settings::default`]
/// - **Mode**: [`ApplicationMode::Standard`]
/// - **Window title**: "Tiltball"
/// - **Channel capacity**: 128 events
///
/// # Examples
///
/// ```no_run
/// # use tiltball_engine::prelude::*;
/// # fn backends() -> Backends { unimplemented!() }
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum GameScreen { Title, ReplayIntro, ReplayWarning }
/// # impl ScreenKey for GameScreen {}
/// # struct TitleScreen;
/// # impl Screen<GameScreen> for TitleScreen {
/// #     fn paint(&mut self, _time: f32, _ctx: &mut ScreenContext<GameScreen>) {}
/// # }
/// let startup = StartupScreens {
///     title: GameScreen::Title,
///     replay_intro: GameScreen::ReplayIntro,
///     replay_warning: GameScreen::ReplayWarning,
/// };
///
/// let mut engine = EngineBuilder::new(backends(), startup)
///     .with_settings(Settings::load_or_default("tiltball.toml".as_ref()))
///     .register_screen(GameScreen::Title, TitleScreen)
///     .build();
///
/// engine.initialize()?;
/// let result = engine.run();
/// engine.deinitialize();
/// result?;
/// # Ok::<(), UiError>(())
/// ```
pub struct EngineBuilder<K: ScreenKey> {
    backends: Backends,
    startup: StartupScreens<K>,
    settings: Settings,
    mode: ApplicationMode,
    title: String,
    channel_capacity: usize,
    screens: Vec<(K, Box<dyn Screen<K>>)>,
    time_source: fn() -> Instant,
}

impl<K: ScreenKey> EngineBuilder<K> {
    /// Creates a builder driving `backends`.
    pub fn new(backends: Backends, startup: StartupScreens<K>) -> Self {
        Self {
            backends,
            startup,
            settings: Settings::default(),
            mode: ApplicationMode::Standard,
            title: "Tiltball".to_string(),
            channel_capacity: 128,
            screens: Vec::new(),
            time_source: Instant::now,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets how the application was launched (selects the first screen).
    pub fn with_mode(mut self, mode: ApplicationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the channel capacity for platform → loop communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Registers a screen under `key`.
    pub fn register_screen<T>(mut self, key: K, screen: T) -> Self
    where
        T: Screen<K> + 'static,
    {
        self.screens.push((key, Box::new(screen)));
        self
    }

    #[cfg(test)]
    pub(crate) fn with_time_source(mut self, source: fn() -> Instant) -> Self {
        self.time_source = source;
        self
    }

    /// Builds the engine. Nothing is initialized until
    /// [`Engine::initialize`].
    pub fn build(self) -> Engine<K> {
        info!(target: "engine", "Building engine ({} screens, channel: {})", self.screens.len(), self.channel_capacity);

        let mut screens = ScreenManager::new(ScreenContext::new(self.settings, self.mode));
        for (key, screen) in self.screens {
            screens.register_boxed(key, screen);
        }

        let (sender, receiver) = bounded(self.channel_capacity);

        Engine {
            backends: self.backends,
            screens,
            input: InputDispatcher::new(),
            controller: None,
            controller_events: Vec::new(),
            startup: self.startup,
            title: self.title,
            sender,
            collector: EventCollector::new(receiver),
            clock: FrameClock::with_source(self.time_source),
            fps: None,
            subsystems: Subsystems::default(),
            window_active: false,
            mouse_grabbed: false,
            fatal: None,
        }
    }
}

//=== Engine ==============================================================

/// Game runtime: owns the screens, the subsystem lifecycle and the loop.
///
/// # Lifecycle
///
/// 1. [`Engine::initialize`] brings every subsystem up and enters the first
///    screen
/// 2. [`Engine::run`] loops until no screen is active
/// 3. [`Engine::deinitialize`] tears everything down in reverse order
pub struct Engine<K: ScreenKey> {
    backends: Backends,
    screens: ScreenManager<K>,
    input: InputDispatcher,
    controller: Option<Box<dyn ControllerSource>>,
    controller_events: Vec<ControllerEvent>,
    startup: StartupScreens<K>,
    title: String,
    sender: Sender<PlatformEvent>,
    collector: EventCollector,
    clock: FrameClock,
    fps: Option<FpsCounter>,
    subsystems: Subsystems,
    window_active: bool,
    mouse_grabbed: bool,
    fatal: Option<UiError>,
}

impl<K: ScreenKey> Engine<K> {
    //--- State ------------------------------------------------------------

    pub fn settings(&self) -> &Settings {
        self.screens.context().settings()
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        self.screens.context_mut().settings_mut()
    }

    pub fn mode(&self) -> &ApplicationMode {
        self.screens.context().mode()
    }

    pub fn active_screen(&self) -> Option<K> {
        self.screens.active()
    }

    pub fn window_active(&self) -> bool {
        self.window_active
    }

    /// Error stored by a failed rebuild, re-raised when the loop exits.
    pub fn deferred_error(&self) -> Option<&UiError> {
        self.fatal.as_ref()
    }

    /// Display modes for option screens: one per resolution, largest
    /// first.
    pub fn display_modes(&mut self) -> Vec<DisplayMode> {
        let desktop = self.backends.display.desktop_mode();
        let available = self.backends.display.available_modes();
        sorted_modes(&available, &desktop)
    }

    //--- Screens ----------------------------------------------------------

    /// Switches the active screen from outside any screen callback.
    pub fn goto(&mut self, screen: Option<K>, seamless: bool) {
        self.screens.goto(screen, seamless);
    }

    /// Grabs (hides and locks) or releases the pointer.
    pub fn set_mouse_grabbed(&mut self, grabbed: bool) {
        self.mouse_grabbed = grabbed;
        self.input.set_mouse_grabbed(grabbed);
        if self.subsystems.display {
            self.backends.display.set_cursor_grabbed(grabbed);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{Fixture, TestScreen, STARTUP};

    fn builder(fixture: &Fixture) -> EngineBuilder<TestScreen> {
        EngineBuilder::new(fixture.backends(), STARTUP)
    }

    #[test]
    fn builder_defaults() {
        let builder = builder(&Fixture::new());

        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.title, "Tiltball");
        assert_eq!(builder.mode, ApplicationMode::Standard);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        builder(&Fixture::new()).with_channel_capacity(0);
    }

    #[test]
    fn built_engine_is_idle() {
        let engine = builder(&Fixture::new())
            .with_mode(ApplicationMode::Replay("run.nbr".into()))
            .build();

        assert_eq!(engine.active_screen(), None);
        assert_eq!(engine.mode(), &ApplicationMode::Replay("run.nbr".into()));
        assert!(engine.deferred_error().is_none());
        assert!(!engine.window_active());
    }

    #[test]
    fn display_modes_are_sorted_largest_first() {
        let fixture = Fixture::new();
        let mut engine = builder(&fixture).build();

        let modes: Vec<(u32, u32)> = engine.display_modes().iter().map(|m| (m.width, m.height)).collect();

        assert_eq!(modes, vec![(1024, 768), (800, 600), (640, 480)]);
    }
}
