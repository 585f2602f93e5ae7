//=========================================================================
// Test Fixtures
//=========================================================================
//
// Recording doubles for screens and every collaborator.
//
// Each double appends a line to a shared call log, so tests can assert
// ordering across subsystems ("graphics.initialize" before
// "progress.show", "Title.leave(None)" before "hud.deinitialize", ...).
// Failure knobs live in the same shared state.
//
//=========================================================================

#![allow(dead_code)]

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

//=== Internal Dependencies ===============================================

use crate::core::backend::*;
use crate::core::config::{RendererSettings, Settings};
use crate::core::display::DisplayMode;
use crate::core::error::{CapabilityError, UiError};
use crate::core::input::{ControllerAxis, ControllerEvent, KeyCode, MouseButton};
use crate::core::mode::ApplicationMode;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::screen::{EngineRequest, Screen, ScreenContext, ScreenKey, ScreenManager};
use crate::engine::{Engine, EngineBuilder};

//=== Screens =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TestScreen {
    Title,
    Game,
    ReplayIntro,
    ReplayWarning,
}

impl ScreenKey for TestScreen {}

pub(crate) const STARTUP: StartupScreens<TestScreen> = StartupScreens {
    title: TestScreen::Title,
    replay_intro: TestScreen::ReplayIntro,
    replay_warning: TestScreen::ReplayWarning,
};

/// One-shot reaction of a recording screen to a callback.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ScreenAction {
    Goto(TestScreen),
    GotoSeamless(TestScreen),
    Exit,
    Request(EngineRequest),
    Panic,
}

#[derive(Default)]
struct ScreenLogInner {
    entries: Vec<(TestScreen, String)>,
    reactions: Vec<(&'static str, ScreenAction)>,
}

/// Callback log shared by every recording screen.
#[derive(Clone, Default)]
pub(crate) struct ScreenLog(Rc<RefCell<ScreenLogInner>>);

impl ScreenLog {
    /// Takes recorded callbacks without the screen name.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut self.0.borrow_mut().entries)
            .into_iter()
            .map(|(_, entry)| entry)
            .collect()
    }

    /// Takes recorded callbacks as `Screen.callback(...)`.
    pub fn take_tagged(&self) -> Vec<String> {
        std::mem::take(&mut self.0.borrow_mut().entries)
            .into_iter()
            .map(|(screen, entry)| format!("{:?}.{}", screen, entry))
            .collect()
    }

    /// Performs `action` the next time any screen receives `callback`.
    pub fn on(&self, callback: &'static str, action: ScreenAction) {
        self.0.borrow_mut().reactions.push((callback, action));
    }

    pub fn exit_on(&self, callback: &'static str) {
        self.on(callback, ScreenAction::Exit);
    }

    fn record(&self, screen: TestScreen, callback: &'static str, entry: String, ctx: &mut ScreenContext<TestScreen>) {
        let action = {
            let mut inner = self.0.borrow_mut();
            inner.entries.push((screen, entry));
            let index = inner.reactions.iter().position(|(name, _)| *name == callback);
            index.map(|i| inner.reactions.remove(i).1)
        };

        match action {
            Some(ScreenAction::Goto(next)) => ctx.goto(next),
            Some(ScreenAction::GotoSeamless(next)) => ctx.goto_seamless(next),
            Some(ScreenAction::Exit) => ctx.exit(),
            Some(ScreenAction::Request(EngineRequest::SetMouseGrabbed(grabbed))) => ctx.set_mouse_grabbed(grabbed),
            Some(ScreenAction::Request(EngineRequest::Rebuild)) => ctx.request_rebuild(),
            Some(ScreenAction::Request(EngineRequest::RebuildRenderers)) => ctx.request_rebuild_renderers(),
            Some(ScreenAction::Panic) => panic!("{:?} panicked in {}", screen, callback),
            None => {}
        }
    }
}

/// Screen recording every callback it receives.
pub(crate) struct RecordingScreen {
    key: TestScreen,
    log: ScreenLog,
}

impl RecordingScreen {
    pub fn new(key: TestScreen, log: &ScreenLog) -> Self {
        Self { key, log: log.clone() }
    }

    fn record(&self, callback: &'static str, entry: String, ctx: &mut ScreenContext<TestScreen>) {
        self.log.record(self.key, callback, entry, ctx);
    }
}

impl Screen<TestScreen> for RecordingScreen {
    fn enter(&mut self, previous: Option<TestScreen>, ctx: &mut ScreenContext<TestScreen>) {
        self.record("enter", format!("enter({:?})", previous), ctx);
    }

    fn leave(&mut self, next: Option<TestScreen>, ctx: &mut ScreenContext<TestScreen>) {
        self.record("leave", format!("leave({:?})", next), ctx);
    }

    fn paint(&mut self, _time: f32, ctx: &mut ScreenContext<TestScreen>) {
        self.record("paint", "paint".to_string(), ctx);
    }

    fn timer(&mut self, dt: f32, ctx: &mut ScreenContext<TestScreen>) {
        self.record("timer", format!("timer({})", dt), ctx);
    }

    fn key_down(&mut self, code: KeyCode, ch: Option<char>, ctx: &mut ScreenContext<TestScreen>) {
        self.record("key_down", format!("key_down({:?}, {:?})", code, ch), ctx);
    }

    fn key_up(&mut self, code: KeyCode, ch: Option<char>, orig_ch: Option<char>, ctx: &mut ScreenContext<TestScreen>) {
        self.record("key_up", format!("key_up({:?}, {:?}, {:?})", code, ch, orig_ch), ctx);
    }

    fn text_entered(&mut self, ch: char, ctx: &mut ScreenContext<TestScreen>) {
        self.record("text_entered", format!("text_entered({:?})", ch), ctx);
    }

    fn mouse_down(&mut self, button: MouseButton, ctx: &mut ScreenContext<TestScreen>) {
        self.record("mouse_down", format!("mouse_down({:?})", button), ctx);
    }

    fn mouse_up(&mut self, button: MouseButton, ctx: &mut ScreenContext<TestScreen>) {
        self.record("mouse_up", format!("mouse_up({:?})", button), ctx);
    }

    fn mouse_move(&mut self, x: i32, y: i32, dx: i32, dy: i32, ctx: &mut ScreenContext<TestScreen>) {
        self.record("mouse_move", format!("mouse_move({}, {}, {}, {})", x, y, dx, dy), ctx);
    }

    fn mouse_wheel(&mut self, step: i32, ctx: &mut ScreenContext<TestScreen>) {
        self.record("mouse_wheel", format!("mouse_wheel({})", step), ctx);
    }

    fn controller_down(&mut self, button: usize, ctx: &mut ScreenContext<TestScreen>) {
        self.record("controller_down", format!("controller_down({})", button), ctx);
    }

    fn controller_up(&mut self, button: usize, ctx: &mut ScreenContext<TestScreen>) {
        self.record("controller_up", format!("controller_up({})", button), ctx);
    }

    fn controller_move(&mut self, axis: ControllerAxis, value: f32, recentered: bool, ctx: &mut ScreenContext<TestScreen>) {
        self.record("controller_move", format!("controller_move({:?}, {}, {})", axis, value, recentered), ctx);
    }

    fn exit_requested(&mut self, ctx: &mut ScreenContext<TestScreen>) {
        self.record("exit_requested", "exit_requested".to_string(), ctx);
    }

    fn window_deactivated(&mut self, ctx: &mut ScreenContext<TestScreen>) {
        self.record("window_deactivated", "window_deactivated".to_string(), ctx);
    }
}

/// Manager with a recording screen for every key, `Title` active and the
/// log cleared.
pub(crate) fn screens_with_recorder(settings: Settings) -> (ScreenManager<TestScreen>, ScreenLog) {
    let log = ScreenLog::default();
    let mut screens = ScreenManager::new(ScreenContext::new(settings, ApplicationMode::Standard));
    for key in [TestScreen::Title, TestScreen::Game, TestScreen::ReplayIntro, TestScreen::ReplayWarning] {
        screens.register_screen(key, RecordingScreen::new(key, &log));
    }
    screens.goto(Some(TestScreen::Title), false);
    log.take();
    (screens, log)
}

/// Engine over `fixture` with a recording screen for every key and the
/// fake clock. Nothing is initialized yet.
pub(crate) fn engine_with_recorder(fixture: &Fixture, settings: Settings, mode: ApplicationMode) -> (Engine<TestScreen>, ScreenLog) {
    let log = ScreenLog::default();
    let mut builder = EngineBuilder::new(fixture.backends(), STARTUP)
        .with_settings(settings)
        .with_mode(mode)
        .with_time_source(fake_now);
    for key in [TestScreen::Title, TestScreen::Game, TestScreen::ReplayIntro, TestScreen::ReplayWarning] {
        builder = builder.register_screen(key, RecordingScreen::new(key, &log));
    }
    (builder.build(), log)
}

//=== Fake Time ===========================================================

/// Advance of the fake clock per reading.
pub(crate) const FAKE_FRAME: Duration = Duration::from_millis(20);

thread_local! {
    static FAKE_NOW: Cell<Option<Instant>> = const { Cell::new(None) };
}

/// Time source advancing by [`FAKE_FRAME`] on every call.
pub(crate) fn fake_now() -> Instant {
    FAKE_NOW.with(|now| {
        let next = match now.get() {
            Some(instant) => instant + FAKE_FRAME,
            None => Instant::now(),
        };
        now.set(Some(next));
        next
    })
}

//=== Collaborator Doubles ================================================

/// Knobs and call log shared by all doubles.
pub(crate) struct FixtureState {
    pub calls: Vec<String>,

    pub modes: Vec<DisplayMode>,
    pub desktop: DisplayMode,
    /// Number of upcoming window creations that fail.
    pub window_failures: usize,
    pub window_created: bool,
    pub last_request: Option<WindowRequest>,
    pub window_position: Option<(i32, i32)>,
    pub cursor: Option<(i32, i32)>,
    pub has_keyboard: bool,
    pub has_mouse: bool,
    /// Batches delivered by successive pumps.
    pub pumps: VecDeque<Vec<PlatformEvent>>,
    /// Whether a created window reports focus on the next pump.
    pub focus_on_create: bool,
    /// Notifications raised by the window itself, sent before `pumps`.
    pub window_events: Vec<PlatformEvent>,

    pub graphics_failures: usize,
    pub audio_fails: bool,
    pub replay: Result<ReplayInfo, UiError>,
    pub screenshot_fails: bool,

    /// Axis names of the attached controller; `None` when unplugged.
    pub controller_axes: Option<Vec<String>>,
    pub controller_polls: VecDeque<Vec<ControllerEvent>>,

    pub logged_errors: Vec<UiError>,
}

impl Default for FixtureState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            modes: vec![
                DisplayMode::new(640, 480, 24, 60),
                DisplayMode::new(800, 600, 24, 60),
                DisplayMode::new(1024, 768, 24, 60),
            ],
            desktop: DisplayMode::new(1920, 1080, 24, 60),
            window_failures: 0,
            window_created: false,
            last_request: None,
            window_position: Some((40, 30)),
            cursor: None,
            has_keyboard: true,
            has_mouse: true,
            pumps: VecDeque::new(),
            focus_on_create: true,
            window_events: Vec::new(),
            graphics_failures: 0,
            audio_fails: false,
            replay: Ok(ReplayInfo { level_compatible: true }),
            screenshot_fails: false,
            controller_axes: None,
            controller_polls: VecDeque::new(),
            logged_errors: Vec::new(),
        }
    }
}

type Shared = Rc<RefCell<FixtureState>>;

/// Builds [`Backends`] whose doubles share one [`FixtureState`].
#[derive(Clone, Default)]
pub(crate) struct Fixture {
    state: Shared,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> std::cell::RefMut<'_, FixtureState> {
        self.state.borrow_mut()
    }

    /// Takes the call log.
    pub fn take_calls(&self) -> Vec<String> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    /// Calls recorded so far whose name starts with `prefix`.
    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Queues events for the next pump that has none queued.
    pub fn push_pump(&self, events: Vec<PlatformEvent>) {
        self.state.borrow_mut().pumps.push_back(events);
    }

    pub fn backends(&self) -> Backends {
        Backends {
            display: Box::new(FakeDisplay(self.state.clone())),
            graphics: Box::new(FakeGraphics(self.state.clone())),
            audio: Box::new(FakeAudio(self.state.clone())),
            data: Box::new(FakeData(self.state.clone())),
            renderer: Box::new(FakeRenderer(self.state.clone())),
            gui: Box::new(FakeGui(self.state.clone())),
            hud: Box::new(FakeHud(self.state.clone())),
            progress: Box::new(FakeProgress(self.state.clone())),
            game: Box::new(FakeGame(self.state.clone())),
            replay: Box::new(FakeReplay(self.state.clone())),
            screenshot: Box::new(FakeScreenshot(self.state.clone())),
            controllers: Some(Box::new(FakeControllers(self.state.clone()))),
            error_logger: Box::new(FakeErrorLogger(self.state.clone())),
        }
    }
}

fn call(state: &Shared, entry: impl Into<String>) {
    state.borrow_mut().calls.push(entry.into());
}

//--- Display -------------------------------------------------------------

struct FakeDisplay(Shared);

impl DisplayBackend for FakeDisplay {
    fn available_modes(&mut self) -> Vec<DisplayMode> {
        self.0.borrow().modes.clone()
    }

    fn desktop_mode(&mut self) -> DisplayMode {
        self.0.borrow().desktop
    }

    fn create(&mut self, request: &WindowRequest) -> Result<(), CapabilityError> {
        let mut state = self.0.borrow_mut();
        state.calls.push(format!(
            "display.create({}x{}, samples {}, reflection {})",
            request.mode.width, request.mode.height, request.pixel_format.samples, request.pixel_format.reflection
        ));
        state.last_request = Some(request.clone());

        if state.window_failures > 0 {
            state.window_failures -= 1;
            return Err(CapabilityError::Window("pixel format rejected".to_string()));
        }

        state.window_created = true;
        if state.focus_on_create {
            state.window_events.push(PlatformEvent::Focused(true));
        }
        Ok(())
    }

    fn destroy(&mut self) {
        let mut state = self.0.borrow_mut();
        state.calls.push("display.destroy".to_string());
        state.window_created = false;
    }

    fn pump_events(&mut self, sink: &Sender<PlatformEvent>) {
        let (window_events, batch) = {
            let mut state = self.0.borrow_mut();
            (std::mem::take(&mut state.window_events), state.pumps.pop_front())
        };
        for event in window_events.into_iter().chain(batch.into_iter().flatten()) {
            let _ = sink.send(event);
        }
    }

    fn window_position(&self) -> Option<(i32, i32)> {
        self.0.borrow().window_position
    }

    fn cursor_position(&self) -> Option<(i32, i32)> {
        self.0.borrow().cursor
    }

    fn set_cursor_grabbed(&mut self, grabbed: bool) {
        call(&self.0, format!("display.set_cursor_grabbed({})", grabbed));
    }

    fn has_keyboard(&self) -> bool {
        self.0.borrow().has_keyboard
    }

    fn has_mouse(&self) -> bool {
        self.0.borrow().has_mouse
    }
}

//--- Graphics & Audio ----------------------------------------------------

struct FakeGraphics(Shared);

impl GraphicsBackend for FakeGraphics {
    fn initialize(&mut self, settings: &GraphicsSettings) -> Result<(), CapabilityError> {
        let mut state = self.0.borrow_mut();
        state.calls.push(format!("graphics.initialize({}x{})", settings.width, settings.height));

        if state.graphics_failures > 0 {
            state.graphics_failures -= 1;
            return Err(CapabilityError::Graphics("no suitable context".to_string()));
        }
        Ok(())
    }

    fn deinitialize(&mut self) {
        call(&self.0, "graphics.deinitialize");
    }

    fn clear(&mut self) {
        call(&self.0, "graphics.clear");
    }

    fn present(&mut self) {
        call(&self.0, "graphics.present");
    }

    fn toggle_wireframe(&mut self) {
        call(&self.0, "graphics.toggle_wireframe");
    }
}

struct FakeAudio(Shared);

impl AudioBackend for FakeAudio {
    fn initialize(&mut self, data_root: &Path, buffer: u32) -> Result<(), CapabilityError> {
        let mut state = self.0.borrow_mut();
        state.calls.push(format!("audio.initialize({}, {})", data_root.display(), buffer));

        if state.audio_fails {
            return Err(CapabilityError::Audio("no device".to_string()));
        }
        Ok(())
    }

    fn deinitialize(&mut self) {
        call(&self.0, "audio.deinitialize");
    }

    fn set_sound_volume(&mut self, volume: u8) {
        call(&self.0, format!("audio.set_sound_volume({})", volume));
    }

    fn set_music_volume(&mut self, volume: u8) {
        call(&self.0, format!("audio.set_music_volume({})", volume));
    }

    fn play_sound(&mut self, path: &str, volume: f32) {
        call(&self.0, format!("audio.play_sound({}, {})", path, volume));
    }
}

//--- Resources & Presentation --------------------------------------------

struct FakeData(Shared);

impl DataFuncs for FakeData {
    fn initialize(&mut self) -> Result<(), UiError> {
        call(&self.0, "data.initialize");
        Ok(())
    }

    fn deinitialize(&mut self) {
        call(&self.0, "data.deinitialize");
    }

    fn data_root(&self) -> PathBuf {
        PathBuf::from("data")
    }
}

struct FakeRenderer(Shared);

impl RendererHome for FakeRenderer {
    fn initialize(&mut self, settings: &RendererSettings) -> Result<(), UiError> {
        call(&self.0, format!("renderer.initialize(fov {})", settings.view_fov));
        Ok(())
    }

    fn deinitialize(&mut self) {
        call(&self.0, "renderer.deinitialize");
    }

    fn step(&mut self, dt: f32) {
        call(&self.0, format!("renderer.step({})", dt));
    }
}

struct FakeGui(Shared);

impl GuiHome for FakeGui {
    fn initialize(&mut self, theme: &str) -> Result<(), UiError> {
        call(&self.0, format!("gui.initialize({})", theme));
        Ok(())
    }

    fn deinitialize(&mut self) {
        call(&self.0, "gui.deinitialize");
    }
}

struct FakeHud(Shared);

impl Hud for FakeHud {
    fn initialize(&mut self) -> Result<(), UiError> {
        call(&self.0, "hud.initialize");
        Ok(())
    }

    fn deinitialize(&mut self) {
        call(&self.0, "hud.deinitialize");
    }

    fn update_fps(&mut self, fps: u32, _ms: f32) {
        call(&self.0, format!("hud.update_fps({})", fps));
    }
}

struct FakeProgress(Shared);

impl ProgressIndicator for FakeProgress {
    fn show(&mut self) {
        call(&self.0, "progress.show");
    }

    fn hide(&mut self) {
        call(&self.0, "progress.hide");
    }
}

//--- Game-Side Functions -------------------------------------------------

struct FakeGame(Shared);

impl GameFuncs for FakeGame {
    fn deinitialize(&mut self) {
        call(&self.0, "game.deinitialize");
    }
}

struct FakeReplay(Shared);

impl ReplayFuncs for FakeReplay {
    fn load(&mut self, path: &Path) -> Result<ReplayInfo, UiError> {
        let mut state = self.0.borrow_mut();
        state.calls.push(format!("replay.load({})", path.display()));
        state.replay.clone()
    }
}

struct FakeScreenshot(Shared);

impl ScreenshotFuncs for FakeScreenshot {
    fn take_screenshot(&mut self) -> Result<PathBuf, UiError> {
        let mut state = self.0.borrow_mut();
        state.calls.push("screenshot.take".to_string());

        if state.screenshot_fails {
            return Err(UiError::subsystem("screenshot", "disk full"));
        }
        Ok(PathBuf::from("screenshots/shot0001.png"))
    }
}

//--- Controllers ---------------------------------------------------------

struct FakeControllers(Shared);

impl ControllerProvider for FakeControllers {
    fn open(&mut self, index: usize) -> Option<Box<dyn ControllerSource>> {
        call(&self.0, format!("controllers.open({})", index));
        let axes = self.0.borrow().controller_axes.clone()?;
        Some(Box::new(FakeController {
            state: self.0.clone(),
            axes,
        }))
    }
}

struct FakeController {
    state: Shared,
    axes: Vec<String>,
}

impl ControllerSource for FakeController {
    fn axis_names(&self) -> Vec<String> {
        self.axes.clone()
    }

    fn poll(&mut self, events: &mut Vec<ControllerEvent>) {
        if let Some(batch) = self.state.borrow_mut().controller_polls.pop_front() {
            events.extend(batch);
        }
    }
}

//--- Error Logger --------------------------------------------------------

struct FakeErrorLogger(Shared);

impl ErrorLogger for FakeErrorLogger {
    fn log(&mut self, error: &UiError) {
        let mut state = self.0.borrow_mut();
        state.calls.push("error_logger.log".to_string());
        state.logged_errors.push(error.clone());
    }
}
