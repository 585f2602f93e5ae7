//=========================================================================
// Collaborators
//=========================================================================
//
// Interfaces of the subsystems the engine orchestrates but does not
// implement: window, graphics, audio, resources, renderer, GUI, HUD and
// the game-side function sets.
//
// The engine only drives their lifecycle and calls their one domain
// operation each; everything behind these traits is opaque to it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use log::error;

//=== Internal Dependencies ===============================================

use crate::core::config::RendererSettings;
use crate::core::display::{DisplayMode, PixelFormat};
use crate::core::error::{CapabilityError, UiError};
use crate::core::input::ControllerEvent;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::screen::ScreenKey;

//=== Display =============================================================

/// Parameters for one window creation attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRequest {
    pub title: String,
    pub mode: DisplayMode,
    pub fullscreen: bool,
    /// Top-left corner for windowed mode; `None` lets the OS decide.
    pub position: Option<(i32, i32)>,
    pub vsync: bool,
    pub pixel_format: PixelFormat,
}

/// Native window and event source.
pub trait DisplayBackend {
    /// Every mode the primary monitor supports, in backend order.
    fn available_modes(&mut self) -> Vec<DisplayMode>;

    /// Mode the desktop is currently using.
    fn desktop_mode(&mut self) -> DisplayMode;

    /// Creates the window. Fails if the pixel format is not supported.
    fn create(&mut self, request: &WindowRequest) -> Result<(), CapabilityError>;

    fn destroy(&mut self);

    /// Processes pending native notifications and forwards them to `sink`.
    fn pump_events(&mut self, sink: &Sender<PlatformEvent>);

    /// Window top-left in desktop coordinates.
    fn window_position(&self) -> Option<(i32, i32)>;

    /// Pointer position in window pixels (top-left origin).
    fn cursor_position(&self) -> Option<(i32, i32)>;

    fn set_cursor_grabbed(&mut self, grabbed: bool);

    fn has_keyboard(&self) -> bool {
        true
    }

    fn has_mouse(&self) -> bool {
        true
    }
}

//=== Graphics ============================================================

/// Values the graphics backend is initialized with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsSettings {
    pub width: u32,
    pub height: u32,
    pub reflection: bool,
    pub multisample: u32,
    pub mipmap: bool,
    pub anisotropy: u32,
    pub textures: u32,
}

pub trait GraphicsBackend {
    fn initialize(&mut self, settings: &GraphicsSettings) -> Result<(), CapabilityError>;
    fn deinitialize(&mut self);

    /// Clears the back buffer before painting.
    fn clear(&mut self);

    /// Swaps the front and back buffers.
    fn present(&mut self);

    /// Debug wireframe rendering on/off.
    fn toggle_wireframe(&mut self);
}

//=== Audio ===============================================================

pub trait AudioBackend {
    fn initialize(&mut self, data_root: &Path, buffer: u32) -> Result<(), CapabilityError>;
    fn deinitialize(&mut self);
    fn set_sound_volume(&mut self, volume: u8);
    fn set_music_volume(&mut self, volume: u8);

    /// Plays a sound at `volume` in `0.0..=1.0`.
    fn play_sound(&mut self, path: &str, volume: f32);
}

//=== Resources & Presentation ============================================

/// Data and user-data roots.
pub trait DataFuncs {
    fn initialize(&mut self) -> Result<(), UiError>;
    fn deinitialize(&mut self);

    /// Directory game data (sounds, levels) is read from.
    fn data_root(&self) -> PathBuf;
}

/// 3D resources shared by every screen.
pub trait RendererHome {
    fn initialize(&mut self, settings: &RendererSettings) -> Result<(), UiError>;
    fn deinitialize(&mut self);

    /// Advances time-driven renderer state (animated backgrounds, etc.).
    fn step(&mut self, dt: f32);
}

/// GUI theme resources.
pub trait GuiHome {
    fn initialize(&mut self, theme: &str) -> Result<(), UiError>;
    fn deinitialize(&mut self);
}

pub trait Hud {
    fn initialize(&mut self) -> Result<(), UiError>;
    fn deinitialize(&mut self);

    /// New reading from the FPS counter.
    fn update_fps(&mut self, fps: u32, ms: f32);
}

/// Blocking progress display shown while the engine starts.
pub trait ProgressIndicator {
    fn show(&mut self);

    /// Fades the indicator out and releases it.
    fn hide(&mut self);
}

//=== Game-Side Functions =================================================

/// Game state that depends on renderer resources.
pub trait GameFuncs {
    fn deinitialize(&mut self);
}

/// What the engine needs to know about a loaded replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayInfo {
    /// `false` when the replay was recorded against different level data.
    pub level_compatible: bool,
}

pub trait ReplayFuncs {
    fn load(&mut self, path: &Path) -> Result<ReplayInfo, UiError>;
}

pub trait ScreenshotFuncs {
    /// Saves a screenshot and returns where it was written.
    fn take_screenshot(&mut self) -> Result<PathBuf, UiError>;
}

//=== Controllers =========================================================

/// Opened game controller.
pub trait ControllerSource {
    /// Axis names, indexed like the axis events.
    fn axis_names(&self) -> Vec<String>;

    /// Appends events received since the previous poll.
    fn poll(&mut self, events: &mut Vec<ControllerEvent>);
}

/// Enumerates and opens controllers.
pub trait ControllerProvider {
    /// Opens the controller at `index`, if present.
    fn open(&mut self, index: usize) -> Option<Box<dyn ControllerSource>>;
}

//=== Error Logger ========================================================

/// Receives failures the loop recovers from.
pub trait ErrorLogger {
    fn log(&mut self, error: &UiError);
}

/// Reports recovered failures through `log::error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorLogger;

impl ErrorLogger for LogErrorLogger {
    fn log(&mut self, error: &UiError) {
        error!(target: "engine", "Loop iteration failed: {}", error);
    }
}

//=== Backends ============================================================

/// Every collaborator the engine drives.
pub struct Backends {
    pub display: Box<dyn DisplayBackend>,
    pub graphics: Box<dyn GraphicsBackend>,
    pub audio: Box<dyn AudioBackend>,
    pub data: Box<dyn DataFuncs>,
    pub renderer: Box<dyn RendererHome>,
    pub gui: Box<dyn GuiHome>,
    pub hud: Box<dyn Hud>,
    pub progress: Box<dyn ProgressIndicator>,
    pub game: Box<dyn GameFuncs>,
    pub replay: Box<dyn ReplayFuncs>,
    pub screenshot: Box<dyn ScreenshotFuncs>,
    pub controllers: Option<Box<dyn ControllerProvider>>,
    pub error_logger: Box<dyn ErrorLogger>,
}

//=== StartupScreens ======================================================

/// Screens the engine may enter on its own during startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupScreens<K: ScreenKey> {
    /// Entered in standard mode and when a replay cannot be loaded.
    pub title: K,
    /// Entered for a replay recorded against the current level data.
    pub replay_intro: K,
    /// Entered for a replay recorded against other level data.
    pub replay_warning: K,
}
