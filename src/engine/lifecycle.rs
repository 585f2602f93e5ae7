//=========================================================================
// Subsystem Lifecycle
//=========================================================================
//
// Ordered bring-up and teardown of every collaborator.
//
// Initialization:
//   display + graphics → progress → input → data → renderer → gui
//   → audio → fps → hud → startup screen → sound preload
//   → progress hide → event flush → clock reset
//
// Rebuild tears down the display and its dependents, then recreates
// them. Deinitialize releases everything in reverse:
//   hud → fps → game → audio → gui → renderer → data → input
//   → graphics → display
//
// Every step records itself in `Subsystems`, so teardown only touches
// what was actually brought up.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::Engine;
use crate::core::backend::{GraphicsSettings, WindowRequest};
use crate::core::display::{create_with_fallback, negotiate, PixelFormat};
use crate::core::error::UiError;
use crate::core::input::{AxisBinding, ControllerState};
use crate::core::mode::ApplicationMode;
use crate::core::screen::ScreenKey;
use crate::core::timing::FpsCounter;

/// UI sounds played silently during startup so the audio backend
/// allocates their buffers before first use.
pub(super) const PRELOAD_SOUNDS: [&str; 2] = ["snd/menu.ogg", "snd/select.ogg"];

//=== Subsystems ==========================================================

/// Which collaborators are currently initialized.
///
/// `display` covers both the window and the graphics backend: a graphics
/// failure destroys the window it was created on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct Subsystems {
    pub display: bool,
    pub progress: bool,
    pub input: bool,
    pub data: bool,
    pub renderer: bool,
    pub gui: bool,
    pub audio: bool,
    pub hud: bool,
}

//=== Lifecycle ===========================================================

impl<K: ScreenKey> Engine<K> {
    //--- Public API -------------------------------------------------------

    /// Brings every subsystem up and enters the first screen.
    ///
    /// On failure everything initialized so far is released again before
    /// the error is returned.
    pub fn initialize(&mut self) -> Result<(), UiError> {
        info!(target: "engine", "Initializing engine");
        self.clock.restart();

        if let Err(e) = self.bring_up() {
            error!(target: "engine", "Initialization failed: {}", e);
            self.deinitialize();
            return Err(e);
        }

        self.fatal = None;
        info!(target: "engine", "Engine initialized, active screen: {:?}", self.screens.active());
        Ok(())
    }

    /// Recreates the window, graphics and everything depending on them.
    ///
    /// A failure is stored and re-raised when [`Engine::run`] returns, in
    /// addition to being returned here. A later successful rebuild clears
    /// it.
    pub fn rebuild(&mut self) -> Result<(), UiError> {
        info!(target: "engine", "Rebuilding display");

        if self.subsystems.display {
            self.teardown_display();
        }

        let result = self.bring_up_display();
        self.settle_fatal(result)
    }

    /// Reloads renderer resources without touching the window.
    pub fn rebuild_renderers(&mut self) -> Result<(), UiError> {
        info!(target: "engine", "Rebuilding renderer resources");

        self.backends.game.deinitialize();
        if self.subsystems.renderer {
            self.backends.renderer.deinitialize();
            self.subsystems.renderer = false;
        }

        let result = self.init_renderer();
        self.settle_fatal(result)
    }

    /// Leaves the active screen and releases every subsystem in reverse
    /// initialization order. Safe to call more than once.
    pub fn deinitialize(&mut self) {
        info!(target: "engine", "Deinitializing engine");

        if self.screens.is_active() {
            self.screens.goto(None, false);
        }

        self.hide_progress();
        self.release_hud();
        self.fps = None;

        if self.subsystems.display {
            self.backends.game.deinitialize();
        }

        if self.subsystems.audio {
            self.backends.audio.deinitialize();
            self.subsystems.audio = false;
        }

        self.release_gui();
        self.release_renderer();

        if self.subsystems.data {
            self.backends.data.deinitialize();
            self.subsystems.data = false;
        }

        if self.subsystems.display {
            self.release_device();
        }

        self.fatal = None;
    }

    //--- Bring-Up ---------------------------------------------------------

    fn bring_up(&mut self) -> Result<(), UiError> {
        self.create_display()?;

        self.backends.progress.show();
        self.subsystems.progress = true;

        self.acquire_input();

        self.backends.data.initialize()?;
        self.subsystems.data = true;

        self.init_renderer()?;
        self.init_gui()?;
        self.init_audio()?;

        self.fps = Some(FpsCounter::new(self.clock.now()));
        self.init_hud()?;

        self.enter_startup_screen();
        self.service_requests();

        for sound in PRELOAD_SOUNDS {
            self.backends.audio.play_sound(sound, 0.0);
        }

        self.hide_progress();
        self.flush_events();

        let now = self.clock.now();
        self.clock.reset(now);
        Ok(())
    }

    /// Display-dependent part of initialization, shared with rebuild.
    fn bring_up_display(&mut self) -> Result<(), UiError> {
        self.create_display()?;
        self.acquire_input();
        self.init_renderer()?;
        self.init_gui()?;
        self.init_hud()?;
        self.report_cursor();
        Ok(())
    }

    /// Negotiates the mode, creates the window through the pixel format
    /// fallback chain, then initializes graphics on it.
    fn create_display(&mut self) -> Result<(), UiError> {
        let settings = self.settings().display.clone();

        // A new window is inactive until the platform reports focus.
        self.window_active = false;

        let desired = (settings.screen_width > 0 && settings.screen_height > 0)
            .then_some((settings.screen_width, settings.screen_height));
        let desktop = self.backends.display.desktop_mode();
        let available = self.backends.display.available_modes();
        let mode = negotiate(desired, &desktop, &available);

        let fullscreen = settings.fullscreen && mode.fullscreen_capable;
        if settings.fullscreen && !fullscreen {
            warn!(target: "engine", "{}x{} is not a fullscreen mode, using a window", mode.width, mode.height);
        }

        // (0, 0) is the unsaved default; let the OS place the window.
        let position = match (settings.window_x, settings.window_y) {
            _ if fullscreen => None,
            (0, 0) => None,
            position => Some(position),
        };

        let display = &mut self.backends.display;
        let title = &self.title;
        let format = create_with_fallback(PixelFormat::new(settings.reflection, settings.multisample), |format| {
            display.create(&WindowRequest {
                title: title.clone(),
                mode,
                fullscreen,
                position,
                vsync: settings.vsync,
                pixel_format: *format,
            })
        })?;

        info!(target: "engine", "Window created: {}x{} (fullscreen: {}, {:?})", mode.width, mode.height, fullscreen, format);

        {
            let written = &mut self.settings_mut().display;
            written.screen_width = mode.width;
            written.screen_height = mode.height;
            written.fullscreen = fullscreen;
            written.reflection = format.reflection;
            written.multisample = format.samples;
        }

        let graphics = GraphicsSettings {
            width: mode.width,
            height: mode.height,
            reflection: format.reflection,
            multisample: format.samples,
            mipmap: settings.mipmap,
            anisotropy: settings.anisotropy,
            textures: settings.textures,
        };

        if let Err(e) = self.backends.graphics.initialize(&graphics) {
            self.backends.display.destroy();
            return Err(e.into());
        }

        self.subsystems.display = true;
        Ok(())
    }

    /// Acquires keyboard, mouse and controller. Missing devices stay inert.
    fn acquire_input(&mut self) {
        if self.backends.display.has_keyboard() {
            self.input.acquire_keyboard();
        } else {
            info!(target: "platform::input", "No keyboard available");
        }

        if self.backends.display.has_mouse() {
            self.input.acquire_mouse();
            if self.mouse_grabbed {
                self.input.set_mouse_grabbed(true);
                self.backends.display.set_cursor_grabbed(true);
            }
        } else {
            info!(target: "platform::input", "No mouse available");
        }

        self.acquire_controller();
        self.subsystems.input = true;
    }

    fn acquire_controller(&mut self) {
        let settings = self.settings().controls.controller.clone();
        if !settings.enabled {
            return;
        }

        let Some(provider) = self.backends.controllers.as_mut() else {
            debug!(target: "platform::input", "No controller support compiled in");
            return;
        };

        let Some(source) = provider.open(settings.index) else {
            info!(target: "platform::input", "Controller {} not present", settings.index);
            return;
        };

        let binding = AxisBinding::detect(&source.axis_names(), &settings);
        info!(target: "platform::input", "Controller {} acquired, axes {:?}", settings.index, binding);

        let written = &mut self.settings_mut().controls.controller;
        written.axis_x = Some(binding.x);
        written.axis_y = Some(binding.y);
        written.axis_z = binding.z;

        self.input.attach_controller(ControllerState::new(binding, &settings));
        self.controller = Some(source);
    }

    fn init_renderer(&mut self) -> Result<(), UiError> {
        let settings = self.settings().renderer.clone();
        self.backends.renderer.initialize(&settings)?;
        self.subsystems.renderer = true;
        Ok(())
    }

    fn init_gui(&mut self) -> Result<(), UiError> {
        let theme = self.settings().gui.theme.clone();
        self.backends.gui.initialize(&theme)?;
        self.subsystems.gui = true;
        Ok(())
    }

    fn init_audio(&mut self) -> Result<(), UiError> {
        let settings = self.settings().audio.clone();
        let data_root = self.backends.data.data_root();

        self.backends.audio.initialize(&data_root, settings.buffer)?;
        self.subsystems.audio = true;

        self.backends.audio.set_sound_volume(settings.sound_volume);
        self.backends.audio.set_music_volume(settings.music_volume);
        Ok(())
    }

    fn init_hud(&mut self) -> Result<(), UiError> {
        self.backends.hud.initialize()?;
        self.subsystems.hud = true;
        Ok(())
    }

    /// Title in standard mode; in replay mode the intro or the level data
    /// warning, falling back to the title when the replay does not load.
    fn enter_startup_screen(&mut self) {
        let first = match self.mode().clone() {
            ApplicationMode::Standard => self.startup.title,
            ApplicationMode::Replay(path) => match self.backends.replay.load(&path) {
                Ok(info) if info.level_compatible => self.startup.replay_intro,
                Ok(_) => {
                    warn!(target: "engine", "Replay {} was recorded with different level data", path.display());
                    self.startup.replay_warning
                }
                Err(e) => {
                    warn!(target: "engine", "{}, starting at the title screen", e);
                    self.startup.title
                }
            },
        };

        self.screens.goto(Some(first), false);
    }

    fn hide_progress(&mut self) {
        if self.subsystems.progress {
            self.backends.progress.hide();
            self.subsystems.progress = false;
        }
    }

    /// Drops input that arrived during startup, then tells the screen
    /// where the pointer is.
    fn flush_events(&mut self) {
        self.backends.display.pump_events(&self.sender);
        let dropped = self.collector.collect_frame();
        if !dropped.inputs.is_empty() {
            debug!(target: "platform", "Flushed {} startup input events", dropped.inputs.len());
        }
        if let Some(focused) = dropped.focus {
            self.window_active = focused;
        }

        self.report_cursor();
    }

    fn report_cursor(&mut self) {
        if let Some((x, y)) = self.backends.display.cursor_position() {
            self.input.report_cursor(x, y, &mut self.screens);
        }
    }

    //--- Teardown ---------------------------------------------------------

    /// Releases the display and everything created on top of it.
    fn teardown_display(&mut self) {
        self.hide_progress();
        self.release_hud();
        self.backends.game.deinitialize();
        self.release_gui();
        self.release_renderer();
        self.release_device();
    }

    fn release_hud(&mut self) {
        if self.subsystems.hud {
            self.backends.hud.deinitialize();
            self.subsystems.hud = false;
        }
    }

    fn release_gui(&mut self) {
        if self.subsystems.gui {
            self.backends.gui.deinitialize();
            self.subsystems.gui = false;
        }
    }

    fn release_renderer(&mut self) {
        if self.subsystems.renderer {
            self.backends.renderer.deinitialize();
            self.subsystems.renderer = false;
        }
    }

    /// Input devices, graphics and the window, in that order.
    fn release_device(&mut self) {
        if self.subsystems.input {
            self.controller = None;
            self.controller_events.clear();
            self.input.release_all();
            self.subsystems.input = false;
        }

        self.backends.graphics.deinitialize();
        self.save_window_position();
        self.backends.display.destroy();
        self.subsystems.display = false;
    }

    /// Stores the window position so the next window opens in place.
    fn save_window_position(&mut self) {
        if self.settings().display.fullscreen {
            return;
        }

        if let Some((x, y)) = self.backends.display.window_position() {
            let written = &mut self.settings_mut().display;
            written.window_x = x.max(0);
            written.window_y = y.max(0);
        }
    }

    /// Stores a rebuild failure for [`Engine::run`], or clears an older one.
    fn settle_fatal(&mut self, result: Result<(), UiError>) -> Result<(), UiError> {
        match &result {
            Ok(()) => self.fatal = None,
            Err(e) => {
                error!(target: "engine", "Rebuild failed: {}", e);
                self.fatal = Some(e.clone());
            }
        }
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
