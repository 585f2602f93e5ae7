//=========================================================================
// Frame Loop
//=========================================================================
//
// The single execution loop and its per-iteration steps.
//
// One iteration:
//   1. Pump platform events and dispatch queued input
//   2. Present the previous frame
//   3. Close request → no active screen → stop
//   4. Focus change (notify the screen once on loss)
//   5. Poll the controller
//   6. dt = clamped wall-clock delta; skip the rest if zero
//   7. Step the renderer, tick the active screen
//   8. Paint when focused, otherwise sleep briefly
//
// Engine requests issued by screens (mouse grab, rebuilds) are serviced
// after each step that may have run screen callbacks.
//
// A panic inside an iteration is caught at the loop boundary, reported
// to the error logger, and the loop continues.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::Engine;
use crate::core::error::UiError;
use crate::core::input::Hotkey;
use crate::core::screen::{EngineRequest, ScreenKey};

/// Pause per iteration while the window is unfocused.
const IDLE_SLEEP: Duration = Duration::from_millis(1);

//=== Frame Loop ==========================================================

impl<K: ScreenKey> Engine<K> {
    //--- Public API -------------------------------------------------------

    /// Runs iterations until no screen is active.
    ///
    /// Returns the error of a failed rebuild, if one happened while
    /// running. Failures inside an iteration are logged and never end the
    /// loop.
    pub fn run(&mut self) -> Result<(), UiError> {
        info!(target: "engine", "Entering main loop");

        while self.screens.is_active() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.iterate())) {
                let error = UiError::IterationPanic(panic_message(payload.as_ref()));
                self.backends.error_logger.log(&error);
            }
        }

        info!(target: "engine", "Main loop finished");

        match self.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    //--- Iteration --------------------------------------------------------

    pub(crate) fn iterate(&mut self) {
        self.backends.display.pump_events(&self.sender);
        let frame = self.collector.collect_frame();

        for event in frame.inputs {
            if !self.screens.is_active() {
                debug!(target: "engine", "No active screen, dropping remaining input");
                break;
            }
            if let Some(hotkey) = self.input.dispatch_input(event, &mut self.screens) {
                self.run_hotkey(hotkey);
            }
            self.service_requests();
        }

        if self.subsystems.display {
            self.backends.graphics.present();
        }

        if frame.close_requested {
            info!(target: "engine", "Window close requested");
            self.screens.goto(None, false);
        }

        if !self.screens.is_active() {
            return;
        }

        if let Some(focused) = frame.focus {
            self.update_focus(focused);
        }

        self.poll_controller();
        self.service_requests();

        let now = self.clock.now();
        let dt = self.clock.tick(now);
        if dt <= 0.0 {
            return;
        }

        self.backends.renderer.step(dt);
        self.screens.tick(dt);
        self.service_requests();

        if !self.screens.is_active() {
            return;
        }

        if self.window_active {
            self.backends.graphics.clear();
            let time = self.clock.elapsed(now);
            self.screens.dispatch(|screen, ctx| screen.paint(time, ctx));
            self.record_frame(true, now);
        } else {
            thread::sleep(IDLE_SLEEP);
            self.record_frame(false, now);
        }

        self.service_requests();
    }

    //--- Steps ------------------------------------------------------------

    fn run_hotkey(&mut self, hotkey: Hotkey) {
        match hotkey {
            Hotkey::ToggleWireframe => self.backends.graphics.toggle_wireframe(),
            Hotkey::Screenshot => match self.backends.screenshot.take_screenshot() {
                Ok(path) => info!(target: "engine", "Screenshot saved to {}", path.display()),
                Err(e) => self.backends.error_logger.log(&e),
            },
        }
    }

    fn update_focus(&mut self, focused: bool) {
        if focused == self.window_active {
            return;
        }

        debug!(target: "engine", "Window {}", if focused { "activated" } else { "deactivated" });
        self.window_active = focused;

        if !focused {
            self.screens.dispatch(|screen, ctx| screen.window_deactivated(ctx));
        }
    }

    fn poll_controller(&mut self) {
        let Some(source) = self.controller.as_mut() else {
            return;
        };

        let mut events = std::mem::take(&mut self.controller_events);
        source.poll(&mut events);

        for event in events.drain(..) {
            self.input.dispatch_controller(event, &mut self.screens);
        }

        self.controller_events = events;
    }

    /// Feeds the FPS counter and publishes completed readings.
    fn record_frame(&mut self, painted: bool, now: Instant) {
        let Some(counter) = self.fps.as_mut() else {
            return;
        };

        if !counter.update(painted, now) {
            return;
        }

        let (fps, ms, idle) = (counter.fps(), counter.ms(), counter.idle());

        if self.subsystems.hud {
            self.backends.hud.update_fps(fps, ms);
        }

        if self.settings().debug.stats {
            info!(target: "stats", "{} fps, {:.2} ms/frame, {} idle iterations", fps, ms, idle);
        }
    }

    //--- Requests ---------------------------------------------------------

    /// Executes engine requests queued by screen callbacks, in order.
    ///
    /// A failed rebuild leaves no usable display, so the active screen is
    /// left and the stored error ends [`Engine::run`].
    pub(super) fn service_requests(&mut self) {
        loop {
            let requests = self.screens.context_mut().take_requests();
            if requests.is_empty() {
                return;
            }

            for request in requests {
                debug!(target: "engine", "Servicing {:?}", request);

                let result = match request {
                    EngineRequest::SetMouseGrabbed(grabbed) => {
                        self.set_mouse_grabbed(grabbed);
                        Ok(())
                    }
                    EngineRequest::Rebuild => self.rebuild(),
                    EngineRequest::RebuildRenderers => self.rebuild_renderers(),
                };

                if result.is_err() {
                    self.screens.goto(None, false);
                    self.screens.context_mut().take_requests();
                    return;
                }
            }
        }
    }
}

//=== Helpers =============================================================

/// Extracts the message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
