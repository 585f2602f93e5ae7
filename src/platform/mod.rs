//=========================================================================
// Platform Subsystem
//
// Winit implementation of the display collaborator.
//
// Architecture:
// ```text
//  Loop thread (one per process):
//  ┌──────────────────────────────┐
//  │  Engine iteration            │
//  │   ↓ pump_events()            │
//  │  EventLoop::pump_app_events  │   (returns immediately)
//  │   ↓                          │
//  │  WindowHandler               │
//  │   ├─ InputProcessor          │   Winit → RawInputEvent
//  │   ├─ InputBuffer             │   ordered / coalesced / summed
//  │   └─ outbox                  │   focus + close notifications
//  │   ↓ flush()                  │
//  │  Channel ────────────────────┼──→ EventCollector (same thread)
//  └──────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Pump, don't run**: `pump_app_events` with a zero timeout processes
//   what is pending and hands control back, so the engine keeps its own
//   loop and never surrenders the thread to Winit
// - **Windows are created inside the handler**: Winit 0.30 only creates
//   windows from an `ActiveEventLoop`, so `create()` stores the request
//   and pumps once
// - **Full channel drops, never blocks**: the producer and the consumer
//   share a thread, so a blocking send would deadlock
//
// The window carries no pixel format. The graphics backend creates its
// context on `WinitDisplay::window()` and reports pixel format failures
// from its own initialization.
//
//=========================================================================

//=== Submodules ==========================================================

#[cfg(feature = "controller")]
mod gamepad;
mod input_buffer;
mod input_processor;

#[cfg(feature = "controller")]
pub use gamepad::GilrsControllers;

//=== External Crates =====================================================

use std::time::Duration;

use crossbeam_channel::{Sender, TrySendError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, DeviceEvents, EventLoop},
    monitor::VideoModeHandle,
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{CursorGrabMode, Fullscreen, Window, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::backend::{DisplayBackend, WindowRequest};
use crate::core::display::DisplayMode;
use crate::core::error::CapabilityError;
use crate::core::input::RawInputEvent;
use crate::core::platform_bridge::PlatformEvent;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

/// Desktop mode assumed when no monitor can be queried.
const FALLBACK_DESKTOP: DisplayMode = DisplayMode::new(1024, 768, 24, 60);

//=== MonitorInfo =========================================================

/// Modes of the monitor windows are opened on.
struct MonitorInfo {
    desktop: DisplayMode,
    modes: Vec<(DisplayMode, VideoModeHandle)>,
}

impl MonitorInfo {
    fn query(event_loop: &ActiveEventLoop) -> Option<Self> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())?;

        let modes: Vec<(DisplayMode, VideoModeHandle)> = monitor
            .video_modes()
            .map(|handle| {
                let size = handle.size();
                let mode = DisplayMode::new(
                    size.width,
                    size.height,
                    u32::from(handle.bit_depth()),
                    handle.refresh_rate_millihertz() / 1000,
                );
                (mode, handle)
            })
            .collect();

        let size = monitor.size();
        let refresh_rate = monitor.refresh_rate_millihertz().map_or(60, |mhz| mhz / 1000);
        let bit_depth = modes
            .iter()
            .filter(|(mode, _)| mode.width == size.width && mode.height == size.height)
            .map(|(mode, _)| mode.bit_depth)
            .max()
            .unwrap_or(24);

        Some(Self {
            desktop: DisplayMode::new(size.width, size.height, bit_depth, refresh_rate),
            modes,
        })
    }

    /// Native video mode for exclusive fullscreen in `mode`.
    fn video_mode_for(&self, mode: &DisplayMode) -> Option<VideoModeHandle> {
        self.modes
            .iter()
            .find(|(candidate, _)| candidate == mode)
            .map(|(_, handle)| handle.clone())
    }
}

//=== WindowHandler =======================================================

/// Winit-facing half of the display: receives callbacks during a pump.
struct WindowHandler {
    window: Option<Window>,
    pending: Option<WindowRequest>,
    creation: Option<Result<(), CapabilityError>>,
    monitor: Option<MonitorInfo>,
    buffer: InputBuffer,
    processor: InputProcessor,
    outbox: Vec<PlatformEvent>,
    cursor: Option<(i32, i32)>,
    grabbed: bool,
    exited: bool,
}

impl WindowHandler {
    fn new() -> Self {
        Self {
            window: None,
            pending: None,
            creation: None,
            monitor: None,
            buffer: InputBuffer::new(),
            processor: InputProcessor::new(),
            outbox: Vec::new(),
            cursor: None,
            grabbed: false,
            exited: false,
        }
    }

    /// Work that needs an active event loop: the monitor query and a
    /// pending window creation.
    fn service(&mut self, event_loop: &ActiveEventLoop) {
        if self.monitor.is_none() {
            self.monitor = MonitorInfo::query(event_loop);
            if self.monitor.is_none() {
                warn!(target: "platform", "No monitor found, assuming {:?}", FALLBACK_DESKTOP);
            }
        }

        if let Some(request) = self.pending.take() {
            self.creation = Some(self.create_window(event_loop, &request));
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop, request: &WindowRequest) -> Result<(), CapabilityError> {
        let mut attrs = Window::default_attributes()
            .with_title(request.title.clone())
            .with_inner_size(PhysicalSize::new(request.mode.width, request.mode.height))
            .with_resizable(false);

        if request.fullscreen {
            let exclusive = self.monitor.as_ref().and_then(|m| m.video_mode_for(&request.mode));
            attrs = attrs.with_fullscreen(Some(match exclusive {
                Some(video_mode) => Fullscreen::Exclusive(video_mode),
                None => Fullscreen::Borderless(None),
            }));
        } else if let Some((x, y)) = request.position {
            attrs = attrs.with_position(PhysicalPosition::new(x, y));
        }

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| CapabilityError::Window(e.to_string()))?;

        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI (requested {:?}, vsync: {})",
            window.inner_size().width,
            window.inner_size().height,
            window.scale_factor(),
            request.pixel_format,
            request.vsync
        );

        // Focus is reported again for every new window; the engine waits
        // for it before painting.
        self.outbox.push(PlatformEvent::Focused(window.has_focus()));
        self.window = Some(window);
        Ok(())
    }

    /// Converts one window event into buffered input or a notification.
    fn handle_window_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.outbox.push(PlatformEvent::WindowClosed);
            }

            WindowEvent::Focused(focused) => {
                self.outbox.push(PlatformEvent::Focused(focused));
            }

            WindowEvent::KeyboardInput { event, is_synthetic, .. } => {
                if is_synthetic {
                    trace!(target: "platform::input", "Synthetic key event ignored");
                    return;
                }
                let event = self.processor.process_key_event(&event);
                self.buffer.push_discrete(event);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.processor.process_mouse_button(button, state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(event) = self.processor.process_mouse_wheel(delta) {
                    self.buffer.push_discrete(event);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.processor.process_mouse_move(position.x, position.y);
                if let RawInputEvent::MouseMoved { x, y } = event {
                    self.cursor = Some((x, y));
                }
                self.buffer.push_continuous(event);
            }

            _ => {
                // Ignore: Resized, Moved, redraws, etc.
            }
        }
    }

    /// Sends buffered input first, then notifications.
    fn flush(&mut self, sink: &Sender<PlatformEvent>) {
        if let Some(events) = self.buffer.drain() {
            trace!(target: "platform::input", "Flushing {} input events", events.len());
            forward(sink, PlatformEvent::Inputs(events));
        }

        for event in self.outbox.drain(..) {
            forward(sink, event);
        }
    }
}

//--- Winit Integration ---------------------------------------------------

impl ApplicationHandler for WindowHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.service(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        self.handle_window_event(event);
    }

    /// Raw motion drives the pointer while it is grabbed.
    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if !self.grabbed || self.window.is_none() {
                return;
            }
            if let Some(motion) = self.processor.process_mouse_motion(dx, dy) {
                self.buffer.push_continuous(motion);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.service(event_loop);
    }
}

/// Sends without blocking; the consumer runs on this same thread.
fn forward(sink: &Sender<PlatformEvent>, event: PlatformEvent) {
    match sink.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            warn!(target: "platform", "Event channel full, dropping {:?}", event);
        }
        Err(TrySendError::Disconnected(_)) => {
            warn!(target: "platform", "Event channel disconnected, dropping event");
        }
    }
}

//=== WinitDisplay ========================================================

/// Display collaborator backed by a Winit event loop.
///
/// Must be created and used on the main thread (Winit requirement on
/// macOS/iOS).
pub struct WinitDisplay {
    event_loop: EventLoop<()>,
    handler: WindowHandler,
}

impl WinitDisplay {
    /// Creates the event loop and queries the primary monitor.
    pub fn new() -> Result<Self, CapabilityError> {
        debug!(target: "platform", "Creating Winit event loop");

        let event_loop = EventLoop::new()
            .map_err(|e| CapabilityError::Window(format!("event loop creation failed: {}", e)))?;
        event_loop.listen_device_events(DeviceEvents::WhenFocused);

        let mut display = Self {
            event_loop,
            handler: WindowHandler::new(),
        };
        display.pump();

        info!(target: "platform", "Platform subsystem initialized");
        Ok(display)
    }

    /// Window the graphics backend creates its context on.
    pub fn window(&self) -> Option<&Window> {
        self.handler.window.as_ref()
    }

    /// Processes pending native events without waiting.
    fn pump(&mut self) {
        let status = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut self.handler);

        if let PumpStatus::Exit(code) = status {
            if !self.handler.exited {
                info!(target: "platform", "Event loop exited with code {}", code);
                self.handler.exited = true;
                self.handler.outbox.push(PlatformEvent::WindowClosed);
            }
        }
    }
}

impl DisplayBackend for WinitDisplay {
    fn available_modes(&mut self) -> Vec<DisplayMode> {
        self.handler
            .monitor
            .as_ref()
            .map(|monitor| monitor.modes.iter().map(|(mode, _)| *mode).collect())
            .unwrap_or_default()
    }

    fn desktop_mode(&mut self) -> DisplayMode {
        self.handler
            .monitor
            .as_ref()
            .map_or(FALLBACK_DESKTOP, |monitor| monitor.desktop)
    }

    fn create(&mut self, request: &WindowRequest) -> Result<(), CapabilityError> {
        if self.handler.window.is_some() {
            self.destroy();
        }

        self.handler.pending = Some(request.clone());
        self.handler.creation = None;
        self.pump();

        match self.handler.creation.take() {
            Some(result) => result,
            None => {
                self.handler.pending = None;
                Err(CapabilityError::Window("event loop is not accepting windows".to_string()))
            }
        }
    }

    fn destroy(&mut self) {
        if self.handler.window.take().is_some() {
            debug!(target: "platform", "Window destroyed");
        }
        self.handler.buffer.clear();
        self.handler.cursor = None;
        self.handler.grabbed = false;
    }

    fn pump_events(&mut self, sink: &Sender<PlatformEvent>) {
        self.pump();
        self.handler.flush(sink);
    }

    fn window_position(&self) -> Option<(i32, i32)> {
        let position = self.handler.window.as_ref()?.outer_position().ok()?;
        Some((position.x, position.y))
    }

    fn cursor_position(&self) -> Option<(i32, i32)> {
        self.handler.cursor
    }

    fn set_cursor_grabbed(&mut self, grabbed: bool) {
        self.handler.grabbed = grabbed;

        let Some(window) = self.handler.window.as_ref() else {
            return;
        };

        let result = if grabbed {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            window.set_cursor_grab(CursorGrabMode::None)
        };

        if let Err(e) = result {
            warn!(target: "platform", "Failed to {} cursor: {}", if grabbed { "grab" } else { "release" }, e);
        }
        window.set_cursor_visible(!grabbed);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, MouseButton};
    use crossbeam_channel::{bounded, unbounded};

    #[test]
    fn handler_starts_without_window() {
        let handler = WindowHandler::new();
        assert!(handler.window.is_none());
        assert!(handler.monitor.is_none());
    }

    #[test]
    fn focus_and_close_become_notifications() {
        let (tx, rx) = unbounded();
        let mut handler = WindowHandler::new();

        handler.handle_window_event(WindowEvent::Focused(false));
        handler.handle_window_event(WindowEvent::CloseRequested);
        handler.flush(&tx);

        assert_eq!(rx.try_recv(), Ok(PlatformEvent::Focused(false)));
        assert_eq!(rx.try_recv(), Ok(PlatformEvent::WindowClosed));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_sends_inputs_before_notifications() {
        let (tx, rx) = unbounded();
        let mut handler = WindowHandler::new();
        let key = RawInputEvent::Key { code: KeyCode::Space, ch: Some(' '), down: true };

        handler.buffer.push_discrete(key);
        handler.handle_window_event(WindowEvent::Focused(true));
        handler.flush(&tx);

        assert_eq!(
            rx.try_recv(),
            Ok(PlatformEvent::Inputs(vec![key]))
        );
        assert_eq!(rx.try_recv(), Ok(PlatformEvent::Focused(true)));
    }

    #[test]
    fn flush_keeps_cursor_move_ahead_of_click() {
        let (tx, rx) = unbounded();
        let mut handler = WindowHandler::new();
        let press = RawInputEvent::MouseButton { button: MouseButton::Left, down: true };

        handler.buffer.push_continuous(RawInputEvent::MouseMoved { x: 300, y: 200 });
        handler.buffer.push_discrete(press);
        handler.flush(&tx);

        assert_eq!(
            rx.try_recv(),
            Ok(PlatformEvent::Inputs(vec![RawInputEvent::MouseMoved { x: 300, y: 200 }, press]))
        );
    }

    #[test]
    fn flush_empty_handler_is_noop() {
        let (tx, rx) = unbounded();
        let mut handler = WindowHandler::new();

        handler.flush(&tx);

        assert!(rx.try_recv().is_err(), "No events should be sent for empty buffer");
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (tx, rx) = bounded(1);
        let mut handler = WindowHandler::new();
        handler.buffer.push_discrete(RawInputEvent::MouseButton { button: MouseButton::Left, down: true });
        handler.handle_window_event(WindowEvent::CloseRequested);

        handler.flush(&tx);

        assert!(matches!(rx.try_recv(), Ok(PlatformEvent::Inputs(_))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn disconnected_channel_is_tolerated() {
        let (tx, rx) = unbounded();
        drop(rx);
        let mut handler = WindowHandler::new();
        handler.handle_window_event(WindowEvent::CloseRequested);

        handler.flush(&tx);

        assert!(handler.outbox.is_empty());
    }
}
