//=========================================================================
// Event Collector
//=========================================================================
//
// Loop-side collector for platform events, bounded per iteration.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → FrameEvents
//
// Input batches are flattened in arrival order. Focus changes collapse to
// the latest state; a close request is sticky for the iteration.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::RawInputEvent;

/// Upper bound on messages drained in one iteration.
const MAX_EVENTS_PER_FRAME: usize = 100;

//=== FrameEvents =========================================================

/// Everything the platform reported since the previous iteration.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameEvents {
    pub inputs: Vec<RawInputEvent>,
    pub focus: Option<bool>,
    pub close_requested: bool,
}

//=== EventCollector ======================================================

/// Drains the platform channel once per iteration.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self { receiver }
    }

    /// Collects pending platform events (bounded to prevent starvation).
    ///
    /// A disconnected channel means the platform is gone and is reported
    /// as a close request.
    pub(crate) fn collect_frame(&mut self) -> FrameEvents {
        let mut frame = FrameEvents::default();
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    Self::handle_event(&mut frame, event);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => {
                    frame.close_requested = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!(target: "platform", "Event queue backlog: drained {} events this frame", drained);
        }

        frame
    }

    fn handle_event(frame: &mut FrameEvents, event: PlatformEvent) {
        match event {
            PlatformEvent::Inputs(events) => frame.inputs.extend(events),
            PlatformEvent::Focused(focused) => frame.focus = Some(focused),
            PlatformEvent::WindowClosed => frame.close_requested = true,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, MouseButton};
    use crossbeam_channel::unbounded;

    fn key(code: KeyCode) -> RawInputEvent {
        RawInputEvent::Key {
            code,
            ch: None,
            down: true,
        }
    }

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        assert_eq!(collector.collect_frame(), FrameEvents::default());
    }

    #[test]
    fn collect_flattens_batches_in_order() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Inputs(vec![
            key(KeyCode::KeyA),
            RawInputEvent::MouseMoved { x: 10, y: 20 },
        ]))
        .unwrap();
        tx.send(PlatformEvent::Inputs(vec![RawInputEvent::MouseButton {
            button: MouseButton::Left,
            down: true,
        }]))
        .unwrap();

        let frame = collector.collect_frame();

        assert_eq!(
            frame.inputs,
            vec![
                key(KeyCode::KeyA),
                RawInputEvent::MouseMoved { x: 10, y: 20 },
                RawInputEvent::MouseButton {
                    button: MouseButton::Left,
                    down: true
                },
            ]
        );
        assert!(!frame.close_requested);
    }

    #[test]
    fn latest_focus_state_wins() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Focused(false)).unwrap();
        tx.send(PlatformEvent::Focused(true)).unwrap();

        assert_eq!(collector.collect_frame().focus, Some(true));
        assert_eq!(collector.collect_frame().focus, None);
    }

    #[test]
    fn collect_reports_window_closed() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert!(collector.collect_frame().close_requested);
    }

    #[test]
    fn collect_reports_disconnect_as_close() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        assert!(collector.collect_frame().close_requested);
    }

    #[test]
    fn collect_is_bounded_per_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        for _ in 0..(MAX_EVENTS_PER_FRAME + 5) {
            tx.send(PlatformEvent::Focused(true)).unwrap();
        }
        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert!(!collector.collect_frame().close_requested);
        assert!(collector.collect_frame().close_requested);
    }
}
