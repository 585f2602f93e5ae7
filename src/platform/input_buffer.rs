//=========================================================================
// Input Buffer
//
// Collects converted input between two pumps and hands it to the
// engine as one ordered batch.
//
// Responsibilities:
// - Keep every input in native arrival order
// - Coalesce consecutive cursor positions (only the latest matters)
// - Accumulate consecutive raw motion deltas (every unit matters)
// - Provide the batch via `drain()`, or nothing when idle
//
// Notes:
// Pending cursor and motion entries are flushed into the batch before
// any discrete event, so a click always follows the move that led to it.
// Capacity is kept across pumps.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::RawInputEvent;

//=== InputBuffer Struct ==================================================
//
// Represents the transient event store for one pump of input.
//
pub(crate) struct InputBuffer {
    events: Vec<RawInputEvent>,
    cursor: Option<(i32, i32)>,
    motion: Option<(i32, i32)>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    //
    // Preallocates for a typical burst of key and button events.
    //
    pub(crate) fn new() -> Self {
        const EVENTS_BASE: usize = 64;

        Self {
            events: Vec::with_capacity(EVENTS_BASE),
            cursor: None,
            motion: None,
        }
    }

    //--- Discrete Event Handling -----------------------------------------
    pub(crate) fn push_discrete(&mut self, event: RawInputEvent) {
        self.flush_pending();
        self.events.push(event);
    }

    //--- Continuous Event Handling ---------------------------------------
    //
    // Cursor positions replace each other; raw motion is summed. Both
    // stay pending until the next discrete event or the drain.
    //
    pub(crate) fn push_continuous(&mut self, event: RawInputEvent) {
        match event {
            RawInputEvent::MouseMoved { x, y } => self.cursor = Some((x, y)),
            RawInputEvent::MouseMotion { dx, dy } => {
                let (sum_x, sum_y) = self.motion.unwrap_or((0, 0));
                self.motion = Some((sum_x + dx, sum_y + dy));
            }
            other => self.push_discrete(other),
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns the ordered batch and clears the buffer, or `None` when
    // nothing was collected.
    //
    pub(crate) fn drain(&mut self) -> Option<Vec<RawInputEvent>> {
        if self.is_empty() {
            return None;
        }

        self.flush_pending();
        Some(self.events.drain(..).collect())
    }

    //--- Utilities --------------------------------------------------------
    pub(crate) fn clear(&mut self) {
        self.events.clear();
        self.cursor = None;
        self.motion = None;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty() && self.cursor.is_none() && self.motion.is_none()
    }

    fn flush_pending(&mut self) {
        if let Some((x, y)) = self.cursor.take() {
            self.events.push(RawInputEvent::MouseMoved { x, y });
        }
        if let Some((dx, dy)) = self.motion.take() {
            self.events.push(RawInputEvent::MouseMotion { dx, dy });
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
