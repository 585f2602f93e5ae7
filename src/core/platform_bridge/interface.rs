//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-engine interface types.
//
// Defines the contract between the display backend, which fills the
// channel while pumping native events, and the loop, which drains it.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::RawInputEvent;

//=== PlatformEvent =======================================================

/// Events sent from the display backend to the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Input events from one pump, in native order.
    ///
    /// Consecutive pointer positions arrive coalesced and consecutive raw
    /// motion deltas summed.
    Inputs(Vec<RawInputEvent>),

    /// Window focus gained (`true`) or lost (`false`).
    Focused(bool),

    /// Window close requested by the user or the OS.
    WindowClosed,
}
