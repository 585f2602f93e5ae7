//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the display backend (winit or a test double) with the loop.
//
// The backend pushes PlatformEvents into a channel while it pumps native
// notifications; the loop drains the channel once per iteration. Input is
// therefore always handled at one point in the iteration, never from
// inside a native callback.
//
// Components:
// - `interface`: Event types (the contract)
// - `event_collector`: Loop-side draining and per-frame aggregation
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub(crate) use event_collector::EventCollector;
pub use event_collector::FrameEvents;
pub use interface::PlatformEvent;
