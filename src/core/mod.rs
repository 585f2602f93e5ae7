//=========================================================================
// Core Systems
//
// Engine-side systems that do not touch the operating system directly.
//
// Modules:
// - `screen`: screen contract, context and the transition state machine
// - `input`: keyboard/mouse/controller snapshots and dispatch
// - `display`: display mode negotiation and pixel format fallback
// - `timing`: frame clock and FPS counter
// - `backend`: interfaces of the collaborators the engine drives
// - `platform_bridge`: channel messages from the platform layer
// - `config` / `mode` / `error`: settings, launch mode, error kinds
//
// Everything here runs on the single loop thread. Native integration
// lives in `crate::platform`.
//
//=========================================================================

pub mod backend;
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod mode;
pub mod platform_bridge;
pub mod screen;
pub mod timing;

#[cfg(test)]
pub(crate) mod testing;
