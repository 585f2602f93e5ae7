//=========================================================================
// Tiltball Engine - Library Root
//
// Runtime of a 3D ball-tilting arcade game: screen state machine,
// subsystem lifecycle, input dispatch, frame timing and display mode
// negotiation.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Expose the collaborator traits games implement (`core::backend`)
// - Provide the Winit display and the optional gilrs controllers
//
// Typical usage:
// ```no_run
// use tiltball_engine::prelude::*;
//
// let mut engine = EngineBuilder::new(backends, startup)
//     .register_screen(GameScreen::Title, TitleScreen)
//     .build();
// engine.initialize()?;
// let result = engine.run();
// engine.deinitialize();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the engine-side systems. Most games only need the
// `prelude`; the rest is exposed for custom collaborators.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` wraps Winit (and gilrs with the `controller` feature).
// Only its entry types are re-exported.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------
pub use engine::{Engine, EngineBuilder};
#[cfg(feature = "controller")]
pub use platform::GilrsControllers;
pub use platform::WinitDisplay;
