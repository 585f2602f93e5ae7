//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use tiltball_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};

// Collaborators
pub use crate::core::backend::{Backends, LogErrorLogger, StartupScreens};

// Configuration and launch
pub use crate::core::config::Settings;
pub use crate::core::error::{CapabilityError, ConfigError, UiError};
pub use crate::core::mode::ApplicationMode;

// Input system
pub use crate::core::input::{ControllerAxis, KeyCode, MouseButton};

// Screen system
pub use crate::core::screen::{Screen, ScreenContext, ScreenKey};

// Platform
pub use crate::platform::WinitDisplay;
