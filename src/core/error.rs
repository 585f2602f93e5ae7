//=========================================================================
// Engine Errors
//=========================================================================
//
// Error kinds surfaced by the engine and its collaborators.
//
// Kinds:
//   CapabilityError  - a native backend could not satisfy a request
//   UiError          - everything the engine reports to its caller
//   ConfigError      - settings file I/O and TOML failures
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== CapabilityError =====================================================

/// Inability of a native backend to satisfy a requested configuration.
///
/// Fatal during the first [`crate::Engine::initialize`], retried with relaxed
/// parameters during display creation, and deferred during a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The window (or its pixel format) could not be created.
    #[error("window creation failed: {0}")]
    Window(String),

    /// The graphics backend rejected its configuration.
    #[error("graphics initialization failed: {0}")]
    Graphics(String),

    /// The audio device could not be opened.
    #[error("audio initialization failed: {0}")]
    Audio(String),

    /// Every relaxation of the pixel format was tried and rejected.
    #[error("no display configuration could be created (last failure: {0})")]
    Exhausted(Box<CapabilityError>),
}

//=== UiError =============================================================

/// Errors reported by the engine.
///
/// Cloneable so that a failure stored during a rebuild can be returned to the
/// caller of the rebuild and re-raised when the loop exits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    /// A native window/graphics/audio acquisition failed.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// A resource (e.g. a replay file) could not be loaded.
    #[error("failed to load {what}: {reason}")]
    ResourceLoad { what: String, reason: String },

    /// A collaborator reported a runtime failure.
    #[error("{subsystem} failed: {reason}")]
    Subsystem { subsystem: &'static str, reason: String },

    /// A panic escaped from one loop iteration.
    #[error("panic during loop iteration: {0}")]
    IterationPanic(String),
}

impl UiError {
    /// Shorthand for [`UiError::ResourceLoad`].
    pub fn resource_load(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceLoad {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`UiError::Subsystem`].
    pub fn subsystem(subsystem: &'static str, reason: impl Into<String>) -> Self {
        Self::Subsystem {
            subsystem,
            reason: reason.into(),
        }
    }
}

//=== ConfigError =========================================================

/// Settings persistence errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_error_converts_into_ui_error() {
        let err: UiError = CapabilityError::Graphics("no stencil".into()).into();
        assert_eq!(
            err,
            UiError::Capability(CapabilityError::Graphics("no stencil".into()))
        );
        assert_eq!(err.to_string(), "graphics initialization failed: no stencil");
    }

    #[test]
    fn exhausted_reports_last_failure() {
        let err = CapabilityError::Exhausted(Box::new(CapabilityError::Window("8x msaa".into())));
        assert!(err.to_string().contains("window creation failed: 8x msaa"));
    }

    #[test]
    fn helper_constructors() {
        let err = UiError::resource_load("replay", "truncated header");
        assert_eq!(err.to_string(), "failed to load replay: truncated header");

        let err = UiError::subsystem("screenshot", "disk full");
        assert_eq!(err.to_string(), "screenshot failed: disk full");
    }
}
