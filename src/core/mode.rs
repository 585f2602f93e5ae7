//=========================================================================
// Application Mode
//=========================================================================
//
// How the application was launched. Chosen once at startup; selects the
// initial screen.
//
//=========================================================================

use std::path::PathBuf;

/// Launch mode, immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ApplicationMode {
    /// Normal start at the title screen.
    #[default]
    Standard,

    /// Play back the given replay file.
    Replay(PathBuf),
}
