//=========================================================================
// Pixel Format Fallback
//=========================================================================
//
// Retries context creation with progressively relaxed requirements.
//
// Relaxation order (RELAXATIONS):
//   1. Halve the multisample count while it is positive
//   2. Disable stencil-based reflection
//   → Exhausted
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::CapabilityError;

//=== PixelFormat =========================================================

/// Framebuffer requirements for window/context creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub bits_per_pixel: u8,
    pub depth_bits: u8,
    /// Reflection rendering needs a stencil buffer.
    pub reflection: bool,
    /// Multisample count (0 disables multisampling).
    pub samples: u32,
}

impl PixelFormat {
    /// Requirements derived from the reflection and multisample settings.
    pub fn new(reflection: bool, samples: u32) -> Self {
        Self {
            bits_per_pixel: 15,
            depth_bits: 16,
            reflection,
            samples,
        }
    }

    /// Stencil bits implied by the reflection flag.
    pub fn stencil_bits(&self) -> u8 {
        u8::from(self.reflection)
    }
}

//=== Relaxation ==========================================================

/// One step that lowers a [`PixelFormat`]'s requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relaxation {
    HalveMultisample,
    DisableReflection,
}

/// Relaxations in the order they are tried.
pub const RELAXATIONS: [Relaxation; 2] = [Relaxation::HalveMultisample, Relaxation::DisableReflection];

impl Relaxation {
    /// Applies the step, returning `false` if it no longer changes anything.
    pub fn apply(self, format: &mut PixelFormat) -> bool {
        match self {
            Self::HalveMultisample if format.samples > 0 => {
                format.samples /= 2;
                true
            }
            Self::DisableReflection if format.reflection => {
                format.reflection = false;
                true
            }
            _ => false,
        }
    }
}

//=== Public API ==========================================================

/// Calls `attempt` with `requested`, relaxing it after each failure.
///
/// Returns the format that succeeded. When no relaxation applies any more,
/// returns [`CapabilityError::Exhausted`] carrying the last failure.
pub fn create_with_fallback<F>(requested: PixelFormat, mut attempt: F) -> Result<PixelFormat, CapabilityError>
where
    F: FnMut(&PixelFormat) -> Result<(), CapabilityError>,
{
    let mut format = requested;

    loop {
        let err = match attempt(&format) {
            Ok(()) => {
                if format != requested {
                    info!(target: "engine", "Display created with relaxed format {:?}", format);
                }
                return Ok(format);
            }
            Err(e) => e,
        };

        warn!(target: "engine", "Display creation failed with {:?}: {}", format, err);

        let relaxed = RELAXATIONS.iter().any(|step| step.apply(&mut format));
        if !relaxed {
            return Err(CapabilityError::Exhausted(Box::new(err)));
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
