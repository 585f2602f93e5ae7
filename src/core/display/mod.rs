//=========================================================================
// Display Configuration
//=========================================================================
//
// Display mode negotiation and graphics-context fallback.
//
// Flow:
//   reported modes + desktop mode → negotiate() → DisplayMode
//   PixelFormat → create_with_fallback() → accepted PixelFormat
//
//=========================================================================

//=== Module Declarations =================================================

mod negotiator;
mod pixel_format;

//=== Public API ==========================================================

pub use negotiator::{best_modes, negotiate, sorted_modes, DisplayMode};
pub use pixel_format::{create_with_fallback, PixelFormat, Relaxation, RELAXATIONS};
