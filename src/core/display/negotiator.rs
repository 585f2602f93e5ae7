//=========================================================================
// Display Mode Negotiator
//=========================================================================
//
// Selects a concrete display mode from the modes a backend reports.
//
// Steps:
//   1. Keep the best mode per resolution (depth, then refresh rate)
//   2. Pick a default size if none was requested
//   3. Clamp each axis to the largest reported extent
//   4. Return the exact match, or a windowed-only mode
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== DisplayMode =========================================================

/// A concrete display configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    /// Color depth in bits per pixel.
    pub bit_depth: u32,
    /// Refresh rate in Hz.
    pub refresh_rate: u32,
    /// `false` for synthesized modes that only work in a window.
    pub fullscreen_capable: bool,
}

impl DisplayMode {
    /// Creates a mode reported by the backend (fullscreen-capable).
    pub const fn new(width: u32, height: u32, bit_depth: u32, refresh_rate: u32) -> Self {
        Self {
            width,
            height,
            bit_depth,
            refresh_rate,
            fullscreen_capable: true,
        }
    }

    /// Creates a mode usable only in windowed display.
    pub const fn windowed(width: u32, height: u32, bit_depth: u32, refresh_rate: u32) -> Self {
        Self {
            width,
            height,
            bit_depth,
            refresh_rate,
            fullscreen_capable: false,
        }
    }

    fn same_size(&self, other: &DisplayMode) -> bool {
        self.width == other.width && self.height == other.height
    }
}

//--- Mode Preference -----------------------------------------------------

/// Returns `true` if `current` should be kept over `candidate`.
///
/// Criteria, in order: color depth matching the desktop, higher depth,
/// refresh rate matching the desktop, higher refresh rate. Ties keep
/// `current`.
fn is_mode_better(current: &DisplayMode, candidate: &DisplayMode, desktop: &DisplayMode) -> bool {
    let depth_matches = |m: &DisplayMode| m.bit_depth == desktop.bit_depth;

    if depth_matches(current) != depth_matches(candidate) {
        return depth_matches(current);
    }
    if current.bit_depth != candidate.bit_depth {
        return current.bit_depth > candidate.bit_depth;
    }

    if current.refresh_rate == desktop.refresh_rate {
        return true;
    }
    if candidate.refresh_rate == desktop.refresh_rate {
        return false;
    }

    current.refresh_rate >= candidate.refresh_rate
}

//=== Public API ==========================================================

/// Deduplicates reported modes by resolution, keeping the best of each.
///
/// Output order follows the first appearance of each resolution.
pub fn best_modes(available: &[DisplayMode], desktop: &DisplayMode) -> Vec<DisplayMode> {
    let mut modes: Vec<DisplayMode> = Vec::with_capacity(available.len());

    for mode in available {
        match modes.iter_mut().find(|kept| kept.same_size(mode)) {
            Some(kept) => {
                if !is_mode_better(kept, mode, desktop) {
                    *kept = *mode;
                }
            }
            None => modes.push(*mode),
        }
    }

    modes
}

/// Best modes sorted for presentation: width descending, then height.
pub fn sorted_modes(available: &[DisplayMode], desktop: &DisplayMode) -> Vec<DisplayMode> {
    let mut modes = best_modes(available, desktop);
    modes.sort_by(|a, b| b.width.cmp(&a.width).then(b.height.cmp(&a.height)));
    modes
}

/// Negotiates the display mode for a requested size.
///
/// `desired` of `None` (or a zero extent) selects 800x600 when the desktop
/// exceeds it in both dimensions, 640x480 otherwise. When the backend reports
/// no modes at all the size is used unclamped.
pub fn negotiate(
    desired: Option<(u32, u32)>,
    desktop: &DisplayMode,
    available: &[DisplayMode],
) -> DisplayMode {
    let modes = best_modes(available, desktop);

    let (mut width, mut height) = match desired {
        Some((w, h)) if w > 0 && h > 0 => (w, h),
        _ => {
            if desktop.width > 800 && desktop.height > 600 {
                (800, 600)
            } else {
                (640, 480)
            }
        }
    };

    if !modes.is_empty() {
        let max_width = modes.iter().map(|m| m.width).max().unwrap_or(width);
        let max_height = modes.iter().map(|m| m.height).max().unwrap_or(height);

        width = width.min(max_width);
        height = height.min(max_height);
    }

    if let Some(mode) = modes.iter().find(|m| m.width == width && m.height == height) {
        debug!(target: "engine", "Negotiated display mode {:?}", mode);
        return *mode;
    }

    debug!(target: "engine", "No reported mode for {}x{}, using windowed mode", width, height);
    DisplayMode::windowed(width, height, desktop.bit_depth, desktop.refresh_rate)
}

//=========================================================================
// Unit Tests
//=========================================================================
