//=========================================================================
// Controller Dispatch
//=========================================================================
//
// Axis binding, deadzone tracking and routing of controller events.
//
// D-pad and analog axes map through an AxisBinding to logical X/Y/Z.
// X and Y track whether they are centered: values inside the deadzone are
// only forwarded once, as the axis returns to center, and each forwarded
// event says whether the axis was centered before it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::event::{ControllerAxis, ControllerEvent};
use crate::core::config::ControllerSettings;
use crate::core::screen::{ScreenKey, ScreenManager};

/// Magnitude above which an axis counts as pushed.
pub const AXIS_DEADZONE: f32 = 0.5;

//=== AxisBinding =========================================================

/// Controller axis indices bound to the logical movement axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBinding {
    pub x: usize,
    pub y: usize,
    pub z: Option<usize>,
}

impl AxisBinding {
    /// Resolves the binding from configured axes and the controller's axis
    /// names.
    ///
    /// Configured axes win. Unconfigured axes are detected by name, lowest
    /// index first; a right-stick X axis is preferred over a Z axis for
    /// logical Z. If X or Y stays unknown, axes 0 and 1 are used.
    pub fn detect(names: &[String], configured: &ControllerSettings) -> Self {
        let mut found_x = None;
        let mut found_y = None;
        let mut found_z = None;
        let mut found_rx = None;

        for (index, name) in names.iter().enumerate().rev() {
            let name = name.to_lowercase().replace('-', " ");

            match name.as_str() {
                "x" | "x axis" | "left x" => found_x = Some(index),
                "y" | "y axis" | "left y" => found_y = Some(index),
                "z" | "z axis" => found_z = Some(index),
                "rx" | "rx axis" | "x rotation" | "right x" => found_rx = Some(index),
                _ => {}
            }
        }

        let x = configured.axis_x.or(found_x);
        let y = configured.axis_y.or(found_y);
        let z = configured.axis_z.or(found_rx.or(found_z));

        match (x, y) {
            (Some(x), Some(y)) => Self { x, y, z },
            _ => Self { x: 0, y: 1, z },
        }
    }
}

//=== ControllerState =====================================================

/// Per-controller dispatch state.
#[derive(Debug, Clone)]
pub struct ControllerState {
    binding: AxisBinding,
    invert_x: bool,
    invert_y: bool,
    invert_z: bool,
    exit_button: Option<usize>,
    axis_values: HashMap<usize, f32>,
    x_centered: bool,
    y_centered: bool,
}

impl ControllerState {
    pub fn new(binding: AxisBinding, settings: &ControllerSettings) -> Self {
        Self {
            binding,
            invert_x: settings.invert_x,
            invert_y: settings.invert_y,
            invert_z: settings.invert_z,
            exit_button: settings.button_exit,
            axis_values: HashMap::new(),
            x_centered: true,
            y_centered: true,
        }
    }

    pub fn binding(&self) -> AxisBinding {
        self.binding
    }

    //--- Dispatch ---------------------------------------------------------

    /// Routes one controller event to the active screen.
    pub fn handle<K: ScreenKey>(&mut self, event: ControllerEvent, screens: &mut ScreenManager<K>) {
        let (index, value) = match event {
            ControllerEvent::PovX(value) => (self.binding.x, value),
            ControllerEvent::PovY(value) => (self.binding.y, value),
            ControllerEvent::Axis { index, value } => {
                if self.axis_values.insert(index, value) == Some(value) {
                    return;
                }
                (index, value)
            }
            ControllerEvent::Button { index, down } => {
                self.button(index, down, screens);
                return;
            }
        };

        self.move_axis(index, value, screens);
    }

    //--- Internal Helpers -------------------------------------------------

    fn button<K: ScreenKey>(&self, index: usize, down: bool, screens: &mut ScreenManager<K>) {
        if !down {
            screens.dispatch(|screen, ctx| screen.controller_up(index, ctx));
        } else if Some(index) == self.exit_button {
            debug!(target: "engine", "Controller exit button {} pressed", index);
            screens.dispatch(|screen, ctx| screen.exit_requested(ctx));
        } else {
            screens.dispatch(|screen, ctx| screen.controller_down(index, ctx));
        }
    }

    fn move_axis<K: ScreenKey>(&mut self, index: usize, value: f32, screens: &mut ScreenManager<K>) {
        let significant = value.abs() > AXIS_DEADZONE;

        let (axis, invert, recentered, forward) = if index == self.binding.x {
            let was_centered = std::mem::replace(&mut self.x_centered, !significant);
            (ControllerAxis::X, self.invert_x, was_centered, significant || !was_centered)
        } else if index == self.binding.y {
            let was_centered = std::mem::replace(&mut self.y_centered, !significant);
            (ControllerAxis::Y, self.invert_y, was_centered, significant || !was_centered)
        } else if Some(index) == self.binding.z {
            (ControllerAxis::Z, self.invert_z, false, true)
        } else {
            (ControllerAxis::Other(index), false, false, true)
        };

        if !forward {
            return;
        }

        let value = if invert { -value } else { value };
        screens.dispatch(|screen, ctx| screen.controller_move(axis, value, recentered, ctx));
    }
}
