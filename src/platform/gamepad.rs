//=========================================================================
// Gamepad Source
//
// Gilrs-backed controller provider.
//
// Gilrs hands out one event queue for every connected pad. The provider
// and each opened controller share it; a controller keeps the events
// addressed to its own pad and drops the rest.
//
// Indices follow the fixed tables below so that saved axis bindings
// stay valid across sessions.
//=========================================================================

use std::cell::RefCell;
use std::rc::Rc;

use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use log::*;

use crate::core::backend::{ControllerProvider, ControllerSource};
use crate::core::input::ControllerEvent;

//=== Index Tables ========================================================

const AXES: [(Axis, &str); 6] = [
    (Axis::LeftStickX, "left x"),
    (Axis::LeftStickY, "left y"),
    (Axis::LeftZ, "z"),
    (Axis::RightStickX, "right x"),
    (Axis::RightStickY, "right y"),
    (Axis::RightZ, "rz"),
];

const BUTTONS: [Button; 13] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
];

fn axis_index(axis: Axis) -> Option<usize> {
    AXES.iter().position(|(candidate, _)| *candidate == axis)
}

fn button_index(button: Button) -> Option<usize> {
    BUTTONS.iter().position(|candidate| *candidate == button)
}

/// Gilrs reports stick Y as up-positive; controllers here report down.
fn oriented(axis: Axis, value: f32) -> f32 {
    match axis {
        Axis::LeftStickY | Axis::RightStickY => -value,
        _ => value,
    }
}

//=== Event Mapping =======================================================

/// Converts one gilrs event into controller events.
fn map_event(event: EventType, out: &mut Vec<ControllerEvent>) {
    match event {
        EventType::ButtonPressed(button, _) => map_button(button, true, out),
        EventType::ButtonReleased(button, _) => map_button(button, false, out),
        EventType::AxisChanged(axis, value, _) => map_axis(axis, value, out),
        _ => {
            // Ignore: analog button values, connection changes, etc.
        }
    }
}

/// D-pad buttons become POV events.
fn map_button(button: Button, down: bool, out: &mut Vec<ControllerEvent>) {
    let pov = if down { 1.0 } else { 0.0 };
    match button {
        Button::DPadLeft => out.push(ControllerEvent::PovX(-pov)),
        Button::DPadRight => out.push(ControllerEvent::PovX(pov)),
        Button::DPadUp => out.push(ControllerEvent::PovY(-pov)),
        Button::DPadDown => out.push(ControllerEvent::PovY(pov)),
        other => match button_index(other) {
            Some(index) => out.push(ControllerEvent::Button { index, down }),
            None => trace!(target: "input::controller", "Unmapped button {:?}", other),
        },
    }
}

/// D-pad axes become POV events snapped to -1, 0 or 1.
fn map_axis(axis: Axis, value: f32, out: &mut Vec<ControllerEvent>) {
    let snapped = if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    };

    match axis {
        Axis::DPadX => out.push(ControllerEvent::PovX(snapped)),
        Axis::DPadY => out.push(ControllerEvent::PovY(-snapped)),
        other => match axis_index(other) {
            Some(index) => out.push(ControllerEvent::Axis { index, value: oriented(other, value) }),
            None => trace!(target: "input::controller", "Unmapped axis {:?}", other),
        },
    }
}

//=== GilrsControllers ====================================================

/// Opens gamepads through gilrs.
pub struct GilrsControllers {
    gilrs: Rc<RefCell<Gilrs>>,
}

impl GilrsControllers {
    /// Returns `None` when gamepad support is unavailable on this system.
    pub fn new() -> Option<Self> {
        match Gilrs::new() {
            Ok(gilrs) => Some(Self { gilrs: Rc::new(RefCell::new(gilrs)) }),
            Err(e) => {
                warn!(target: "input::controller", "Gamepad support unavailable: {}", e);
                None
            }
        }
    }
}

impl ControllerProvider for GilrsControllers {
    fn open(&mut self, index: usize) -> Option<Box<dyn ControllerSource>> {
        let id = {
            let gilrs = self.gilrs.borrow();
            let (id, gamepad) = gilrs
                .gamepads()
                .filter(|(_, gamepad)| gamepad.is_connected())
                .nth(index)?;
            info!(target: "input::controller", "Opened controller {}: {}", index, gamepad.name());
            id
        };

        Some(Box::new(GilrsController {
            gilrs: Rc::clone(&self.gilrs),
            id,
        }))
    }
}

//=== GilrsController =====================================================

struct GilrsController {
    gilrs: Rc<RefCell<Gilrs>>,
    id: GamepadId,
}

impl ControllerSource for GilrsController {
    fn axis_names(&self) -> Vec<String> {
        AXES.iter().map(|(_, name)| name.to_string()).collect()
    }

    fn poll(&mut self, events: &mut Vec<ControllerEvent>) {
        let mut gilrs = self.gilrs.borrow_mut();
        while let Some(event) = gilrs.next_event() {
            if event.id == self.id {
                map_event(event.event, events);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
