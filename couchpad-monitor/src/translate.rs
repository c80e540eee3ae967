//! Translation of raw evdev events into abstract actions

use couchpad_common::settings::DeviceMapping;
use couchpad_common::Action;
use evdev::{AbsoluteAxisType, InputEvent, InputEventKind};

/// Map one raw event to an action under the device's button map
///
/// Key events translate through the configured buttons; the two HAT axes
/// translate through a fixed direction table. Everything else is `None`.
pub fn translate(mapping: &DeviceMapping, event: &InputEvent) -> Option<Action> {
    match event.kind() {
        InputEventKind::Key(key) => translate_button(mapping, key.0, event.value()),
        InputEventKind::AbsAxis(axis) => translate_hat(axis, event.value()),
        _ => None,
    }
}

// Key presses only; release (0) and autorepeat (2) never produce an action.
fn translate_button(mapping: &DeviceMapping, code: u16, value: i32) -> Option<Action> {
    if value != 1 {
        return None;
    }

    mapping
        .buttons
        .iter()
        .find(|&(_, &mapped)| mapped == code)
        .map(|(&action, _)| action)
}

// HAT axes report -1/0/+1; 0 is the centered position.
fn translate_hat(axis: AbsoluteAxisType, value: i32) -> Option<Action> {
    if axis == AbsoluteAxisType::ABS_HAT0X {
        match value {
            -1 => Some(Action::Left),
            1 => Some(Action::Right),
            _ => None,
        }
    } else if axis == AbsoluteAxisType::ABS_HAT0Y {
        match value {
            -1 => Some(Action::Up),
            1 => Some(Action::Down),
            _ => None,
        }
    } else {
        None
    }
}
