use std::collections::HashMap;

use crate::coords::Vec2;

use super::frame::InputFrame;
use super::types::{Flag, Flags, InputType, SInput};

/// Current input state for one surface.
///
/// Tracks active contacts by id so that out-of-order or orphaned samples
/// (a move for a finger that never went down, a second down for the same id)
/// are filtered before they reach stroke building.
#[derive(Debug, Default)]
pub struct InputState {
    /// Active contacts keyed by id, holding their most recent sample.
    contacts: HashMap<u32, SInput>,

    /// Last known hover position of a mouse/pen that is not in contact.
    pub hover_pos: Option<Vec2>,

    /// Modifier keys currently held (Shift/Control/Alt/Meta bits only).
    pub modifiers: Flags,

    /// Time of the most recent accepted sample.
    pub last_time: Option<f64>,
}

impl InputState {
    /// Applies one sample to the current state and records it into `frame`.
    ///
    /// Returns `false` when the sample was dropped as inconsistent.
    pub fn apply_input(&mut self, frame: &mut InputFrame, input: SInput) -> bool {
        if let Some(last) = self.last_time {
            if input.time_s < last {
                log::debug!(
                    "input id={} at t={} arrived before t={}; accepting out of order",
                    input.id,
                    input.time_s,
                    last
                );
            }
        }

        if input.flags.has(Flag::Cancel) {
            self.contacts.clear();
            frame.cancelled = true;
            frame.push_input(input);
            self.last_time = Some(input.time_s);
            return true;
        }

        self.modifiers = Flags(
            input.flags.bits()
                & Flags::of(&[Flag::Shift, Flag::Control, Flag::Alt, Flag::Meta]).bits(),
        );

        if input.input_type == InputType::Wheel || input.flags.has(Flag::Wheel) {
            frame.wheel.push(input);
            frame.push_input(input);
            self.last_time = Some(input.time_s);
            return true;
        }

        if input.is_down() {
            if self.contacts.insert(input.id, input).is_some() {
                log::debug!("contact id={} went down twice; restarting it", input.id);
            }
            frame.downs.insert(input.id);
        } else if input.is_up() {
            if self.contacts.remove(&input.id).is_none() {
                log::debug!("dropping up for unknown contact id={}", input.id);
                return false;
            }
            frame.ups.insert(input.id);
        } else if input.in_contact() {
            match self.contacts.get_mut(&input.id) {
                Some(slot) => *slot = input,
                None => {
                    log::debug!("dropping move for contact id={} that never went down", input.id);
                    return false;
                }
            }
        } else {
            self.hover_pos = Some(input.screen_pos);
        }

        self.last_time = Some(input.time_s);
        frame.push_input(input);
        true
    }

    /// Number of contacts currently down.
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn contact(&self, id: u32) -> Option<&SInput> {
        self.contacts.get(&id)
    }

    pub fn is_down(&self, id: u32) -> bool {
        self.contacts.contains_key(&id)
    }

    /// Ids of active contacts, sorted.
    pub fn contact_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.contacts.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::types::{FLAGS_BEGIN_STROKE, FLAGS_END_STROKE, FLAGS_MOVE_WHILE_DOWN};

    fn sample(id: u32, flags: Flags, t: f64) -> SInput {
        SInput { id, flags, time_s: t, ..Default::default() }
    }

    #[test]
    fn tracks_contact_lifecycle() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        assert!(state.apply_input(&mut frame, sample(1, FLAGS_BEGIN_STROKE, 0.0)));
        assert!(state.is_down(1));
        assert!(state.apply_input(&mut frame, sample(1, FLAGS_MOVE_WHILE_DOWN, 0.1)));
        assert!(state.apply_input(&mut frame, sample(1, FLAGS_END_STROKE, 0.2)));
        assert!(!state.is_down(1));

        assert!(frame.downs.contains(&1));
        assert!(frame.ups.contains(&1));
        assert_eq!(frame.inputs.len(), 3);
    }

    #[test]
    fn drops_orphan_moves_and_ups() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        assert!(!state.apply_input(&mut frame, sample(7, FLAGS_MOVE_WHILE_DOWN, 0.0)));
        assert!(!state.apply_input(&mut frame, sample(7, FLAGS_END_STROKE, 0.1)));
        assert!(frame.is_empty());
    }

    #[test]
    fn cancel_clears_all_contacts() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_input(&mut frame, sample(1, FLAGS_BEGIN_STROKE, 0.0));
        state.apply_input(&mut frame, sample(2, FLAGS_BEGIN_STROKE, 0.0));
        assert_eq!(state.contact_ids(), vec![1, 2]);

        state.apply_input(&mut frame, sample(0, Flags::of(&[Flag::Cancel]), 0.1));
        assert_eq!(state.contact_count(), 0);
        assert!(frame.cancelled);
    }

    #[test]
    fn frame_clear_resets_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_input(&mut frame, sample(1, FLAGS_BEGIN_STROKE, 0.0));
        frame.clear();
        assert!(frame.is_empty());
        assert!(frame.downs.is_empty());
    }
}
