use std::collections::VecDeque;

use crate::time::FrameTimeS;

use super::Animation;

/// Runs animations one after the other.
///
/// Each `update` does at most one step: drop the head if it has finished,
/// otherwise advance the head. A finished child is therefore removed on the
/// update after the one that finished it, and the next child first advances
/// on the update after that.
#[derive(Default)]
pub struct SequentialAnimation {
    anims: VecDeque<Box<dyn Animation>>,
}

impl SequentialAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an animation to the back of the queue.
    pub fn push(&mut self, anim: Box<dyn Animation>) {
        self.anims.push_back(anim);
    }

    /// Number of animations not yet removed.
    pub fn len(&self) -> usize {
        self.anims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anims.is_empty()
    }

    /// Drops every queued animation without running it.
    pub fn clear(&mut self) {
        self.anims.clear();
    }
}

impl Animation for SequentialAnimation {
    fn update(&mut self, t: FrameTimeS) {
        let Some(head) = self.anims.front_mut() else { return };
        if head.has_finished() {
            self.anims.pop_front();
        } else {
            head.update(t);
        }
    }

    fn has_finished(&self) -> bool {
        self.anims.is_empty()
    }
}

impl std::fmt::Debug for SequentialAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequentialAnimation")
            .field("len", &self.anims.len())
            .finish()
    }
}
