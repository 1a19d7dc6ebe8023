use std::sync::Arc;

use crate::step::{DataState, Step};

/// Slowest allowed playback multiplier
pub const MIN_SPEED: f64 = 0.1;
/// Fastest allowed playback multiplier
pub const MAX_SPEED: f64 = 3.0;

/// Coarse playback state derived from an [`AnimationState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Paused,
    Playing,
    /// Paused on the last step (or nothing to play)
    Finished,
}

/// Snapshot of an engine, handed to subscribers by value
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    pub current_step: usize,
    pub total_steps: usize,
    pub is_playing: bool,
    pub speed: f64,
    pub steps: Arc<[Step]>,
    /// Always `steps[current_step].state` when there are steps
    pub current_state: DataState,
}

impl AnimationState {
    pub(crate) fn new(steps: Arc<[Step]>, initial_state: DataState) -> Self {
        let current_state = steps
            .first()
            .map(|step| step.state.clone())
            .unwrap_or(initial_state);
        Self {
            current_step: 0,
            total_steps: steps.len(),
            is_playing: false,
            speed: 1.0,
            steps,
            current_state,
        }
    }

    /// Move the cursor to `index` and sync `current_state`
    ///
    /// Returns false for out-of-range indices.
    pub(crate) fn move_to(&mut self, index: usize) -> bool {
        match self.steps.get(index) {
            Some(step) => {
                self.current_step = index;
                self.current_state = step.state.clone();
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&Step> {
        self.steps.get(self.current_step)
    }

    /// Cursor is on the last step, or there are no steps at all
    pub fn is_at_end(&self) -> bool {
        self.total_steps == 0 || self.current_step + 1 >= self.total_steps
    }

    pub fn phase(&self) -> PlaybackPhase {
        if self.is_playing {
            PlaybackPhase::Playing
        } else if self.is_at_end() {
            PlaybackPhase::Finished
        } else {
            PlaybackPhase::Paused
        }
    }

    /// Position on a seek bar, 0.0 to 1.0
    pub fn progress(&self) -> f64 {
        if self.total_steps <= 1 {
            return if self.total_steps == 1 { 1.0 } else { 0.0 };
        }
        self.current_step as f64 / (self.total_steps - 1) as f64
    }
}

/// Map a click on a seek bar to a step index
///
/// `fraction` is clamped to [0, 1]; returns None when there is nothing to seek.
pub fn seek_fraction_to_step(fraction: f64, total_steps: usize) -> Option<usize> {
    if total_steps == 0 || fraction.is_nan() {
        return None;
    }
    let fraction = fraction.clamp(0.0, 1.0);
    Some((fraction * (total_steps - 1) as f64).round() as usize)
}
