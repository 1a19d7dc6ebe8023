mod animation;
mod state;
mod timer;

pub use animation::{AnimationEngine, Subscription, DEFAULT_BASE_DELAY};
pub use state::{seek_fraction_to_step, AnimationState, PlaybackPhase, MAX_SPEED, MIN_SPEED};
