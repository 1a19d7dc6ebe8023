pub mod config;
pub mod engine;
pub mod error;
pub mod generators;
pub mod layout;
pub mod mood;
pub mod step;

pub use config::{AppConfig, DisplayConfig, PlaybackConfig};
pub use engine::{AnimationEngine, AnimationState, PlaybackPhase};
pub use error::{Error, Result};
pub use generators::{generate, generate_checked, Algorithm, GeneratorInput};
pub use mood::Mood;
pub use step::{DataState, Step};
