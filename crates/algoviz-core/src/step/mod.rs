mod export;
mod models;

pub use export::{from_json, to_json};
pub use models::*;
