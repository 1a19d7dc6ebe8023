use super::Step;
use crate::Result;

/// Serialize a step sequence as pretty-printed JSON
pub fn to_json(steps: &[Step]) -> Result<String> {
    Ok(serde_json::to_string_pretty(steps)?)
}

/// Load a step sequence previously written by [`to_json`]
pub fn from_json(content: &str) -> Result<Vec<Step>> {
    Ok(serde_json::from_str(content)?)
}
