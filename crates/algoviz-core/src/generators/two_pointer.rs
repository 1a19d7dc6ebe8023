use tracing::warn;

use super::StepRecorder;
use crate::step::{ArrayState, Pointer, Step};

const COLOR_LEFT: &str = "#3b82f6";
const COLOR_RIGHT: &str = "#ef4444";

fn pointer_state(values: &[i64], left: usize, right: usize) -> ArrayState {
    ArrayState::new(values.to_vec()).with_pointers(vec![
        Pointer::new(left, "left").with_color(COLOR_LEFT),
        Pointer::new(right, "right").with_color(COLOR_RIGHT),
    ])
}

/// Search a pair summing to `target` in an ascending array
///
/// The input is not sorted here; unsorted input simply yields whatever the
/// pointer walk finds.
pub fn two_pointer(values: &[i64], target: i64) -> Vec<Step> {
    let n = values.len();
    if n == 0 {
        warn!("two-pointer search needs at least one value");
        return Vec::new();
    }

    let mut left = 0;
    let mut right = n - 1;
    let mut recorder = StepRecorder::new();

    recorder.push(
        "initial",
        format!("Find two values summing to {} with pointers at both ends", target),
        pointer_state(values, left, right),
        Vec::new(),
        None,
    );

    let wanted = i128::from(target);
    while left < right {
        let sum = i128::from(values[left]) + i128::from(values[right]);
        recorder.count_comparison();

        let verdict = if sum == wanted {
            "matches the target".to_string()
        } else if sum < wanted {
            format!("< {}: move left pointer right", target)
        } else {
            format!("> {}: move right pointer left", target)
        };
        recorder.push(
            "compare",
            format!(
                "{} + {} = {} {}",
                values[left], values[right], sum, verdict
            ),
            pointer_state(values, left, right),
            Vec::new(),
            Some((left, right)),
        );

        if sum == wanted {
            recorder.push(
                "found",
                format!(
                    "Found pair at indices {} and {}: {} + {} = {}",
                    left, right, values[left], values[right], target
                ),
                pointer_state(values, left, right),
                vec![left, right],
                None,
            );
            return recorder.finish();
        }

        if sum < wanted {
            left += 1;
        } else {
            right -= 1;
        }
    }

    recorder.push(
        "not-found",
        format!("Pointers met: no pair sums to {}", target),
        pointer_state(values, left, right),
        Vec::new(),
        None,
    );
    recorder.finish()
}
