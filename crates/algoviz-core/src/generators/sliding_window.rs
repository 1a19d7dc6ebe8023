use tracing::warn;

use super::StepRecorder;
use crate::step::{ArrayState, Partition, Step, WindowRange};

fn window_state(values: &[i64], start: usize, k: usize, best_start: usize) -> ArrayState {
    ArrayState::new(values.to_vec())
        .with_window(start, start + k - 1)
        .with_partitions(vec![Partition::labeled(best_start, best_start + k - 1, "best")])
}

/// Maximum-sum window of fixed size `k`
///
/// Each slide updates the running sum in O(1). Ties keep the earliest window.
pub fn sliding_window(values: &[i64], k: usize) -> Vec<Step> {
    let n = values.len();
    if k < 1 || k > n {
        warn!(window = k, len = n, "window size out of range");
        return Vec::new();
    }

    // Running sums are widened so the intermediate `sum - outgoing` cannot
    // overflow even when every window fits in i64
    let mut recorder = StepRecorder::new();
    let mut sum: i128 = values[..k].iter().map(|&v| i128::from(v)).sum();
    let mut best_sum = sum;
    let mut best_start = 0;

    let best_indices = |start: usize| WindowRange { start, end: start + k - 1 }.indices();

    recorder.push(
        "initial",
        format!("Initial window [0..{}] sums to {}", k - 1, sum),
        window_state(values, 0, k, best_start),
        best_indices(best_start),
        None,
    );

    for start in 1..=n - k {
        let outgoing = values[start - 1];
        let incoming = values[start + k - 1];
        sum = sum - i128::from(outgoing) + i128::from(incoming);

        recorder.count_comparison();
        let improved = sum > best_sum;
        if improved {
            best_sum = sum;
            best_start = start;
        }

        recorder.push(
            "slide",
            format!(
                "Slide to [{}..{}]: -{} +{} = {}{}",
                start,
                start + k - 1,
                outgoing,
                incoming,
                sum,
                if improved {
                    " (new best)".to_string()
                } else {
                    format!(" (best so far {})", best_sum)
                }
            ),
            window_state(values, start, k, best_start),
            best_indices(best_start),
            None,
        );
    }

    recorder.push(
        "best",
        format!(
            "Maximum window sum is {} at [{}..{}]",
            best_sum,
            best_start,
            best_start + k - 1
        ),
        window_state(values, best_start, k, best_start),
        best_indices(best_start),
        None,
    );
    recorder.finish()
}
