//! Comparison sorts: bubble, selection and insertion.

use tracing::warn;

use super::StepRecorder;
use crate::step::{ArrayState, Partition, Pointer, Step};

const COLOR_CURSOR: &str = "#3b82f6";
const COLOR_MIN: &str = "#f59e0b";
const COLOR_KEY: &str = "#a855f7";

/// Array snapshot with sorted flags and the matching "sorted" partitions
fn sort_state(values: &[i64], sorted: &[bool], pointers: Vec<Pointer>) -> ArrayState {
    ArrayState::new(values.to_vec())
        .with_pointers(pointers)
        .with_partitions(sorted_runs(sorted))
        .with_sorted(sorted.to_vec())
}

/// Contiguous runs of `true` flags
fn sorted_runs(sorted: &[bool]) -> Vec<Partition> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &done) in sorted.iter().enumerate() {
        match (done, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(Partition::labeled(s, i - 1, "sorted"));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(Partition::labeled(s, sorted.len() - 1, "sorted"));
    }
    runs
}

fn finish_sort(mut recorder: StepRecorder, name: &str, values: &[i64]) -> Vec<Step> {
    let sorted = vec![true; values.len()];
    recorder.push(
        "complete",
        format!("{} complete: every element is in its final position", name),
        sort_state(values, &sorted, Vec::new()),
        Vec::new(),
        None,
    );
    recorder.finish()
}

/// Bubble sort without the early-exit optimisation
pub fn bubble_sort(input: &[i64]) -> Vec<Step> {
    let n = input.len();
    if n == 0 {
        warn!("bubble sort needs at least one value");
        return Vec::new();
    }

    let mut values = input.to_vec();
    let mut sorted = vec![false; n];
    let mut recorder = StepRecorder::new();

    recorder.push(
        "initial",
        format!("Bubble sort on {} elements", n),
        sort_state(&values, &sorted, Vec::new()),
        Vec::new(),
        None,
    );

    for i in 0..n - 1 {
        for j in 0..n - i - 1 {
            recorder.count_comparison();
            recorder.push(
                "compare",
                format!(
                    "Pass {}: compare {} (index {}) with {} (index {})",
                    i + 1,
                    values[j],
                    j,
                    values[j + 1],
                    j + 1
                ),
                sort_state(&values, &sorted, vec![Pointer::new(j, "j").with_color(COLOR_CURSOR)]),
                Vec::new(),
                Some((j, j + 1)),
            );

            if values[j] > values[j + 1] {
                values.swap(j, j + 1);
                recorder.count_swap();
                recorder.push(
                    "swap",
                    format!(
                        "{} > {}: swap them",
                        values[j + 1],
                        values[j]
                    ),
                    sort_state(
                        &values,
                        &sorted,
                        vec![Pointer::new(j + 1, "j").with_color(COLOR_CURSOR)],
                    ),
                    vec![j, j + 1],
                    None,
                );
            }
        }
        sorted[n - 1 - i] = true;
    }

    finish_sort(recorder, "Bubble sort", &values)
}

/// Selection sort; every pass ends in exactly one swap step, including the
/// no-op swap when the minimum is already at `i`
pub fn selection_sort(input: &[i64]) -> Vec<Step> {
    let n = input.len();
    if n == 0 {
        warn!("selection sort needs at least one value");
        return Vec::new();
    }

    let mut values = input.to_vec();
    let mut sorted = vec![false; n];
    let mut recorder = StepRecorder::new();

    recorder.push(
        "initial",
        format!("Selection sort on {} elements", n),
        sort_state(&values, &sorted, Vec::new()),
        Vec::new(),
        None,
    );

    for i in 0..n - 1 {
        let mut min = i;

        for j in i + 1..n {
            recorder.count_comparison();
            recorder.push(
                "compare",
                format!(
                    "Compare current minimum {} (index {}) with {} (index {})",
                    values[min], min, values[j], j
                ),
                sort_state(
                    &values,
                    &sorted,
                    vec![
                        Pointer::new(i, "i").with_color(COLOR_CURSOR),
                        Pointer::new(min, "min").with_color(COLOR_MIN),
                    ],
                ),
                vec![min],
                Some((min, j)),
            );

            if values[j] < values[min] {
                min = j;
            }
        }

        values.swap(i, min);
        recorder.count_swap();
        let description = if min == i {
            format!("{} is already the minimum: it stays at index {}", values[i], i)
        } else {
            format!(
                "Swap minimum {} (index {}) into index {}",
                values[i], min, i
            )
        };
        let highlights = if min == i { vec![i] } else { vec![i, min] };
        recorder.push(
            "swap",
            description,
            sort_state(
                &values,
                &sorted,
                vec![Pointer::new(i, "i").with_color(COLOR_CURSOR)],
            ),
            highlights,
            None,
        );

        sorted[i] = true;
    }

    finish_sort(recorder, "Selection sort", &values)
}

/// Insertion sort; each position the key moves left is one shift step
pub fn insertion_sort(input: &[i64]) -> Vec<Step> {
    let n = input.len();
    if n == 0 {
        warn!("insertion sort needs at least one value");
        return Vec::new();
    }

    let mut values = input.to_vec();
    let mut recorder = StepRecorder::new();

    let prefix_state = |values: &[i64], sorted_end: usize, key: usize| {
        ArrayState::new(values.to_vec())
            .with_pointers(vec![Pointer::new(key, "key").with_color(COLOR_KEY)])
            .with_partitions(vec![Partition::labeled(0, sorted_end, "sorted prefix")])
    };

    recorder.push(
        "initial",
        format!("Insertion sort on {} elements", n),
        ArrayState::new(values.clone())
            .with_partitions(vec![Partition::labeled(0, 0, "sorted prefix")]),
        Vec::new(),
        None,
    );

    for i in 1..n {
        let mut k = i;
        while k > 0 {
            recorder.count_comparison();
            recorder.push(
                "compare",
                format!(
                    "Compare key {} (index {}) with left neighbour {}",
                    values[k],
                    k,
                    values[k - 1]
                ),
                prefix_state(&values, i - 1, k),
                Vec::new(),
                Some((k - 1, k)),
            );

            if values[k - 1] <= values[k] {
                break;
            }

            values.swap(k - 1, k);
            recorder.count_swap();
            recorder.push(
                "shift",
                format!(
                    "{} > {}: shift {} right, key moves to index {}",
                    values[k],
                    values[k - 1],
                    values[k],
                    k - 1
                ),
                prefix_state(&values, i, k - 1),
                vec![k - 1, k],
                None,
            );
            k -= 1;
        }
    }

    finish_sort(recorder, "Insertion sort", &values)
}
