//! Step generators
//!
//! Each generator simulates one algorithm over an input array and returns the
//! full, ordered list of [`Step`] snapshots. Generators are pure: the same
//! input always produces the same sequence.
//!
//! An empty sequence means the parameters cannot be visualized (empty input,
//! missing target, window size out of range). Callers must treat it as
//! "nothing to show", not as an algorithm that finished instantly.

mod sliding_window;
mod sorting;
mod two_pointer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::step::{ArrayState, Metrics, Step};

pub use sliding_window::sliding_window;
pub use sorting::{bubble_sort, insertion_sort, selection_sort};
pub use two_pointer::two_pointer;

/// Algorithms that have a step generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    BubbleSort,
    SelectionSort,
    InsertionSort,
    TwoPointer,
    SlidingWindow,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::BubbleSort,
        Algorithm::SelectionSort,
        Algorithm::InsertionSort,
        Algorithm::TwoPointer,
        Algorithm::SlidingWindow,
    ];

    /// Short identifier used on the command line
    pub fn slug(self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "bubble",
            Algorithm::SelectionSort => "selection",
            Algorithm::InsertionSort => "insertion",
            Algorithm::TwoPointer => "two-pointer",
            Algorithm::SlidingWindow => "sliding-window",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "Bubble Sort",
            Algorithm::SelectionSort => "Selection Sort",
            Algorithm::InsertionSort => "Insertion Sort",
            Algorithm::TwoPointer => "Two Pointers (target sum)",
            Algorithm::SlidingWindow => "Sliding Window (max sum)",
        }
    }

    /// Parameters the algorithm needs besides the values
    pub fn requirements(self) -> &'static str {
        match self {
            Algorithm::BubbleSort | Algorithm::SelectionSort | Algorithm::InsertionSort => {
                "values"
            }
            Algorithm::TwoPointer => "sorted values, target",
            Algorithm::SlidingWindow => "values, window size (1..=len)",
        }
    }

    pub fn is_sort(self) -> bool {
        matches!(
            self,
            Algorithm::BubbleSort | Algorithm::SelectionSort | Algorithm::InsertionSort
        )
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Algorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "bubble" | "bubble-sort" => Ok(Algorithm::BubbleSort),
            "selection" | "selection-sort" => Ok(Algorithm::SelectionSort),
            "insertion" | "insertion-sort" => Ok(Algorithm::InsertionSort),
            "two-pointer" | "two-pointers" => Ok(Algorithm::TwoPointer),
            "sliding-window" | "window" => Ok(Algorithm::SlidingWindow),
            _ => Err(crate::Error::InvalidInput(format!(
                "unknown algorithm '{}'",
                s.trim()
            ))),
        }
    }
}

/// Raw input for a generator call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorInput {
    pub values: Vec<i64>,
    /// Target sum (two-pointer)
    #[serde(default)]
    pub target: Option<i64>,
    /// Window size (sliding window)
    #[serde(default)]
    pub window: Option<usize>,
}

impl GeneratorInput {
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values,
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: i64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }
}

/// Run the generator for `algorithm`
///
/// Returns an empty sequence when the input cannot be visualized.
pub fn generate(algorithm: Algorithm, input: &GeneratorInput) -> Vec<Step> {
    let steps = match algorithm {
        Algorithm::BubbleSort => bubble_sort(&input.values),
        Algorithm::SelectionSort => selection_sort(&input.values),
        Algorithm::InsertionSort => insertion_sort(&input.values),
        Algorithm::TwoPointer => match input.target {
            Some(target) => two_pointer(&input.values, target),
            None => {
                tracing::warn!("two-pointer requested without a target");
                Vec::new()
            }
        },
        Algorithm::SlidingWindow => match input.window {
            Some(k) => sliding_window(&input.values, k),
            None => {
                tracing::warn!("sliding window requested without a window size");
                Vec::new()
            }
        },
    };

    tracing::debug!(algorithm = %algorithm, steps = steps.len(), "Generated step sequence");
    steps
}

/// Like [`generate`], but reports an unusable configuration as an error
pub fn generate_checked(algorithm: Algorithm, input: &GeneratorInput) -> crate::Result<Vec<Step>> {
    let steps = generate(algorithm, input);
    if steps.is_empty() {
        return Err(crate::Error::InvalidConfiguration(format!(
            "{} needs {} (got {} values{}{})",
            algorithm.display_name(),
            algorithm.requirements(),
            input.values.len(),
            input
                .target
                .map(|t| format!(", target {}", t))
                .unwrap_or_default(),
            input
                .window
                .map(|k| format!(", window {}", k))
                .unwrap_or_default(),
        )));
    }
    Ok(steps)
}

/// Accumulates steps and the running metrics for one generator run
pub(crate) struct StepRecorder {
    steps: Vec<Step>,
    metrics: Metrics,
}

impl StepRecorder {
    pub(crate) fn new() -> Self {
        Self {
            steps: Vec::new(),
            metrics: Metrics::default(),
        }
    }

    pub(crate) fn count_comparison(&mut self) {
        self.metrics.comparisons += 1;
    }

    pub(crate) fn count_swap(&mut self) {
        self.metrics.swaps += 1;
    }

    /// Append a step stamped with the metrics observed so far
    pub(crate) fn push(
        &mut self,
        operation: &str,
        description: impl Into<String>,
        state: ArrayState,
        highlights: Vec<usize>,
        comparisons: Option<(usize, usize)>,
    ) {
        let id = format!("{}-{}", self.steps.len(), operation);
        self.steps.push(Step {
            id,
            description: description.into(),
            state: state.into(),
            highlights,
            comparisons,
            metrics: self.metrics,
        });
    }

    pub(crate) fn finish(self) -> Vec<Step> {
        self.steps
    }
}
