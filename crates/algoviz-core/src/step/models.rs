use serde::{Deserialize, Serialize};

/// Snapshot of the data structure an algorithm is working on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DataState {
    Array(ArrayState),
    Tree(TreeState),
    Graph(GraphState),
    LinkedList(LinkedListState),
}

impl DataState {
    /// Array payload, if this snapshot is an array
    pub fn as_array(&self) -> Option<&ArrayState> {
        match self {
            DataState::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl Default for DataState {
    fn default() -> Self {
        DataState::Array(ArrayState::default())
    }
}

impl From<ArrayState> for DataState {
    fn from(array: ArrayState) -> Self {
        DataState::Array(array)
    }
}

/// Array contents plus the markers drawn on top of them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayState {
    pub values: Vec<i64>,
    #[serde(default)]
    pub pointers: Vec<Pointer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitions: Option<Vec<Partition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorted: Option<Vec<bool>>,
}

impl ArrayState {
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values,
            ..Default::default()
        }
    }

    pub fn with_pointers(mut self, pointers: Vec<Pointer>) -> Self {
        self.pointers = pointers;
        self
    }

    pub fn with_window(mut self, start: usize, end: usize) -> Self {
        self.window = Some(WindowRange { start, end });
        self
    }

    pub fn with_partitions(mut self, partitions: Vec<Partition>) -> Self {
        self.partitions = Some(partitions);
        self
    }

    pub fn with_sorted(mut self, sorted: Vec<bool>) -> Self {
        self.sorted = Some(sorted);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every index is flagged as in its final position
    pub fn is_fully_sorted(&self) -> bool {
        match &self.sorted {
            Some(flags) => flags.len() == self.values.len() && flags.iter().all(|&f| f),
            None => self.values.is_empty(),
        }
    }

    /// Sum of the values covered by `window`
    ///
    /// `None` without a window, when the window runs past the values, or
    /// when the sum does not fit in an i64.
    pub fn window_sum(&self) -> Option<i64> {
        let window = self.window?;
        let slice = self.values.get(window.start..=window.end)?;
        let sum: i128 = slice.iter().map(|&v| i128::from(v)).sum();
        i64::try_from(sum).ok()
    }

    pub fn pointer(&self, label: &str) -> Option<&Pointer> {
        self.pointers.iter().find(|p| p.label == label)
    }
}

/// Named index marker ("left", "right", "min", ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pointer {
    pub index: usize,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Pointer {
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Inclusive index range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRange {
    pub start: usize,
    pub end: usize,
}

impl WindowRange {
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    pub fn indices(&self) -> Vec<usize> {
        (self.start..=self.end).collect()
    }
}

/// Logical region of the array, e.g. the sorted suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Partition {
    pub fn labeled(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: Some(label.into()),
            color: None,
        }
    }
}

// Tree, graph and linked-list payloads are placeholders: no generator emits
// them yet, but renderers match on them.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeState {
    pub nodes: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub value: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphState {
    pub nodes: Vec<i64>,
    pub edges: Vec<(usize, usize)>,
    #[serde(default)]
    pub directed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedListState {
    pub values: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<usize>,
}

/// Cumulative operation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub comparisons: u64,
    pub swaps: u64,
}

/// One frame of an algorithm replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub description: String,
    pub state: DataState,
    #[serde(default)]
    pub highlights: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparisons: Option<(usize, usize)>,
    pub metrics: Metrics,
}

impl Step {
    /// Whether this step shows a pair of elements being compared
    pub fn is_comparison(&self) -> bool {
        self.comparisons.is_some()
    }

    pub fn array(&self) -> Option<&ArrayState> {
        self.state.as_array()
    }
}
