//! Plain-text rendering of a single step.
//!
//! One frame is a header line, the values, a marker row (`^` compared,
//! `*` highlighted, `-` in window, `.` sorted) and a pointer-label row.

use algoviz_core::layout::{compute_positions, LayoutMode};
use algoviz_core::step::{ArrayState, DataState};
use algoviz_core::{DisplayConfig, Step};

pub fn render_step(step: &Step, index: usize, total: usize, display: &DisplayConfig) -> String {
    let mut out = String::new();

    let counter = format!("[{:>w$}/{}]", index + 1, total, w = total.to_string().len());
    if display.show_description {
        out.push_str(&format!("{} {}\n", counter, step.description));
    } else {
        out.push_str(&format!("{}\n", counter));
    }

    match &step.state {
        DataState::Array(array) => render_array(&mut out, step, array, display.cell_width.max(2)),
        DataState::Tree(tree) => out.push_str(&format!("  (tree with {} nodes)\n", tree.nodes.len())),
        DataState::Graph(graph) => out.push_str(&format!(
            "  (graph with {} nodes, {} edges)\n",
            graph.nodes.len(),
            graph.edges.len()
        )),
        DataState::LinkedList(list) => {
            let values: Vec<String> = list.values.iter().map(|v| v.to_string()).collect();
            out.push_str(&format!("  {}\n", values.join(" -> ")));
        }
    }

    if display.show_metrics {
        out.push_str(&format!(
            "  comparisons: {}  swaps: {}\n",
            step.metrics.comparisons, step.metrics.swaps
        ));
    }

    out
}

fn render_array(out: &mut String, step: &Step, array: &ArrayState, cell_width: u16) {
    let count = array.len();
    if count == 0 {
        out.push_str("  (empty)\n");
        return;
    }

    let cell = cell_width as usize;
    let line_width = count * cell;
    let columns: Vec<usize> = compute_positions(count, line_width as f64, 1.0, LayoutMode::Row)
        .iter()
        .map(|p| (p.x.ceil() as usize).saturating_sub(1).min(line_width - 1))
        .collect();

    let values: String = array
        .values
        .iter()
        .map(|v| format!("{:^w$}", v, w = cell))
        .collect();
    out.push_str(&format!("  {}\n", values.trim_end()));

    let mut markers = vec![' '; line_width];
    for (i, &column) in columns.iter().enumerate() {
        markers[column] = marker_for(step, array, i);
    }
    out.push_str(&format!("  {}\n", markers.iter().collect::<String>().trim_end()));

    if !array.pointers.is_empty() {
        let mut labels = vec![' '; line_width];
        for pointer in &array.pointers {
            let Some(&column) = columns.get(pointer.index) else {
                continue;
            };
            let start = (column + 1).saturating_sub(pointer.label.len().div_ceil(2));
            for (offset, ch) in pointer.label.chars().take(cell).enumerate() {
                if let Some(slot) = labels.get_mut(start + offset) {
                    *slot = ch;
                }
            }
        }
        out.push_str(&format!("  {}\n", labels.iter().collect::<String>().trim_end()));
    }
}

fn marker_for(step: &Step, array: &ArrayState, index: usize) -> char {
    if matches!(step.comparisons, Some((a, b)) if a == index || b == index) {
        '^'
    } else if step.highlights.contains(&index) {
        '*'
    } else if array.window.is_some_and(|w| w.contains(index)) {
        '-'
    } else if array
        .sorted
        .as_ref()
        .and_then(|flags| flags.get(index))
        .copied()
        .unwrap_or(false)
    {
        '.'
    } else {
        ' '
    }
}
