//! Geometry for renderers: where to draw each element of a step.
//!
//! The engine never calls this; renderers use it to place `values[i]`.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Single horizontal row, vertically centred
    #[default]
    Row,
    /// Near-square grid, filled row by row
    Grid,
    /// Evenly spaced on a circle, first element at the top
    Circle,
}

/// Centre of an element, in the same units as the canvas size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Centres for `count` elements on a `width` x `height` canvas
///
/// Every position lies inside the canvas. Negative sizes count as zero.
pub fn compute_positions(count: usize, width: f64, height: f64, mode: LayoutMode) -> Vec<Position> {
    if count == 0 {
        return Vec::new();
    }
    let width = width.max(0.0);
    let height = height.max(0.0);

    match mode {
        LayoutMode::Row => {
            let cell = width / count as f64;
            (0..count)
                .map(|i| Position {
                    x: cell * (i as f64 + 0.5),
                    y: height / 2.0,
                })
                .collect()
        }
        LayoutMode::Grid => {
            let cols = (count as f64).sqrt().ceil() as usize;
            let rows = count.div_ceil(cols);
            let cell_w = width / cols as f64;
            let cell_h = height / rows as f64;
            (0..count)
                .map(|i| Position {
                    x: cell_w * ((i % cols) as f64 + 0.5),
                    y: cell_h * ((i / cols) as f64 + 0.5),
                })
                .collect()
        }
        LayoutMode::Circle => {
            let cx = width / 2.0;
            let cy = height / 2.0;
            let radius = cx.min(cy) * 0.8;
            (0..count)
                .map(|i| {
                    let angle = TAU * i as f64 / count as f64 - PI / 2.0;
                    Position {
                        x: cx + radius * angle.cos(),
                        y: cy + radius * angle.sin(),
                    }
                })
                .collect()
        }
    }
}
