//! Proof marks rendering for imposed sheets
//!
//! This module provides functions to generate PDF content stream operations
//! for the marks drawn on a proof sheet: the technical margin outline, the
//! outline of every copy, and trim marks outside the grid.

use crate::constants::{
    CROP_MARK_GAP, CROP_MARK_LENGTH, CROP_MARK_WIDTH, CUT_LINE_WIDTH, MARGIN_LINE_WIDTH,
};
use crate::types::ProofMarks;

/// Bounds of a drawn area in PDF points (origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ContentBounds {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }
}

/// Configuration for rendering marks
pub struct MarksConfig {
    /// Number of columns in the grid
    pub cols: usize,
    /// Number of rows in the grid
    pub rows: usize,
    /// Copy width in points
    pub copy_width: f64,
    /// Copy height in points
    pub copy_height: f64,
    /// Bleed in points
    pub bleed: f64,
    /// Whole grid
    pub grid: ContentBounds,
    /// Usable area inside the technical margin
    pub usable: ContentBounds,
    /// Each placed copy
    pub copies: Vec<ContentBounds>,
}

/// Generate all proof marks as PDF content stream operations
pub fn generate_marks(marks: &ProofMarks, config: &MarksConfig) -> String {
    let mut ops = String::new();

    // Save graphics state
    ops.push_str("q\n");

    if marks.margin_outline {
        ops.push_str(&generate_margin_outline(config));
    }

    if marks.cut_outlines {
        ops.push_str(&generate_cut_outlines(config));
    }

    if marks.crop_marks {
        ops.push_str(&generate_crop_marks(config));
    }

    // Restore graphics state
    ops.push_str("Q\n");

    ops
}

/// Dashed red outline of the usable area
fn generate_margin_outline(config: &MarksConfig) -> String {
    let mut ops = String::new();
    let area = &config.usable;

    ops.push_str("0.937 0.267 0.267 RG\n");
    ops.push_str(&format!("{} w\n", MARGIN_LINE_WIDTH));
    ops.push_str("[8 4] 0 d\n");
    ops.push_str(&format!(
        "{} {} {} {} re S\n",
        area.x, area.y, area.width, area.height
    ));
    ops.push_str("[] 0 d\n");

    ops
}

/// Solid outline around each copy, plus a dashed trim box when there is bleed
fn generate_cut_outlines(config: &MarksConfig) -> String {
    let mut ops = String::new();

    ops.push_str("0.486 0.227 0.929 RG\n");
    ops.push_str(&format!("{} w\n", CUT_LINE_WIDTH));
    for copy in &config.copies {
        ops.push_str(&format!(
            "{} {} {} {} re S\n",
            copy.x, copy.y, copy.width, copy.height
        ));
    }

    if config.bleed > 0.0 {
        ops.push_str("[2 2] 0 d\n");
        for copy in &config.copies {
            ops.push_str(&format!(
                "{} {} {} {} re S\n",
                copy.x + config.bleed,
                copy.y + config.bleed,
                copy.width - 2.0 * config.bleed,
                copy.height - 2.0 * config.bleed
            ));
        }
        ops.push_str("[] 0 d\n");
    }

    ops
}

/// Trim marks above/below the grid for every vertical trim line and
/// left/right of the grid for every horizontal one
fn generate_crop_marks(config: &MarksConfig) -> String {
    let mut ops = String::new();

    ops.push_str("0 0 0 RG\n");
    ops.push_str(&format!("{} w\n", CROP_MARK_WIDTH));
    ops.push_str("[] 0 d\n");

    let grid = &config.grid;

    for x in trim_lines(grid.x, config.cols, config.copy_width, config.bleed) {
        ops.push_str(&line(
            x,
            grid.top() + CROP_MARK_GAP,
            x,
            grid.top() + CROP_MARK_GAP + CROP_MARK_LENGTH,
        ));
        ops.push_str(&line(
            x,
            grid.y - CROP_MARK_GAP,
            x,
            grid.y - CROP_MARK_GAP - CROP_MARK_LENGTH,
        ));
    }

    for y in trim_lines(grid.y, config.rows, config.copy_height, config.bleed) {
        ops.push_str(&line(
            grid.x - CROP_MARK_GAP,
            y,
            grid.x - CROP_MARK_GAP - CROP_MARK_LENGTH,
            y,
        ));
        ops.push_str(&line(
            grid.right() + CROP_MARK_GAP,
            y,
            grid.right() + CROP_MARK_GAP + CROP_MARK_LENGTH,
            y,
        ));
    }

    ops
}

/// Trim positions along one axis. Adjacent trims that coincide (no bleed)
/// are emitted once.
fn trim_lines(start: f64, count: usize, size: f64, bleed: f64) -> Vec<f64> {
    let mut lines = Vec::with_capacity(count * 2);
    for i in 0..count {
        let origin = start + i as f64 * size;
        lines.push(origin + bleed);
        lines.push(origin + size - bleed);
    }
    lines.dedup_by(|a, b| (*a - *b).abs() < 0.01);
    lines
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    format!("{} {} m {} {} l S\n", x1, y1, x2, y2)
}
