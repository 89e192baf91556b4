//! Shared constants for sheet imposition
//!
//! This module centralizes magic numbers and constants used throughout
//! layout, preview and proof rendering.

// =============================================================================
// Layout Defaults
// =============================================================================

/// Grip/non-printable margin reserved on every sheet edge (mm)
pub const DEFAULT_TECHNICAL_MARGIN_MM: f64 = 5.0;

/// Bleed applied to product presets when none is given (mm)
pub const DEFAULT_BLEED_MM: f64 = 3.0;

/// Upper bound on copies placed on one sheet. Larger grids are refused
/// before any position is allocated.
pub const MAX_COPIES_PER_SHEET: usize = 50_000;

// =============================================================================
// Quote Defaults
// =============================================================================

/// Tax taken from the sale price (%)
pub const DEFAULT_TAX_PCT: f64 = 8.0;

/// Sales commission taken from the sale price (%)
pub const DEFAULT_COMMISSION_PCT: f64 = 10.0;

/// Card processing fee taken from the sale price (%)
pub const DEFAULT_CARD_FEE_PCT: f64 = 4.5;

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f64 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

// =============================================================================
// SVG Preview
// =============================================================================

/// Fill color for placed copies
pub const COPY_FILL: &str = "#ddd6fe";

/// Stroke color for placed copies
pub const COPY_STROKE: &str = "#7c3aed";

/// Stroke color for the technical margin band
pub const MARGIN_STROKE: &str = "#ef4444";

/// Stroke width used for outlines in sheet units (mm)
pub const PREVIEW_STROKE_WIDTH: f64 = 0.5;

// =============================================================================
// PDF Proof Marks
// =============================================================================

/// Line width for copy outlines (points)
pub const CUT_LINE_WIDTH: f64 = 0.5;

/// Line width for the margin outline (points)
pub const MARGIN_LINE_WIDTH: f64 = 0.5;

/// Line width for crop marks (points)
pub const CROP_MARK_WIDTH: f64 = 0.25;

/// Length of crop marks (points)
pub const CROP_MARK_LENGTH: f64 = 12.0;

/// Gap between crop mark and trim corner (points)
pub const CROP_MARK_GAP: f64 = 3.0;

/// Font size of the proof label (points)
pub const LABEL_FONT_SIZE: f64 = 7.0;

/// Distance of the proof label baseline from the bottom sheet edge (points)
pub const LABEL_OFFSET: f64 = 4.0;
