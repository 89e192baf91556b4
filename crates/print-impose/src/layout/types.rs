//! Layout data types for imposition
//!
//! These types carry the result of the imposition calculation from the
//! engine to whatever renders or prices it. All coordinates are in sheet
//! units (mm) with the origin at the sheet's top-left corner and y growing
//! downward, matching the SVG preview.

/// How the piece is turned on the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LayoutOrientation {
    /// Piece placed as given (cut width along the sheet width)
    #[default]
    Original,
    /// Piece turned 90°
    Rotated,
}

impl LayoutOrientation {
    /// Label shown next to the preview
    pub fn label(self) -> &'static str {
        match self {
            LayoutOrientation::Original => "original",
            LayoutOrientation::Rotated => "rotated",
        }
    }
}

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Top-left corner of one placed copy
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangular area in sheet units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f64,
    /// Y position (top edge)
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Shrink the rectangle by `amount` on every side
    pub fn inset(&self, amount: f64) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }

    /// Whether a point lies inside or on the boundary
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// One of the two orientations the engine evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCandidate {
    pub orientation: LayoutOrientation,
    pub columns: usize,
    pub rows: usize,
}

impl GridCandidate {
    pub fn total(&self) -> usize {
        self.columns.saturating_mul(self.rows)
    }
}

/// Best-fit grid of copies on one stock sheet.
///
/// Only the engine builds this; everything downstream reads it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutResult {
    pub orientation: LayoutOrientation,
    pub columns: usize,
    pub rows: usize,
    /// `columns * rows`
    pub total: usize,
    /// Cut width as drawn (swapped when rotated)
    pub copy_width: f64,
    /// Cut height as drawn (swapped when rotated)
    pub copy_height: f64,
    pub grid_width: f64,
    pub grid_height: f64,
    /// Horizontal centering offset within the full sheet
    pub offset_x: f64,
    /// Vertical centering offset within the full sheet
    pub offset_y: f64,
    /// Top-left corner of each copy, row-major
    pub positions: Vec<Position>,
}

impl LayoutResult {
    /// True when not a single copy fits
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Bounding box of the whole grid
    pub fn grid_bounds(&self) -> Rect {
        Rect::new(self.offset_x, self.offset_y, self.grid_width, self.grid_height)
    }

    /// Rectangle occupied by each copy, in the same order as `positions`
    pub fn copy_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.positions
            .iter()
            .map(|p| Rect::new(p.x, p.y, self.copy_width, self.copy_height))
    }

    /// Grid position of the copy at `index` in `positions`
    pub fn grid_position(&self, index: usize) -> Option<GridPosition> {
        if index >= self.total {
            return None;
        }
        Some(GridPosition::new(index / self.columns, index % self.columns))
    }

    /// Fraction of the sheet covered by copies (0.0 - 1.0)
    pub fn utilization(&self, sheet_width: f64, sheet_height: f64) -> f64 {
        let sheet_area = sheet_width * sheet_height;
        if sheet_area <= 0.0 {
            return 0.0;
        }
        (self.total as f64 * self.copy_width * self.copy_height) / sheet_area
    }
}

/// Why no layout could be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfeasibleReason {
    /// Cut width or height is zero, negative or not a number
    NonPositiveCut,
    /// The technical margin leaves no usable area on the sheet
    NoUsableArea,
    /// The piece is so small that the grid would exceed
    /// [`MAX_COPIES_PER_SHEET`](crate::constants::MAX_COPIES_PER_SHEET)
    TooManyCopies,
}

/// Outcome of an imposition calculation.
///
/// `Infeasible` is a precondition failure; `Feasible` may still hold a
/// zero-copy layout when the piece is larger than the usable area.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Imposition {
    Infeasible(InfeasibleReason),
    Feasible(LayoutResult),
}

impl Imposition {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Imposition::Feasible(_))
    }

    pub fn layout(&self) -> Option<&LayoutResult> {
        match self {
            Imposition::Feasible(layout) => Some(layout),
            Imposition::Infeasible(_) => None,
        }
    }

    pub fn into_layout(self) -> Option<LayoutResult> {
        match self {
            Imposition::Feasible(layout) => Some(layout),
            Imposition::Infeasible(_) => None,
        }
    }
}
