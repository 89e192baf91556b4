use thiserror::Error;

use crate::constants::DEFAULT_BLEED_MM;

#[derive(Error, Debug)]
pub enum ImposeError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Stock sheet not found: {0}")]
    SheetNotFound(String),
    #[error("Insufficient stock for {sheet_id}: {requested} requested, {available} on hand")]
    InsufficientStock {
        sheet_id: String,
        requested: u64,
        available: u64,
    },
    #[error("Supply not found: {0}")]
    SupplyNotFound(String),
    #[error("Insufficient {supply_id}: {requested} requested, {available} on hand")]
    InsufficientSupply {
        supply_id: String,
        requested: f64,
        available: f64,
    },
    #[error("Piece does not fit on the sheet")]
    ZeroYield,
}

pub type Result<T> = std::result::Result<T, ImposeError>;

/// Sheet orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Common stock sheet formats.
///
/// Standard formats serialize as their name ("SRA3"), custom sizes as
/// `{"width_mm": .., "height_mm": ..}`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "PaperSizeRepr", into = "PaperSizeRepr")
)]
pub enum PaperSize {
    A4,
    A3,
    /// Oversized A3 used on digital presses
    Sra3,
    Letter,
    Tabloid,
    /// Brazilian "BB" press sheet (66 × 96 cm)
    Bb,
    Custom { width_mm: f64, height_mm: f64 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::Sra3 => (320.0, 450.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Bb => (660.0, 960.0),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum PaperSizeRepr {
    Standard(StandardSize),
    Custom { width_mm: f64, height_mm: f64 },
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
enum StandardSize {
    A4,
    A3,
    #[serde(rename = "SRA3")]
    Sra3,
    Letter,
    Tabloid,
    #[serde(rename = "BB")]
    Bb,
}

#[cfg(feature = "serde")]
impl From<PaperSizeRepr> for PaperSize {
    fn from(repr: PaperSizeRepr) -> Self {
        match repr {
            PaperSizeRepr::Standard(StandardSize::A4) => PaperSize::A4,
            PaperSizeRepr::Standard(StandardSize::A3) => PaperSize::A3,
            PaperSizeRepr::Standard(StandardSize::Sra3) => PaperSize::Sra3,
            PaperSizeRepr::Standard(StandardSize::Letter) => PaperSize::Letter,
            PaperSizeRepr::Standard(StandardSize::Tabloid) => PaperSize::Tabloid,
            PaperSizeRepr::Standard(StandardSize::Bb) => PaperSize::Bb,
            PaperSizeRepr::Custom {
                width_mm,
                height_mm,
            } => PaperSize::Custom {
                width_mm,
                height_mm,
            },
        }
    }
}

#[cfg(feature = "serde")]
impl From<PaperSize> for PaperSizeRepr {
    fn from(size: PaperSize) -> Self {
        let standard = match size {
            PaperSize::A4 => StandardSize::A4,
            PaperSize::A3 => StandardSize::A3,
            PaperSize::Sra3 => StandardSize::Sra3,
            PaperSize::Letter => StandardSize::Letter,
            PaperSize::Tabloid => StandardSize::Tabloid,
            PaperSize::Bb => StandardSize::Bb,
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => {
                return PaperSizeRepr::Custom {
                    width_mm,
                    height_mm,
                };
            }
        };
        PaperSizeRepr::Standard(standard)
    }
}

/// A stock sheet from the paper catalog.
///
/// Only `width_mm` and `height_mm` matter to the layout engine; the rest is
/// bookkeeping used for pricing and inventory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StockSheet {
    pub id: String,
    pub name: String,
    /// Paper weight label, e.g. "300g"
    pub grammage: String,
    pub width_mm: f64,
    pub height_mm: f64,
    /// Cost of one sheet, taken from the latest purchase
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit_price: f64,
    /// Sheets currently in stock
    #[cfg_attr(feature = "serde", serde(default))]
    pub stock_on_hand: u64,
}

impl StockSheet {
    pub fn new(id: impl Into<String>, name: impl Into<String>, width_mm: f64, height_mm: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grammage: String::new(),
            width_mm,
            height_mm,
            unit_price: 0.0,
            stock_on_hand: 0,
        }
    }

    /// Build a sheet from one of the standard formats
    pub fn from_paper_size(
        id: impl Into<String>,
        size: PaperSize,
        orientation: Orientation,
    ) -> Self {
        let (width_mm, height_mm) = size.dimensions_with_orientation(orientation);
        let id = id.into();
        Self::new(id.clone(), id, width_mm, height_mm)
    }

    pub fn dimensions_mm(&self) -> (f64, f64) {
        (self.width_mm, self.height_mm)
    }
}

/// The finished piece a customer orders, plus its bleed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceSpec {
    /// Trimmed width
    pub finished_width_mm: f64,
    /// Trimmed height
    pub finished_height_mm: f64,
    /// Extra print area added on every edge before trimming
    pub bleed_mm: f64,
}

impl Default for PieceSpec {
    fn default() -> Self {
        Self {
            finished_width_mm: 90.0,
            finished_height_mm: 50.0,
            bleed_mm: DEFAULT_BLEED_MM,
        }
    }
}

impl PieceSpec {
    pub fn new(finished_width_mm: f64, finished_height_mm: f64, bleed_mm: f64) -> Self {
        Self {
            finished_width_mm,
            finished_height_mm,
            bleed_mm,
        }
    }

    /// Cut size: the finished size inflated by bleed on both sides.
    pub fn cut_size(&self) -> (f64, f64) {
        (
            self.finished_width_mm + 2.0 * self.bleed_mm,
            self.finished_height_mm + 2.0 * self.bleed_mm,
        )
    }
}

/// Optional marks drawn on the PDF proof sheet
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofMarks {
    /// Dashed outline of the technical margin band
    pub margin_outline: bool,
    /// Solid outline around each copy's cut size
    pub cut_outlines: bool,
    /// Short marks outside the grid on every trim line
    pub crop_marks: bool,
}

impl Default for ProofMarks {
    fn default() -> Self {
        Self {
            margin_outline: true,
            cut_outlines: true,
            crop_marks: false,
        }
    }
}

impl ProofMarks {
    pub fn any_enabled(&self) -> bool {
        self.margin_outline || self.cut_outlines || self.crop_marks
    }
}
