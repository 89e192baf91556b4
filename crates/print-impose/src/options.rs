use crate::constants::DEFAULT_TECHNICAL_MARGIN_MM;
use crate::handler::LayoutContext;
use crate::layout::{Imposition, compute};
use crate::stats::{QuoteSettings, RunCosts};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A complete imposition job: sheet, piece, margin and the runs to quote
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImpositionOptions {
    // Stock sheet
    pub sheet_size: PaperSize,
    pub sheet_orientation: Orientation,
    pub sheet_unit_price: f64,

    // Piece
    pub piece: PieceSpec,

    // Machine
    pub technical_margin_mm: f64,

    // Quote
    pub quantities: Vec<u32>,
    pub extra_costs: RunCosts,
    pub quote_settings: QuoteSettings,

    // Proof sheet
    pub marks: ProofMarks,
}

impl Default for ImpositionOptions {
    fn default() -> Self {
        Self {
            sheet_size: PaperSize::Sra3,
            sheet_orientation: Orientation::Portrait,
            sheet_unit_price: 0.0,
            piece: PieceSpec::default(),
            technical_margin_mm: DEFAULT_TECHNICAL_MARGIN_MM,
            quantities: Vec::new(),
            extra_costs: RunCosts::default(),
            quote_settings: QuoteSettings::default(),
            marks: ProofMarks::default(),
        }
    }
}

impl ImpositionOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ImposeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ImposeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// The stock sheet described by these options
    pub fn sheet(&self) -> StockSheet {
        let mut sheet = StockSheet::from_paper_size(
            paper_size_name(self.sheet_size),
            self.sheet_size,
            self.sheet_orientation,
        );
        sheet.unit_price = self.sheet_unit_price;
        sheet
    }

    /// Run the layout engine for these options
    pub fn compute(&self) -> Imposition {
        let (sheet_width, sheet_height) = self
            .sheet_size
            .dimensions_with_orientation(self.sheet_orientation);
        let (cut_width, cut_height) = self.piece.cut_size();
        compute(
            sheet_width,
            sheet_height,
            cut_width,
            cut_height,
            self.technical_margin_mm,
        )
    }

    /// Layout context for rendering, or `None` when the geometry is infeasible
    pub fn layout_context(&self) -> Option<LayoutContext> {
        let layout = self.compute().into_layout()?;
        let (cut_width, cut_height) = self.piece.cut_size();
        Some(LayoutContext {
            sheet: self.sheet(),
            piece: self.piece,
            cut_width,
            cut_height,
            technical_margin: self.technical_margin_mm,
            layout,
        })
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let (sheet_width, sheet_height) = self.sheet_size.dimensions_mm();
        if !(sheet_width > 0.0) || !(sheet_height > 0.0) {
            return Err(ImposeError::Config(
                "Sheet dimensions must be positive".to_string(),
            ));
        }

        if !(self.piece.finished_width_mm > 0.0) || !(self.piece.finished_height_mm > 0.0) {
            return Err(ImposeError::Config(
                "Piece dimensions must be positive".to_string(),
            ));
        }

        if !(self.piece.bleed_mm >= 0.0) {
            return Err(ImposeError::Config("Bleed must not be negative".to_string()));
        }

        if !(self.technical_margin_mm >= 0.0) {
            return Err(ImposeError::Config(
                "Technical margin must not be negative".to_string(),
            ));
        }

        if self.quantities.contains(&0) {
            return Err(ImposeError::Config(
                "Quantities must be greater than zero".to_string(),
            ));
        }

        self.quote_settings.validate()?;

        Ok(())
    }
}

/// Identifier used for sheets built from a standard format
pub fn paper_size_name(size: PaperSize) -> String {
    match size {
        PaperSize::A4 => "A4".to_string(),
        PaperSize::A3 => "A3".to_string(),
        PaperSize::Sra3 => "SRA3".to_string(),
        PaperSize::Letter => "Letter".to_string(),
        PaperSize::Tabloid => "Tabloid".to_string(),
        PaperSize::Bb => "BB".to_string(),
        PaperSize::Custom {
            width_mm,
            height_mm,
        } => format!("{}x{}", width_mm, height_mm),
    }
}
