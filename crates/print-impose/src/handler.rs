//! Layout request handling
//!
//! Turns the raw fields of an inbound quote form into a layout view. Every
//! failure (bad numbers, unknown sheets, infeasible geometry) ends up as
//! the placeholder view; the reason is logged for operators but never shown
//! to the user.

use crate::catalog::StockCatalog;
use crate::constants::DEFAULT_TECHNICAL_MARGIN_MM;
use crate::layout::{Imposition, InfeasibleReason, LayoutResult, compute};
use crate::types::*;

/// Form field carrying the finished piece width
pub const FIELD_PIECE_WIDTH: &str = "item-largura_final_mm";
/// Form field carrying the finished piece height
pub const FIELD_PIECE_HEIGHT: &str = "item-altura_final_mm";
/// Form field carrying the bleed
pub const FIELD_BLEED: &str = "item-sangria_mm";
/// Form field carrying the stock sheet identifier
pub const FIELD_SHEET: &str = "parte-papel";

/// Raw, unvalidated inputs of a layout request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutRequest {
    pub piece_width: Option<String>,
    pub piece_height: Option<String>,
    pub bleed: Option<String>,
    pub sheet_id: Option<String>,
}

impl LayoutRequest {
    /// Collect the request fields from query-string style pairs.
    /// Unknown keys are ignored; later duplicates win.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut request = Self::default();
        for (key, value) in pairs {
            let slot = match key {
                FIELD_PIECE_WIDTH => &mut request.piece_width,
                FIELD_PIECE_HEIGHT => &mut request.piece_height,
                FIELD_BLEED => &mut request.bleed,
                FIELD_SHEET => &mut request.sheet_id,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        request
    }
}

/// Everything the result view needs to draw a layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutContext {
    pub sheet: StockSheet,
    pub piece: PieceSpec,
    pub cut_width: f64,
    pub cut_height: f64,
    pub technical_margin: f64,
    pub layout: LayoutResult,
}

/// What happened to a request before any presentation choice is made
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOutcome {
    /// Inputs incomplete; nothing was computed
    Skipped,
    /// The engine rejected the geometry
    Infeasible(InfeasibleReason),
    /// A layout was computed (possibly with zero copies)
    Computed(LayoutContext),
}

/// The view chosen for a request
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutView {
    /// "No layout" placeholder
    Placeholder,
    Result(LayoutContext),
}

impl LayoutView {
    pub fn context(&self) -> Option<&LayoutContext> {
        match self {
            LayoutView::Result(context) => Some(context),
            LayoutView::Placeholder => None,
        }
    }
}

/// Handle a layout request, falling back to the placeholder on any failure.
///
/// Zero-copy layouts are shown as a result ("0 per sheet"); only skipped
/// requests, infeasible geometry and errors use the placeholder.
pub fn handle_layout_request(request: &LayoutRequest, catalog: &impl StockCatalog) -> LayoutView {
    match try_layout_request(request, catalog) {
        Ok(LayoutOutcome::Computed(context)) => LayoutView::Result(context),
        Ok(LayoutOutcome::Infeasible(InfeasibleReason::TooManyCopies)) => {
            log::warn!("Refusing layout: piece too small for a bounded grid");
            LayoutView::Placeholder
        }
        Ok(LayoutOutcome::Infeasible(reason)) => {
            log::debug!("No layout for request: {:?}", reason);
            LayoutView::Placeholder
        }
        Ok(LayoutOutcome::Skipped) => LayoutView::Placeholder,
        Err(e) => {
            log::warn!("Layout calculation failed: {}", e);
            LayoutView::Placeholder
        }
    }
}

/// Validate a request, look up its sheet and run the engine.
pub fn try_layout_request(
    request: &LayoutRequest,
    catalog: &impl StockCatalog,
) -> Result<LayoutOutcome> {
    let finished_width = parse_dimension(FIELD_PIECE_WIDTH, request.piece_width.as_deref())?;
    let finished_height = parse_dimension(FIELD_PIECE_HEIGHT, request.piece_height.as_deref())?;
    let bleed = parse_dimension(FIELD_BLEED, request.bleed.as_deref())?;
    let sheet_id = request
        .sheet_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let Some(sheet_id) = sheet_id else {
        log::debug!("Skipping layout: no sheet selected");
        return Ok(LayoutOutcome::Skipped);
    };
    if finished_width == 0.0 || finished_height == 0.0 {
        log::debug!("Skipping layout: piece size incomplete");
        return Ok(LayoutOutcome::Skipped);
    }

    let sheet = catalog
        .sheet(sheet_id)
        .ok_or_else(|| ImposeError::SheetNotFound(sheet_id.to_string()))?
        .clone();

    let piece = PieceSpec::new(finished_width, finished_height, bleed);
    let (cut_width, cut_height) = piece.cut_size();
    let technical_margin = DEFAULT_TECHNICAL_MARGIN_MM;

    match compute(
        sheet.width_mm,
        sheet.height_mm,
        cut_width,
        cut_height,
        technical_margin,
    ) {
        Imposition::Infeasible(reason) => Ok(LayoutOutcome::Infeasible(reason)),
        Imposition::Feasible(layout) => Ok(LayoutOutcome::Computed(LayoutContext {
            sheet,
            piece,
            cut_width,
            cut_height,
            technical_margin,
            layout,
        })),
    }
}

/// Parse a numeric form field. Missing or blank fields read as zero; both
/// `.` and `,` are accepted as the decimal separator.
pub fn parse_dimension(field: &'static str, value: Option<&str>) -> Result<f64> {
    let raw = value.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Ok(0.0);
    }

    let parsed: f64 = raw
        .replace(',', ".")
        .parse()
        .map_err(|_| ImposeError::InvalidNumber {
            field,
            value: raw.to_string(),
        })?;

    if !parsed.is_finite() {
        return Err(ImposeError::InvalidNumber {
            field,
            value: raw.to_string(),
        });
    }
    Ok(parsed)
}
