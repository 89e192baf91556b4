//! SVG preview of a sheet layout
//!
//! The preview's viewport is the stock sheet itself, so copies are drawn at
//! their absolute sheet coordinates without any scaling.

use crate::constants::{COPY_FILL, COPY_STROKE, MARGIN_STROKE, PREVIEW_STROKE_WIDTH};
use crate::handler::{LayoutContext, LayoutView};
use std::fmt::Write;

/// Human-readable facts shown next to the preview
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSummary {
    /// Copies per sheet
    pub total: usize,
    pub orientation: &'static str,
    /// e.g. "320 x 450 mm"
    pub sheet: String,
    /// e.g. "96 x 56 mm"
    pub cut: String,
    /// e.g. "5 mm"
    pub technical_margin: String,
}

pub fn summarize(context: &LayoutContext) -> LayoutSummary {
    LayoutSummary {
        total: context.layout.total,
        orientation: context.layout.orientation.label(),
        sheet: format!("{} x {} mm", context.sheet.width_mm, context.sheet.height_mm),
        cut: format!("{} x {} mm", context.cut_width, context.cut_height),
        technical_margin: format!("{} mm", context.technical_margin),
    }
}

/// Value for the "units per sheet" field; `None` when the placeholder is shown.
pub fn units_per_sheet(view: &LayoutView) -> Option<usize> {
    view.context().map(|context| context.layout.total)
}

/// Render whichever view the handler picked.
pub fn render_view(view: &LayoutView) -> String {
    match view {
        LayoutView::Result(context) => render_layout_svg(context),
        LayoutView::Placeholder => render_placeholder(),
    }
}

/// Render a complete SVG document for a computed layout.
pub fn render_layout_svg(context: &LayoutContext) -> String {
    let sheet_width = context.sheet.width_mm;
    let sheet_height = context.sheet.height_mm;
    let margin = context.technical_margin;
    let layout = &context.layout;
    let summary = summarize(context);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}mm" height="{h}mm" data-total="{total}" data-orientation="{orientation}">"#,
        w = sheet_width,
        h = sheet_height,
        total = summary.total,
        orientation = summary.orientation,
    );
    let _ = writeln!(
        svg,
        "  <title>{} per sheet: {}</title>",
        summary.total,
        escape_xml(&context.sheet.name)
    );
    let _ = writeln!(
        svg,
        "  <desc>Orientation {}; sheet {}; cut {}; technical margin {}</desc>",
        summary.orientation, summary.sheet, summary.cut, summary.technical_margin
    );
    svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

    let _ = writeln!(
        svg,
        r#"  <rect class="technical-margin" x="{m}" y="{m}" width="{w}" height="{h}" fill="none" stroke="{stroke}" stroke-width="{sw}" stroke-dasharray="8" opacity="0.3"/>"#,
        m = margin,
        w = sheet_width - 2.0 * margin,
        h = sheet_height - 2.0 * margin,
        stroke = MARGIN_STROKE,
        sw = PREVIEW_STROKE_WIDTH,
    );

    svg.push_str("  <g class=\"copies\">\n");
    for rect in layout.copy_rects() {
        let _ = writeln!(
            svg,
            r#"    <rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            rect.x, rect.y, rect.width, rect.height, COPY_FILL, COPY_STROKE, PREVIEW_STROKE_WIDTH
        );
    }
    svg.push_str("  </g>\n");

    // Summary sits in the bottom margin band
    let _ = writeln!(
        svg,
        r#"  <text class="layout-summary" x="{x}" y="{y}" font-size="{size}" fill="{fill}">{total} per sheet; {orientation}; sheet {sheet}; cut {cut}; margin {margin}</text>"#,
        x = margin,
        y = sheet_height - margin / 2.0,
        size = (margin * 0.6).max(2.0),
        fill = COPY_STROKE,
        total = summary.total,
        orientation = summary.orientation,
        sheet = summary.sheet,
        cut = summary.cut,
        margin = summary.technical_margin,
    );
    svg.push_str("</svg>\n");

    svg
}

/// Render the "no layout" placeholder.
pub fn render_placeholder() -> String {
    concat!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 200 100\" class=\"layout-placeholder\">\n",
        "  <rect width=\"100%\" height=\"100%\" fill=\"#f3f4f6\"/>\n",
        "  <text x=\"100\" y=\"50\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-size=\"10\" fill=\"#9ca3af\">Enter the piece size and pick a sheet</text>\n",
        "</svg>\n"
    )
    .to_string()
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
