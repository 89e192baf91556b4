//! Proof page rendering
//!
//! A proof is a single PDF page the size of the stock sheet showing where
//! each copy lands. PDF space has its origin at the bottom-left, so every
//! layout rectangle is flipped vertically on the way in.

use crate::constants::{LABEL_FONT_SIZE, LABEL_OFFSET, mm_to_pt};
use crate::handler::LayoutContext;
use crate::layout::Rect;
use crate::marks::{ContentBounds, MarksConfig, generate_marks};
use crate::types::{ProofMarks, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Build a one-page proof document for a computed layout.
pub fn render_proof_sheet(context: &LayoutContext, marks: &ProofMarks) -> Result<Document> {
    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();

    let page_id = render_proof_page(&mut output, context, marks, pages_tree_id)?;

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    pages_dict.set("Count", Object::Integer(1));
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_tree_id));
    let catalog_id = output.add_object(catalog);
    output.trailer.set("Root", Object::Reference(catalog_id));

    log::debug!(
        "Rendered proof for {} ({} copies)",
        context.sheet.id,
        context.layout.total
    );

    Ok(output)
}

/// Render the proof page into `output` and return its object id.
pub fn render_proof_page(
    output: &mut Document,
    context: &LayoutContext,
    marks: &ProofMarks,
    parent_pages_id: ObjectId,
) -> Result<ObjectId> {
    let sheet_width_pt = mm_to_pt(context.sheet.width_mm);
    let sheet_height_pt = mm_to_pt(context.sheet.height_mm);
    let layout = &context.layout;

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(sheet_width_pt as f32),
            Object::Real(sheet_height_pt as f32),
        ]),
    );

    let copies: Vec<ContentBounds> = layout
        .copy_rects()
        .map(|rect| to_pdf_bounds(&rect, context.sheet.height_mm))
        .collect();

    let mut content_ops = Vec::new();

    // Copy fills
    if !copies.is_empty() {
        let mut fill = String::from("q\n0.867 0.839 0.996 rg\n");
        for copy in &copies {
            fill.push_str(&format!(
                "{} {} {} {} re f\n",
                copy.x, copy.y, copy.width, copy.height
            ));
        }
        fill.push_str("Q\n");
        content_ops.push(fill);
    }

    if marks.any_enabled() {
        let usable = Rect::new(0.0, 0.0, context.sheet.width_mm, context.sheet.height_mm)
            .inset(context.technical_margin);
        let marks_config = MarksConfig {
            cols: layout.columns,
            rows: layout.rows,
            copy_width: mm_to_pt(layout.copy_width),
            copy_height: mm_to_pt(layout.copy_height),
            bleed: mm_to_pt(context.piece.bleed_mm),
            grid: to_pdf_bounds(&layout.grid_bounds(), context.sheet.height_mm),
            usable: to_pdf_bounds(&usable, context.sheet.height_mm),
            copies,
        };
        content_ops.push(generate_marks(marks, &marks_config));
    }

    let mut font_dict = Dictionary::new();
    font_dict.set("Type", Object::Name(b"Font".to_vec()));
    font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    font_dict.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    let font_id = output.add_object(font_dict);
    content_ops.push(format!(
        "BT /F1 {} Tf {} {} Td ({}) Tj ET\n",
        LABEL_FONT_SIZE,
        LABEL_OFFSET,
        LABEL_OFFSET,
        escape_pdf_text(&proof_label(context))
    ));

    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}

/// Text printed in the bottom margin band
pub fn proof_label(context: &LayoutContext) -> String {
    format!(
        "{}: {} per sheet, {}, cut {} x {} mm",
        context.sheet.name,
        context.layout.total,
        context.layout.orientation.label(),
        context.cut_width,
        context.cut_height
    )
}

/// Convert a top-left based rectangle in mm to PDF bounds in points.
fn to_pdf_bounds(rect: &Rect, sheet_height_mm: f64) -> ContentBounds {
    ContentBounds {
        x: mm_to_pt(rect.x),
        y: mm_to_pt(sheet_height_mm - rect.y - rect.height),
        width: mm_to_pt(rect.width),
        height: mm_to_pt(rect.height),
    }
}

fn escape_pdf_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_ascii() => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pdf_bounds_flips_y() {
        let bounds = to_pdf_bounds(&Rect::new(0.0, 0.0, 25.4, 25.4), 254.0);
        assert!((bounds.y - 648.0).abs() < 1e-9);
        assert!((bounds.width - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_escape_pdf_text() {
        assert_eq!(escape_pdf_text("a (b) \\"), "a \\(b\\) \\\\");
        assert_eq!(escape_pdf_text("Couché"), "Couch?");
    }
}
