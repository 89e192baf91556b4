use print_impose::*;

fn context() -> LayoutContext {
    let mut catalog = Catalog::new();
    catalog.insert_sheet(StockSheet::new("a4", "Offset <90g>", 210.0, 297.0));
    let request = LayoutRequest::from_query_pairs([
        (FIELD_PIECE_WIDTH, "100"),
        (FIELD_PIECE_HEIGHT, "40"),
        (FIELD_BLEED, "0"),
        (FIELD_SHEET, "a4"),
    ]);
    match handle_layout_request(&request, &catalog) {
        LayoutView::Result(context) => context,
        LayoutView::Placeholder => panic!("Expected a result view"),
    }
}

#[test]
fn test_svg_viewport_is_sheet() {
    let svg = render_layout_svg(&context());
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"viewBox="0 0 210 297""#));
    assert!(svg.contains(r#"data-total="14""#));
    assert!(svg.contains(r#"data-orientation="original""#));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn test_svg_draws_one_rect_per_copy() {
    let svg = render_layout_svg(&context());
    let copies = svg
        .split("<g class=\"copies\">")
        .nth(1)
        .and_then(|rest| rest.split("</g>").next())
        .unwrap();

    assert_eq!(copies.matches("<rect").count(), 14);
    assert!(copies.contains(r#"x="5" y="8.5" width="100" height="40""#));
}

#[test]
fn test_svg_draws_technical_margin() {
    let svg = render_layout_svg(&context());
    assert!(svg.contains(r#"class="technical-margin" x="5" y="5" width="200" height="287""#));
}

#[test]
fn test_svg_escapes_sheet_name() {
    let svg = render_layout_svg(&context());
    assert!(svg.contains("Offset &lt;90g&gt;"));
    assert!(!svg.contains("<90g>"));
}

#[test]
fn test_summary() {
    let summary = summarize(&context());
    assert_eq!(summary.total, 14);
    assert_eq!(summary.orientation, "original");
    assert_eq!(summary.sheet, "210 x 297 mm");
    assert_eq!(summary.cut, "100 x 40 mm");
    assert_eq!(summary.technical_margin, "5 mm");
}

#[test]
fn test_placeholder_view() {
    let svg = render_view(&LayoutView::Placeholder);
    assert!(svg.contains("layout-placeholder"));
    assert!(!svg.contains("data-total"));
    assert_eq!(units_per_sheet(&LayoutView::Placeholder), None);
}

#[test]
fn test_svg_footer_summarizes_layout() {
    let svg = render_layout_svg(&context());
    assert!(svg.contains(
        "14 per sheet; original; sheet 210 x 297 mm; cut 100 x 40 mm; margin 5 mm</text>"
    ));
}
