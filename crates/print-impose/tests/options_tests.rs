use print_impose::*;

#[test]
fn test_default_options_are_valid() {
    let options = ImpositionOptions::default();
    assert!(options.validate().is_ok());
    assert_eq!(options.technical_margin_mm, 5.0);
    assert_eq!(options.sheet_size, PaperSize::Sra3);
}

#[test]
fn test_validation_rejects_bad_piece() {
    let mut options = ImpositionOptions::default();
    options.piece.finished_width_mm = 0.0;

    match options.validate() {
        Err(ImposeError::Config(msg)) => assert!(msg.contains("Piece")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_validation_rejects_negative_values() {
    let mut options = ImpositionOptions::default();
    options.piece.bleed_mm = -1.0;
    assert!(options.validate().is_err());

    let mut options = ImpositionOptions::default();
    options.technical_margin_mm = -0.5;
    assert!(options.validate().is_err());

    let mut options = ImpositionOptions::default();
    options.technical_margin_mm = f64::NAN;
    assert!(options.validate().is_err());
}

#[test]
fn test_validation_rejects_zero_quantity() {
    let mut options = ImpositionOptions::default();
    options.quantities = vec![100, 0];
    assert!(options.validate().is_err());
}

#[test]
fn test_validation_rejects_bad_quote_settings() {
    let mut options = ImpositionOptions::default();
    assert_eq!(options.quote_settings, QuoteSettings::default());

    options.quote_settings.card_fee_pct = 90.0;
    assert!(matches!(options.validate(), Err(ImposeError::Config(_))));
}

#[test]
fn test_validation_rejects_custom_sheet_without_area() {
    let mut options = ImpositionOptions::default();
    options.sheet_size = PaperSize::Custom {
        width_mm: 0.0,
        height_mm: 450.0,
    };
    assert!(options.validate().is_err());
}

#[test]
fn test_sheet_follows_orientation() {
    let mut options = ImpositionOptions::default();
    options.sheet_orientation = Orientation::Landscape;
    options.sheet_unit_price = 0.42;

    let sheet = options.sheet();
    assert_eq!(sheet.id, "SRA3");
    assert_eq!(sheet.dimensions_mm(), (450.0, 320.0));
    assert_eq!(sheet.unit_price, 0.42);
}

#[test]
fn test_compute_uses_configured_margin() {
    let mut options = ImpositionOptions::default();
    options.sheet_size = PaperSize::Custom {
        width_mm: 100.0,
        height_mm: 100.0,
    };
    options.piece = PieceSpec::new(50.0, 50.0, 0.0);

    options.technical_margin_mm = 0.0;
    assert_eq!(options.compute().layout().map(|l| l.total), Some(4));

    options.technical_margin_mm = 5.0;
    assert_eq!(options.compute().layout().map(|l| l.total), Some(1));

    options.technical_margin_mm = 50.0;
    assert!(!options.compute().is_feasible());
    assert!(options.layout_context().is_none());
}

#[test]
fn test_layout_context_carries_cut_size() {
    let options = ImpositionOptions::default();
    let context = options.layout_context().unwrap();

    assert_eq!((context.cut_width, context.cut_height), (96.0, 56.0));
    assert_eq!(context.technical_margin, 5.0);
    assert_eq!(context.layout.total, 21);
}

#[test]
fn test_paper_size_names() {
    assert_eq!(paper_size_name(PaperSize::Bb), "BB");
    assert_eq!(
        paper_size_name(PaperSize::Custom {
            width_mm: 330.0,
            height_mm: 480.0
        }),
        "330x480"
    );
}

#[cfg(feature = "serde")]
mod serde_tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_options_save_and_load() {
        let mut options = ImpositionOptions::default();
        options.sheet_size = PaperSize::Custom {
            width_mm: 330.0,
            height_mm: 480.0,
        };
        options.quantities = vec![250, 1000];
        options.marks.crop_marks = true;

        let temp = NamedTempFile::new().unwrap();
        options.save(temp.path()).await.unwrap();
        let loaded = ImpositionOptions::load(temp.path()).await.unwrap();

        assert_eq!(loaded, options);
    }

    #[tokio::test]
    async fn test_partial_options_use_defaults() {
        let temp = NamedTempFile::new().unwrap();
        tokio::fs::write(
            temp.path(),
            r#"{"sheet_size": "A4", "piece": {"finished_width_mm": 100, "finished_height_mm": 40, "bleed_mm": 0}}"#,
        )
        .await
        .unwrap();

        let options = ImpositionOptions::load(temp.path()).await.unwrap();
        assert_eq!(options.sheet_size, PaperSize::A4);
        assert_eq!(options.technical_margin_mm, 5.0);
        assert_eq!(options.compute().layout().map(|l| l.total), Some(14));
    }

    #[test]
    fn test_paper_size_json_forms() {
        assert_eq!(serde_json::to_string(&PaperSize::Sra3).unwrap(), r#""SRA3""#);
        assert_eq!(
            serde_json::to_value(PaperSize::Custom {
                width_mm: 330.0,
                height_mm: 480.0
            })
            .unwrap(),
            serde_json::json!({"width_mm": 330.0, "height_mm": 480.0})
        );
        assert_eq!(
            serde_json::from_str::<PaperSize>(r#""BB""#).unwrap(),
            PaperSize::Bb
        );
        assert!(serde_json::from_str::<PaperSize>(r#"{"width_mm": 330.0}"#).is_err());
    }

    #[tokio::test]
    async fn test_unknown_paper_size_is_config_error() {
        let temp = NamedTempFile::new().unwrap();
        tokio::fs::write(temp.path(), r#"{"sheet_size": "A0"}"#)
            .await
            .unwrap();

        assert!(matches!(
            ImpositionOptions::load(temp.path()).await,
            Err(ImposeError::Config(_))
        ));
    }
}
