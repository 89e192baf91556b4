use print_impose::*;
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_load_catalog_csv() {
    let temp = NamedTempFile::new().unwrap();
    tokio::fs::write(
        temp.path(),
        "id,name,grammage,width_mm,height_mm,unit_price,stock\n\
         sra3,Couché brillo,300g,320,450,0.85,500\n\
         bb,Offset,90g,660,960\n\
         broken,row\n",
    )
    .await
    .unwrap();

    let catalog = load_catalog_csv(temp.path()).await.unwrap();

    assert_eq!(catalog.len(), 2);
    let ids: Vec<&str> = catalog.sheets().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["bb", "sra3"]);
    assert_eq!(catalog.sheet("bb").unwrap().dimensions_mm(), (660.0, 960.0));
    assert!(catalog.sheet("broken").is_none());
}

#[tokio::test]
async fn test_load_catalog_csv_bad_number() {
    let temp = NamedTempFile::new().unwrap();
    tokio::fs::write(
        temp.path(),
        "id,name,grammage,width_mm,height_mm\nsra3,Couché,300g,wide,450\n",
    )
    .await
    .unwrap();

    let result = load_catalog_csv(temp.path()).await;
    assert!(matches!(
        result,
        Err(ImposeError::InvalidNumber {
            field: "width_mm",
            ..
        })
    ));
}

#[tokio::test]
async fn test_load_catalog_csv_missing_file() {
    let result = load_catalog_csv("/nonexistent/catalog.csv").await;
    assert!(matches!(result, Err(ImposeError::Io(_))));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_catalog_json_roundtrip_keeps_ledger() {
    let mut catalog = Catalog::new();
    catalog.insert_sheet(StockSheet::new("sra3", "Couché 300g", 320.0, 450.0));
    catalog.add_preset(ProductPreset::new("Business card", 90.0, 50.0));
    catalog
        .record_purchase(
            "sra3",
            PaperPurchase {
                supplier: "Acme Papers".to_string(),
                package_quantity: 125,
                package_price: 100.0,
            },
        )
        .unwrap();
    catalog.record_consumption("sra3", 25, "order 7").unwrap();

    let temp = NamedTempFile::new().unwrap();
    catalog.save_json(temp.path()).await.unwrap();
    let loaded = Catalog::load_json(temp.path()).await.unwrap();

    assert_eq!(loaded, catalog);
    let sheet = loaded.sheet("sra3").unwrap();
    assert_eq!(sheet.unit_price, 0.8);
    assert_eq!(sheet.stock_on_hand, 100);
    assert_eq!(loaded.ledger().len(), 2);
}

#[cfg(feature = "serde")]
#[test]
fn test_preset_bleed_defaults_when_missing() {
    let preset: ProductPreset =
        serde_json::from_str(r#"{"title": "Flyer A5", "finished_width_mm": 148, "finished_height_mm": 210}"#)
            .unwrap();

    assert_eq!(preset.bleed_mm, 3.0);
    assert_eq!(preset.default_sheet_id, None);
    assert_eq!(preset.piece().cut_size(), (154.0, 216.0));
}

#[test]
fn test_preset_lookup_drives_layout() {
    let mut catalog = Catalog::new();
    catalog.insert_sheet(StockSheet::new("sra3", "Couché 300g", 320.0, 450.0));
    let mut preset = ProductPreset::new("Business card", 90.0, 50.0);
    preset.default_sheet_id = Some("sra3".to_string());
    catalog.add_preset(preset);

    let preset = catalog.preset("Business card").unwrap();
    let sheet = catalog
        .sheet(preset.default_sheet_id.as_deref().unwrap())
        .unwrap();
    let (cut_width, cut_height) = preset.piece().cut_size();

    let layout = compute_default_margin(sheet.width_mm, sheet.height_mm, cut_width, cut_height)
        .into_layout()
        .unwrap();
    // 310 x 440 usable: 3 x 7 original vs 5 x 4 rotated
    assert_eq!(layout.total, 21);
    assert_eq!(layout.orientation, LayoutOrientation::Original);
}

#[test]
fn test_remove_sheet() {
    let mut catalog = Catalog::new();
    catalog.insert_sheet(StockSheet::new("a4", "A4", 210.0, 297.0));
    assert!(catalog.remove_sheet("a4").is_some());
    assert!(catalog.is_empty());
    assert!(catalog.remove_sheet("a4").is_none());
}

fn catalog_with_sra3() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert_sheet(StockSheet::new("sra3", "Couché 300g", 320.0, 450.0));
    catalog
}

#[test]
fn test_price_tiers_sorted_and_looked_up() {
    let mut catalog = catalog_with_sra3();
    catalog.add_price_tier("sra3", PriceTier::new(101, 500, 1.8)).unwrap();
    catalog.add_price_tier("sra3", PriceTier::new(1, 100, 2.5)).unwrap();
    catalog.add_price_tier("sra3", PriceTier::new(501, 2000, 1.2)).unwrap();

    let table = catalog.price_table("sra3").unwrap();
    let starts: Vec<u32> = table.tiers().iter().map(|t| t.min_quantity).collect();
    assert_eq!(starts, vec![1, 101, 501]);

    assert_eq!(table.unit_price(1), Some(2.5));
    assert_eq!(table.unit_price(100), Some(2.5));
    assert_eq!(table.unit_price(101), Some(1.8));
    assert_eq!(table.unit_price(2000), Some(1.2));
    assert_eq!(table.unit_price(2001), None);
}

#[test]
fn test_price_tier_rejects_overlap_and_bad_ranges() {
    let mut catalog = catalog_with_sra3();
    catalog.add_price_tier("sra3", PriceTier::new(100, 500, 1.8)).unwrap();

    for tier in [
        PriceTier::new(400, 800, 1.5),
        PriceTier::new(1, 100, 2.0),
        PriceTier::new(500, 900, 1.5),
        PriceTier::new(200, 300, 1.7),
        PriceTier::new(1, 1000, 1.0),
    ] {
        match catalog.add_price_tier("sra3", tier) {
            Err(ImposeError::Config(msg)) => assert!(msg.contains("overlaps"), "{}", msg),
            other => panic!("Expected overlap error for {:?}, got {:?}", tier, other),
        }
    }

    // min must be below max, price positive
    assert!(catalog.add_price_tier("sra3", PriceTier::new(600, 600, 1.0)).is_err());
    assert!(catalog.add_price_tier("sra3", PriceTier::new(900, 600, 1.0)).is_err());
    assert!(catalog.add_price_tier("sra3", PriceTier::new(0, 50, 1.0)).is_err());
    assert!(catalog.add_price_tier("sra3", PriceTier::new(600, 900, 0.0)).is_err());

    assert_eq!(catalog.price_table("sra3").unwrap().tiers().len(), 1);
    assert!(matches!(
        catalog.add_price_tier("missing", PriceTier::new(1, 10, 1.0)),
        Err(ImposeError::SheetNotFound(_))
    ));
}

#[test]
fn test_remove_sheet_drops_price_table() {
    let mut catalog = catalog_with_sra3();
    catalog.add_price_tier("sra3", PriceTier::new(1, 100, 2.5)).unwrap();
    catalog.remove_sheet("sra3");
    assert!(catalog.price_table("sra3").is_none());

    let mut table = PriceTable::new();
    table.insert(PriceTier::new(1, 100, 2.5)).unwrap();
    assert_eq!(table.remove(1), Some(PriceTier::new(1, 100, 2.5)));
    assert!(table.is_empty());
    assert_eq!(table.remove(1), None);
}

#[cfg(feature = "serde")]
#[test]
fn test_overlapping_tiers_in_json_rejected() {
    let json = r#"[
        {"min_quantity": 1, "max_quantity": 100, "unit_price": 2.5},
        {"min_quantity": 50, "max_quantity": 200, "unit_price": 2.0}
    ]"#;
    let err = serde_json::from_str::<PriceTable>(json).unwrap_err();
    assert!(err.to_string().contains("overlaps"));

    let json = r#"[{"min_quantity": 1, "max_quantity": 100, "unit_price": 2.5}]"#;
    let table: PriceTable = serde_json::from_str(json).unwrap();
    assert_eq!(table.unit_price(42), Some(2.5));
}

#[test]
fn test_supply_purchase_and_consumption() {
    let mut catalog = Catalog::new();
    catalog.insert_supply(Supply::new("bopp", "BOPP lamination film", "m"));

    let price = catalog
        .record_supply_purchase(
            "bopp",
            SupplyPurchase {
                supplier: "Filmes SA".to_string(),
                quantity: 250.0,
                total_price: 125.0,
            },
        )
        .unwrap();
    assert_eq!(price, 0.5);

    let remaining = catalog
        .record_supply_consumption("bopp", 40.0, "order 7")
        .unwrap();
    assert_eq!(remaining, 210.0);

    match catalog.record_supply_consumption("bopp", 300.0, "order 8") {
        Err(ImposeError::InsufficientSupply {
            requested,
            available,
            ..
        }) => {
            assert_eq!(requested, 300.0);
            assert_eq!(available, 210.0);
        }
        other => panic!("Expected InsufficientSupply, got {:?}", other),
    }

    let supply = catalog.supply("bopp").unwrap();
    assert_eq!(supply.unit_price, 0.5);
    assert_eq!(supply.stock_on_hand, 210.0);
    assert_eq!(catalog.ledger().len(), 2);
    assert!(matches!(
        catalog.ledger()[1],
        LedgerEntry::SupplyConsumption { quantity, .. } if quantity == 40.0
    ));
}

#[test]
fn test_supply_errors() {
    let mut catalog = Catalog::new();
    catalog.insert_supply(Supply::new("ink-k", "Black ink", "l"));

    assert!(matches!(
        catalog.record_supply_purchase(
            "ink-k",
            SupplyPurchase {
                supplier: "Acme".to_string(),
                quantity: 0.0,
                total_price: 10.0,
            },
        ),
        Err(ImposeError::Config(_))
    ));
    assert!(matches!(
        catalog.record_supply_consumption("ink-k", -1.0, "spill"),
        Err(ImposeError::Config(_))
    ));
    assert!(matches!(
        catalog.record_supply_consumption("ink-c", 1.0, "job"),
        Err(ImposeError::SupplyNotFound(id)) if id == "ink-c"
    ));
    assert!(catalog.ledger().is_empty());
    assert_eq!(catalog.supplies().count(), 1);
}
