//! Paper catalog, stock ledger, price tables and product presets
//!
//! The catalog is the layout engine's source of sheet dimensions. It also
//! keeps the purchase/consumption ledger that drives the current unit
//! price and stock of every sheet and supply; the engine itself never
//! touches it.

use crate::constants::DEFAULT_BLEED_MM;
use crate::types::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Lookup of stock sheets by identifier
pub trait StockCatalog {
    fn sheet(&self, id: &str) -> Option<&StockSheet>;
}

/// One purchase of a package of sheets
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaperPurchase {
    pub supplier: String,
    /// Sheets in the package
    pub package_quantity: u64,
    /// Price paid for the whole package
    pub package_price: f64,
}

impl PaperPurchase {
    /// Cost of a single sheet in this purchase
    pub fn unit_price(&self) -> f64 {
        self.package_price / self.package_quantity as f64
    }
}

/// A consumable other than paper (ink, lamination film, wire-o...)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Supply {
    pub id: String,
    pub name: String,
    /// Unit the supply is counted in, e.g. "un", "m", "l"
    pub unit: String,
    /// Cost of one unit, taken from the latest purchase
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit_price: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stock_on_hand: f64,
}

impl Supply {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit: unit.into(),
            unit_price: 0.0,
            stock_on_hand: 0.0,
        }
    }
}

/// One purchase of a supply, in the supply's own unit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupplyPurchase {
    pub supplier: String,
    pub quantity: f64,
    pub total_price: f64,
}

impl SupplyPurchase {
    pub fn unit_price(&self) -> f64 {
        self.total_price / self.quantity
    }
}

/// A movement recorded against a sheet's or a supply's stock
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LedgerEntry {
    Purchase {
        sheet_id: String,
        purchase: PaperPurchase,
    },
    Consumption {
        sheet_id: String,
        sheets: u64,
        reason: String,
    },
    SupplyPurchase {
        supply_id: String,
        purchase: SupplyPurchase,
    },
    SupplyConsumption {
        supply_id: String,
        quantity: f64,
        reason: String,
    },
}

/// Sale price per unit for an inclusive quantity range
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceTier {
    pub min_quantity: u32,
    pub max_quantity: u32,
    pub unit_price: f64,
}

impl PriceTier {
    pub fn new(min_quantity: u32, max_quantity: u32, unit_price: f64) -> Self {
        Self {
            min_quantity,
            max_quantity,
            unit_price,
        }
    }

    pub fn contains(&self, quantity: u32) -> bool {
        (self.min_quantity..=self.max_quantity).contains(&quantity)
    }

    fn overlaps(&self, other: &PriceTier) -> bool {
        self.min_quantity <= other.max_quantity && self.max_quantity >= other.min_quantity
    }

    fn validate(&self) -> Result<()> {
        if self.min_quantity == 0 {
            return Err(ImposeError::Config(
                "Minimum quantity must be greater than zero".to_string(),
            ));
        }
        if self.max_quantity <= self.min_quantity {
            return Err(ImposeError::Config(
                "Maximum quantity must be greater than minimum".to_string(),
            ));
        }
        if !(self.unit_price > 0.0) {
            return Err(ImposeError::Config(
                "Tier price must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Quantity-tiered sale prices, kept sorted with no overlapping ranges
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<PriceTier>", into = "Vec<PriceTier>")
)]
pub struct PriceTable {
    tiers: Vec<PriceTier>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tier. Ranges are inclusive, so two tiers may not share an
    /// endpoint.
    pub fn insert(&mut self, tier: PriceTier) -> Result<()> {
        tier.validate()?;
        if let Some(conflict) = self.tiers.iter().find(|t| t.overlaps(&tier)) {
            return Err(ImposeError::Config(format!(
                "Range {}-{} overlaps existing tier {}-{}",
                tier.min_quantity, tier.max_quantity, conflict.min_quantity, conflict.max_quantity
            )));
        }
        let index = self
            .tiers
            .partition_point(|t| t.min_quantity < tier.min_quantity);
        self.tiers.insert(index, tier);
        Ok(())
    }

    /// Remove the tier starting at `min_quantity`
    pub fn remove(&mut self, min_quantity: u32) -> Option<PriceTier> {
        let index = self
            .tiers
            .iter()
            .position(|t| t.min_quantity == min_quantity)?;
        Some(self.tiers.remove(index))
    }

    /// Tiers ordered by minimum quantity
    pub fn tiers(&self) -> &[PriceTier] {
        &self.tiers
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Unit price of the tier covering `quantity`
    pub fn unit_price(&self, quantity: u32) -> Option<f64> {
        self.tiers
            .iter()
            .find(|t| t.contains(quantity))
            .map(|t| t.unit_price)
    }
}

impl TryFrom<Vec<PriceTier>> for PriceTable {
    type Error = ImposeError;

    fn try_from(tiers: Vec<PriceTier>) -> Result<Self> {
        let mut table = PriceTable::new();
        for tier in tiers {
            table.insert(tier)?;
        }
        Ok(table)
    }
}

impl From<PriceTable> for Vec<PriceTier> {
    fn from(table: PriceTable) -> Self {
        table.tiers
    }
}

/// A pre-configured product (e.g. "standard business card")
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductPreset {
    pub title: String,
    pub finished_width_mm: f64,
    pub finished_height_mm: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_bleed"))]
    pub bleed_mm: f64,
    /// Sheet suggested for this product
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_sheet_id: Option<String>,
}

#[cfg(feature = "serde")]
fn default_bleed() -> f64 {
    DEFAULT_BLEED_MM
}

impl ProductPreset {
    pub fn new(title: impl Into<String>, finished_width_mm: f64, finished_height_mm: f64) -> Self {
        Self {
            title: title.into(),
            finished_width_mm,
            finished_height_mm,
            bleed_mm: DEFAULT_BLEED_MM,
            default_sheet_id: None,
        }
    }

    pub fn piece(&self) -> PieceSpec {
        PieceSpec::new(
            self.finished_width_mm,
            self.finished_height_mm,
            self.bleed_mm,
        )
    }
}

/// In-memory paper catalog
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Catalog {
    sheets: BTreeMap<String, StockSheet>,
    #[cfg_attr(feature = "serde", serde(default))]
    presets: Vec<ProductPreset>,
    #[cfg_attr(feature = "serde", serde(default))]
    price_tables: BTreeMap<String, PriceTable>,
    #[cfg_attr(feature = "serde", serde(default))]
    supplies: BTreeMap<String, Supply>,
    #[cfg_attr(feature = "serde", serde(default))]
    ledger: Vec<LedgerEntry>,
}

impl StockCatalog for Catalog {
    fn sheet(&self, id: &str) -> Option<&StockSheet> {
        self.sheets.get(id)
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a sheet, keyed by its id
    pub fn insert_sheet(&mut self, sheet: StockSheet) -> Option<StockSheet> {
        self.sheets.insert(sheet.id.clone(), sheet)
    }

    /// Remove a sheet together with its price table
    pub fn remove_sheet(&mut self, id: &str) -> Option<StockSheet> {
        self.price_tables.remove(id);
        self.sheets.remove(id)
    }

    /// Sheets ordered by id
    pub fn sheets(&self) -> impl Iterator<Item = &StockSheet> {
        self.sheets.values()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn add_preset(&mut self, preset: ProductPreset) {
        self.presets.push(preset);
    }

    pub fn presets(&self) -> &[ProductPreset] {
        &self.presets
    }

    pub fn preset(&self, title: &str) -> Option<&ProductPreset> {
        self.presets.iter().find(|p| p.title == title)
    }

    /// Add a sale price tier to a sheet's price table
    pub fn add_price_tier(&mut self, sheet_id: &str, tier: PriceTier) -> Result<()> {
        if !self.sheets.contains_key(sheet_id) {
            return Err(ImposeError::SheetNotFound(sheet_id.to_string()));
        }
        self.price_tables
            .entry(sheet_id.to_string())
            .or_default()
            .insert(tier)
    }

    pub fn price_table(&self, sheet_id: &str) -> Option<&PriceTable> {
        self.price_tables.get(sheet_id)
    }

    /// Add or replace a supply, keyed by its id
    pub fn insert_supply(&mut self, supply: Supply) -> Option<Supply> {
        self.supplies.insert(supply.id.clone(), supply)
    }

    pub fn supply(&self, id: &str) -> Option<&Supply> {
        self.supplies.get(id)
    }

    /// Supplies ordered by id
    pub fn supplies(&self) -> impl Iterator<Item = &Supply> {
        self.supplies.values()
    }

    /// Ledger entries in the order they were recorded
    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    /// Record a purchase: the sheet's unit price becomes this purchase's
    /// unit price and the package is added to stock.
    pub fn record_purchase(&mut self, sheet_id: &str, purchase: PaperPurchase) -> Result<f64> {
        if purchase.package_quantity == 0 {
            return Err(ImposeError::Config(
                "Package quantity must be greater than zero".to_string(),
            ));
        }
        if !(purchase.package_price >= 0.0) {
            return Err(ImposeError::Config(
                "Package price must not be negative".to_string(),
            ));
        }

        let sheet = self
            .sheets
            .get_mut(sheet_id)
            .ok_or_else(|| ImposeError::SheetNotFound(sheet_id.to_string()))?;

        let stock_on_hand = sheet
            .stock_on_hand
            .checked_add(purchase.package_quantity)
            .ok_or_else(|| {
                ImposeError::Config(format!("Stock of {} would overflow", sheet_id))
            })?;

        let unit_price = purchase.unit_price();
        sheet.unit_price = unit_price;
        sheet.stock_on_hand = stock_on_hand;
        log::debug!(
            "Purchased {} sheets of {} at {:.4} each",
            purchase.package_quantity,
            sheet_id,
            unit_price
        );

        self.ledger.push(LedgerEntry::Purchase {
            sheet_id: sheet_id.to_string(),
            purchase,
        });
        Ok(unit_price)
    }

    /// Record sheets taken out of stock. Returns the remaining stock.
    pub fn record_consumption(
        &mut self,
        sheet_id: &str,
        sheets: u64,
        reason: impl Into<String>,
    ) -> Result<u64> {
        let sheet = self
            .sheets
            .get_mut(sheet_id)
            .ok_or_else(|| ImposeError::SheetNotFound(sheet_id.to_string()))?;

        if sheets > sheet.stock_on_hand {
            return Err(ImposeError::InsufficientStock {
                sheet_id: sheet_id.to_string(),
                requested: sheets,
                available: sheet.stock_on_hand,
            });
        }

        sheet.stock_on_hand -= sheets;
        let remaining = sheet.stock_on_hand;

        self.ledger.push(LedgerEntry::Consumption {
            sheet_id: sheet_id.to_string(),
            sheets,
            reason: reason.into(),
        });
        Ok(remaining)
    }

    /// Record a supply purchase: the latest unit price wins and the
    /// quantity is added to stock.
    pub fn record_supply_purchase(
        &mut self,
        supply_id: &str,
        purchase: SupplyPurchase,
    ) -> Result<f64> {
        if !(purchase.quantity > 0.0) || !purchase.quantity.is_finite() {
            return Err(ImposeError::Config(
                "Purchased quantity must be greater than zero".to_string(),
            ));
        }
        if !(purchase.total_price >= 0.0) {
            return Err(ImposeError::Config(
                "Purchase price must not be negative".to_string(),
            ));
        }

        let supply = self
            .supplies
            .get_mut(supply_id)
            .ok_or_else(|| ImposeError::SupplyNotFound(supply_id.to_string()))?;

        let unit_price = purchase.unit_price();
        supply.unit_price = unit_price;
        supply.stock_on_hand += purchase.quantity;
        log::debug!(
            "Purchased {} {} of {} at {:.4} each",
            purchase.quantity,
            supply.unit,
            supply_id,
            unit_price
        );

        self.ledger.push(LedgerEntry::SupplyPurchase {
            supply_id: supply_id.to_string(),
            purchase,
        });
        Ok(unit_price)
    }

    /// Record a supply taken out of stock. Returns the remaining stock.
    pub fn record_supply_consumption(
        &mut self,
        supply_id: &str,
        quantity: f64,
        reason: impl Into<String>,
    ) -> Result<f64> {
        if !(quantity > 0.0) {
            return Err(ImposeError::Config(
                "Consumed quantity must be greater than zero".to_string(),
            ));
        }

        let supply = self
            .supplies
            .get_mut(supply_id)
            .ok_or_else(|| ImposeError::SupplyNotFound(supply_id.to_string()))?;

        if quantity > supply.stock_on_hand {
            return Err(ImposeError::InsufficientSupply {
                supply_id: supply_id.to_string(),
                requested: quantity,
                available: supply.stock_on_hand,
            });
        }

        supply.stock_on_hand -= quantity;
        let remaining = supply.stock_on_hand;

        self.ledger.push(LedgerEntry::SupplyConsumption {
            supply_id: supply_id.to_string(),
            quantity,
            reason: reason.into(),
        });
        Ok(remaining)
    }

    /// Load a catalog from JSON file
    #[cfg(feature = "serde")]
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Save the catalog to JSON file
    #[cfg(feature = "serde")]
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

/// Load stock sheets from a CSV file.
///
/// Expected columns: `id,name,grammage,width_mm,height_mm[,unit_price[,stock]]`
/// with a header row.
pub async fn load_catalog_csv(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read_to_string(&path).await?;

    let catalog = tokio::task::spawn_blocking(move || parse_catalog_csv(&contents)).await??;
    log::debug!("Loaded {} stock sheets from {}", catalog.len(), path.display());

    Ok(catalog)
}

/// Parse CSV contents into a catalog. Rows with fewer than five columns are
/// skipped.
pub fn parse_catalog_csv(contents: &str) -> Result<Catalog> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(contents.as_bytes());
    let mut catalog = Catalog::new();

    for result in reader.records() {
        let record = result?;
        if record.len() < 5 {
            log::warn!("Skipping catalog row with {} columns", record.len());
            continue;
        }

        let mut sheet = StockSheet::new(
            record[0].trim(),
            record[1].trim(),
            parse_field("width_mm", &record[3])?,
            parse_field("height_mm", &record[4])?,
        );
        sheet.grammage = record[2].trim().to_string();
        if let Some(price) = record.get(5).filter(|v| !v.trim().is_empty()) {
            sheet.unit_price = parse_field("unit_price", price)?;
        }
        if let Some(stock) = record.get(6).filter(|v| !v.trim().is_empty()) {
            sheet.stock_on_hand = stock.trim().parse().map_err(|_| ImposeError::InvalidNumber {
                field: "stock",
                value: stock.to_string(),
            })?;
        }
        catalog.insert_sheet(sheet);
    }

    Ok(catalog)
}

fn parse_field(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| ImposeError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
