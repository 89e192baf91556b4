use crate::constants::{DEFAULT_CARD_FEE_PCT, DEFAULT_COMMISSION_PCT, DEFAULT_TAX_PCT};
use crate::layout::LayoutResult;
use crate::types::*;

/// Statistics for printing a quantity from one layout
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YieldStatistics {
    /// Copies per sheet
    pub units_per_sheet: usize,
    /// Copies ordered
    pub quantity: u32,
    /// Whole sheets required to cover the quantity
    pub sheets_needed: u64,
    /// Copies printed beyond the quantity on the last sheet
    pub spare_units: u64,
    /// Fraction of each sheet covered by copies (0.0 - 1.0)
    pub utilization: f64,
    /// Paper cost of all sheets needed
    pub paper_cost: f64,
    /// Paper cost divided by quantity
    pub paper_cost_per_unit: f64,
}

/// Calculate statistics for printing `quantity` copies with `layout`.
pub fn calculate_statistics(
    layout: &LayoutResult,
    sheet: &StockSheet,
    quantity: u32,
) -> Result<YieldStatistics> {
    if layout.total == 0 {
        return Err(ImposeError::ZeroYield);
    }
    if quantity == 0 {
        return Err(ImposeError::Config(
            "Quantity must be greater than zero".to_string(),
        ));
    }

    let per_sheet = layout.total as u64;
    let sheets_needed = u64::from(quantity).div_ceil(per_sheet);
    let spare_units = sheets_needed * per_sheet - u64::from(quantity);
    let paper_cost = sheets_needed as f64 * sheet.unit_price;

    Ok(YieldStatistics {
        units_per_sheet: layout.total,
        quantity,
        sheets_needed,
        spare_units,
        utilization: layout.utilization(sheet.width_mm, sheet.height_mm),
        paper_cost,
        paper_cost_per_unit: paper_cost / f64::from(quantity),
    })
}

/// Parse a comma-separated list of run quantities, e.g. "100, 500, 1000".
/// Blank entries are skipped; the result keeps the input order.
pub fn parse_quantities(input: &str) -> Result<Vec<u32>> {
    let mut quantities = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let quantity: u32 = part.parse().map_err(|_| ImposeError::InvalidNumber {
            field: "quantities",
            value: part.to_string(),
        })?;
        if quantity == 0 {
            return Err(ImposeError::Config(
                "Quantities must be greater than zero".to_string(),
            ));
        }
        quantities.push(quantity);
    }
    Ok(quantities)
}

/// Production costs of one print run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunCosts {
    pub paper: f64,
    pub printing: f64,
    pub finishing: f64,
    pub freight: f64,
}

impl RunCosts {
    pub fn total(&self) -> f64 {
        self.paper + self.printing + self.finishing + self.freight
    }

    /// Total cost divided over the quantity (0 for an empty run)
    pub fn unit_price(&self, quantity: u32) -> f64 {
        if quantity == 0 {
            return 0.0;
        }
        self.total() / f64::from(quantity)
    }
}

/// Percentages deducted from the sale price of a quote
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuoteSettings {
    pub tax_pct: f64,
    pub commission_pct: f64,
    pub card_fee_pct: f64,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            tax_pct: DEFAULT_TAX_PCT,
            commission_pct: DEFAULT_COMMISSION_PCT,
            card_fee_pct: DEFAULT_CARD_FEE_PCT,
        }
    }
}

impl QuoteSettings {
    /// No deductions: the sale price equals the production cost
    pub fn at_cost() -> Self {
        Self {
            tax_pct: 0.0,
            commission_pct: 0.0,
            card_fee_pct: 0.0,
        }
    }

    /// Sum of all deductions, in percent
    pub fn total_pct(&self) -> f64 {
        self.tax_pct + self.commission_pct + self.card_fee_pct
    }

    pub fn validate(&self) -> Result<()> {
        for (name, pct) in [
            ("Tax", self.tax_pct),
            ("Commission", self.commission_pct),
            ("Card fee", self.card_fee_pct),
        ] {
            if !(pct >= 0.0) {
                return Err(ImposeError::Config(format!(
                    "{} percentage must not be negative",
                    name
                )));
            }
        }
        if !(self.total_pct() < 100.0) {
            return Err(ImposeError::Config(
                "Deductions must add up to less than 100%".to_string(),
            ));
        }
        Ok(())
    }

    /// Price at which `cost` is left over once every deduction is taken
    /// from the sale price.
    pub fn sale_price(&self, cost: f64) -> Result<f64> {
        self.validate()?;
        Ok(cost / (1.0 - self.total_pct() / 100.0))
    }
}

/// One quantity of a quote with its costs and sale price
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuoteRun {
    pub quantity: u32,
    pub statistics: YieldStatistics,
    pub costs: RunCosts,
    /// Production cost of the run
    pub total_cost: f64,
    /// Production cost per unit
    pub unit_price: f64,
    /// Final sale value of the run after deductions
    pub sale_price: f64,
    pub sale_unit_price: f64,
}

/// Build one run per quantity, ordered by quantity.
///
/// `extra` holds the non-paper costs shared by every run; its `paper` field
/// is ignored and replaced by the paper cost of each run.
pub fn quote_runs(
    layout: &LayoutResult,
    sheet: &StockSheet,
    quantities: &[u32],
    extra: RunCosts,
    settings: &QuoteSettings,
) -> Result<Vec<QuoteRun>> {
    settings.validate()?;

    let mut sorted = quantities.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    sorted
        .into_iter()
        .map(|quantity| {
            let statistics = calculate_statistics(layout, sheet, quantity)?;
            let costs = RunCosts {
                paper: statistics.paper_cost,
                ..extra
            };
            let sale_price = settings.sale_price(costs.total())?;
            Ok(QuoteRun {
                quantity,
                total_cost: costs.total(),
                unit_price: costs.unit_price(quantity),
                sale_price,
                sale_unit_price: sale_price / f64::from(quantity),
                statistics,
                costs,
            })
        })
        .collect()
}
