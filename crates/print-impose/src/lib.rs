pub mod catalog;
pub mod constants;
mod handler;
pub mod layout;
pub mod marks;
mod options;
mod preview;
pub mod render;
mod stats;
mod types;

pub use catalog::{
    Catalog, LedgerEntry, PaperPurchase, PriceTable, PriceTier, ProductPreset, StockCatalog,
    Supply, SupplyPurchase, load_catalog_csv, parse_catalog_csv,
};
pub use handler::*;
pub use layout::{
    Imposition, InfeasibleReason, LayoutOrientation, LayoutResult, Position, Rect, compute,
    compute_default_margin,
};
pub use options::*;
pub use preview::*;
pub use render::{render_proof, render_proof_sheet, save_pdf};
pub use stats::*;
pub use types::*;
