use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use print_impose::{
    Catalog, FIELD_BLEED, FIELD_PIECE_HEIGHT, FIELD_PIECE_WIDTH, FIELD_SHEET, Imposition,
    ImpositionOptions, LayoutRequest, LayoutView, QuoteSettings, RunCosts,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "prt", about = "Print shop imposition tools", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute how many copies fit on a sheet
    Layout {
        #[command(flatten)]
        job: JobArgs,

        /// Print the full layout as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write an SVG preview of the layout
    Preview {
        #[command(flatten)]
        job: JobArgs,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write a one-page PDF proof of the layout
    Proof {
        #[command(flatten)]
        job: JobArgs,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Add crop marks outside the grid
        #[arg(long)]
        crop_marks: bool,

        /// Leave out the technical margin outline
        #[arg(long)]
        no_margin_outline: bool,

        /// Leave out copy outlines
        #[arg(long)]
        no_cut_outlines: bool,
    },

    /// Quote print runs for a sheet from the catalog
    Quote {
        /// Catalog file: CSV (id,name,grammage,width_mm,height_mm[,unit_price[,stock]])
        /// or a saved JSON catalog with price tables
        #[arg(short, long)]
        catalog: PathBuf,

        /// Stock sheet id
        #[arg(short, long)]
        sheet: String,

        /// Finished piece width in mm
        #[arg(long)]
        width: String,

        /// Finished piece height in mm
        #[arg(long)]
        height: String,

        /// Bleed in mm
        #[arg(long, default_value = "3")]
        bleed: String,

        /// Comma-separated run quantities, e.g. "100,500,1000"
        #[arg(short, long)]
        quantities: String,

        /// Printing cost per run
        #[arg(long, default_value = "0")]
        printing: f64,

        /// Finishing cost per run
        #[arg(long, default_value = "0")]
        finishing: f64,

        /// Freight cost per run
        #[arg(long, default_value = "0")]
        freight: f64,

        /// Tax taken from the sale price (%)
        #[arg(long, default_value_t = QuoteSettings::default().tax_pct)]
        tax: f64,

        /// Sales commission taken from the sale price (%)
        #[arg(long, default_value_t = QuoteSettings::default().commission_pct)]
        commission: f64,

        /// Card fee taken from the sale price (%)
        #[arg(long, default_value_t = QuoteSettings::default().card_fee_pct)]
        card_fee: f64,
    },

    /// List the sheets of a catalog
    Catalog {
        /// Catalog file (CSV or JSON)
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

/// Sheet and piece description shared by the layout commands
#[derive(Args)]
struct JobArgs {
    /// Start from a saved job (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stock sheet format
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Stock sheet orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Custom sheet width in mm (requires --sheet-height)
    #[arg(long, requires = "sheet_height")]
    sheet_width: Option<f64>,

    /// Custom sheet height in mm (requires --sheet-width)
    #[arg(long, requires = "sheet_width")]
    sheet_height: Option<f64>,

    /// Finished piece width in mm
    #[arg(long)]
    width: Option<f64>,

    /// Finished piece height in mm
    #[arg(long)]
    height: Option<f64>,

    /// Bleed in mm
    #[arg(long)]
    bleed: Option<f64>,

    /// Technical margin in mm
    #[arg(long)]
    margin: Option<f64>,

    /// Save the resulting job (JSON)
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    A3,
    Sra3,
    Letter,
    Tabloid,
    Bb,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for print_impose::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::A3 => Self::A3,
            PaperArg::Sra3 => Self::Sra3,
            PaperArg::Letter => Self::Letter,
            PaperArg::Tabloid => Self::Tabloid,
            PaperArg::Bb => Self::Bb,
        }
    }
}

impl From<OrientationArg> for print_impose::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl JobArgs {
    async fn into_options(self) -> Result<ImpositionOptions> {
        let mut options = match &self.config {
            Some(path) => ImpositionOptions::load(path)
                .await
                .with_context(|| format!("loading {}", path.display()))?,
            None => ImpositionOptions::default(),
        };

        if let Some(paper) = self.paper {
            options.sheet_size = paper.into();
        }
        if let (Some(width_mm), Some(height_mm)) = (self.sheet_width, self.sheet_height) {
            options.sheet_size = print_impose::PaperSize::Custom {
                width_mm,
                height_mm,
            };
        }
        if let Some(orientation) = self.orientation {
            options.sheet_orientation = orientation.into();
        }
        if let Some(width) = self.width {
            options.piece.finished_width_mm = width;
        }
        if let Some(height) = self.height {
            options.piece.finished_height_mm = height;
        }
        if let Some(bleed) = self.bleed {
            options.piece.bleed_mm = bleed;
        }
        if let Some(margin) = self.margin {
            options.technical_margin_mm = margin;
        }

        options.validate()?;

        if let Some(path) = &self.save_config {
            options.save(path).await?;
            log::info!("Saved job to {}", path.display());
        }

        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Layout { job, json } => {
            let options = job.into_options().await?;
            match options.compute() {
                Imposition::Infeasible(reason) => {
                    bail!("No layout possible: {:?}", reason);
                }
                Imposition::Feasible(layout) if json => {
                    println!("{}", serde_json::to_string_pretty(&layout)?);
                }
                Imposition::Feasible(layout) => {
                    let sheet = options.sheet();
                    let (cut_width, cut_height) = options.piece.cut_size();
                    println!("Layout:");
                    println!("  Sheet: {} x {} mm", sheet.width_mm, sheet.height_mm);
                    println!("  Cut size: {} x {} mm", cut_width, cut_height);
                    println!("  Orientation: {}", layout.orientation.label());
                    println!("  Grid: {} x {}", layout.columns, layout.rows);
                    println!("  Per sheet: {}", layout.total);
                    println!(
                        "  Utilization: {:.1}%",
                        layout.utilization(sheet.width_mm, sheet.height_mm) * 100.0
                    );
                }
            }
        }

        Commands::Preview { job, output } => {
            let options = job.into_options().await?;
            let svg = match options.layout_context() {
                Some(context) => print_impose::render_layout_svg(&context),
                None => {
                    log::warn!("No layout possible; writing placeholder");
                    print_impose::render_placeholder()
                }
            };
            tokio::fs::write(&output, svg).await?;
            println!("Preview → {}", output.display());
        }

        Commands::Proof {
            job,
            output,
            crop_marks,
            no_margin_outline,
            no_cut_outlines,
        } => {
            let mut options = job.into_options().await?;
            if crop_marks {
                options.marks.crop_marks = true;
            }
            if no_margin_outline {
                options.marks.margin_outline = false;
            }
            if no_cut_outlines {
                options.marks.cut_outlines = false;
            }

            let Some(context) = options.layout_context() else {
                bail!("No layout possible for this sheet and piece");
            };
            let total = context.layout.total;
            let doc = print_impose::render_proof(context, options.marks).await?;
            print_impose::save_pdf(doc, &output).await?;
            println!("Proof ({} per sheet) → {}", total, output.display());
        }

        Commands::Quote {
            catalog,
            sheet,
            width,
            height,
            bleed,
            quantities,
            printing,
            finishing,
            freight,
            tax,
            commission,
            card_fee,
        } => {
            let catalog = load_catalog(&catalog).await?;
            let quantities = print_impose::parse_quantities(&quantities)?;

            let request = LayoutRequest::from_query_pairs([
                (FIELD_PIECE_WIDTH, width.as_str()),
                (FIELD_PIECE_HEIGHT, height.as_str()),
                (FIELD_BLEED, bleed.as_str()),
                (FIELD_SHEET, sheet.as_str()),
            ]);

            let context = match print_impose::handle_layout_request(&request, &catalog) {
                LayoutView::Result(context) => context,
                LayoutView::Placeholder => {
                    bail!("No layout for this request (run with -v for details)")
                }
            };

            println!(
                "{} ({} x {} mm): {} per sheet, {}",
                context.sheet.name,
                context.sheet.width_mm,
                context.sheet.height_mm,
                context.layout.total,
                context.layout.orientation.label()
            );

            let extra = RunCosts {
                paper: 0.0,
                printing,
                finishing,
                freight,
            };
            let settings = QuoteSettings {
                tax_pct: tax,
                commission_pct: commission,
                card_fee_pct: card_fee,
            };
            let runs = print_impose::quote_runs(
                &context.layout,
                &context.sheet,
                &quantities,
                extra,
                &settings,
            )?;
            let price_table = catalog.price_table(&context.sheet.id);
            for run in &runs {
                println!(
                    "  {:>7} units: {:>6} sheets, paper {:>9.2}, cost {:>9.2}, sale {:>9.2}, unit {:.4}",
                    run.quantity,
                    run.statistics.sheets_needed,
                    run.costs.paper,
                    run.total_cost,
                    run.sale_price,
                    run.sale_unit_price
                );
                if let Some(list) = price_table.and_then(|t| t.unit_price(run.quantity)) {
                    println!("          list price {:.4}/unit", list);
                }
                if run.statistics.sheets_needed > context.sheet.stock_on_hand {
                    log::warn!(
                        "{} needs {} sheets but only {} in stock",
                        context.sheet.id,
                        run.statistics.sheets_needed,
                        context.sheet.stock_on_hand
                    );
                }
            }
        }

        Commands::Catalog { catalog } => {
            let catalog = load_catalog(&catalog).await?;
            if catalog.is_empty() {
                println!("Catalog is empty");
            }
            for sheet in catalog.sheets() {
                println!(
                    "{:<12} {:<24} {:>6} {:>6} x {:<6} {:>8.4} {:>8}",
                    sheet.id,
                    sheet.name,
                    sheet.grammage,
                    sheet.width_mm,
                    sheet.height_mm,
                    sheet.unit_price,
                    sheet.stock_on_hand
                );
                for tier in catalog.price_table(&sheet.id).map_or(&[][..], |t| t.tiers()) {
                    println!(
                        "    {:>7} - {:<7} {:>8.4}",
                        tier.min_quantity, tier.max_quantity, tier.unit_price
                    );
                }
            }
            for supply in catalog.supplies() {
                println!(
                    "{:<12} {:<24} {:>8.4}/{} {:>10.2} {}",
                    supply.id,
                    supply.name,
                    supply.unit_price,
                    supply.unit,
                    supply.stock_on_hand,
                    supply.unit
                );
            }
        }
    }

    Ok(())
}

async fn load_catalog(path: &Path) -> Result<Catalog> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let catalog = if is_json {
        Catalog::load_json(path).await
    } else {
        print_impose::load_catalog_csv(path).await
    }
    .with_context(|| format!("loading catalog {}", path.display()))?;
    log::info!("{} sheets in {}", catalog.len(), path.display());
    Ok(catalog)
}
