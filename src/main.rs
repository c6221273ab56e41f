mod config;
mod error;
mod estimate;
mod format;
mod logging;
mod models;
mod pricing;
mod projection;
mod report;
mod share;
mod units;

use clap::{Args, Parser, Subcommand};
use config::{ensure_initialized, load_config, AppConfig};
use error::AppError;
use estimate::{compute_estimate, EstimateInput};
use models::PaymentPlan;
use pricing::PricingRates;
use projection::{compute_comparative_projection, compute_monthly_projection};
use report::{parse_format, OutputFormat};
use units::{convert_bytes, convert_events, BytesUnit, EventsUnit};

#[derive(Debug, Parser)]
#[command(name = "logcost")]
#[command(about = "Log storage, retention and ingestion cost estimator")]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Init,
    /// Month-by-month storage cost for one retention period
    Project {
        /// Monthly volume in millions of events
        #[arg(long)]
        volume: f64,
        /// Retention period in months
        #[arg(long)]
        retention: u32,
        #[arg(long)]
        plan: Option<String>,
        /// Months to show; defaults to the retention period
        #[arg(long)]
        display_months: Option<u32>,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Side-by-side projections for several retention periods
    Compare {
        #[arg(long)]
        volume: f64,
        #[arg(long)]
        plan: Option<String>,
        #[arg(long, value_delimiter = ',', default_values_t = projection::DEFAULT_COMPARE_OPTIONS)]
        options: Vec<u32>,
        #[arg(long)]
        horizon: Option<u32>,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Ingestion plus retention cost for a region and retention length
    Estimate {
        #[command(flatten)]
        input: EstimateArgs,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Print a shareable link for the estimate inputs
    Share {
        #[command(flatten)]
        input: EstimateArgs,
        #[arg(long)]
        base_url: Option<String>,
    },
    Rates {
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Re-scale a value between event or byte units
    Convert {
        #[arg(long)]
        value: f64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

#[derive(Debug, Args)]
struct EstimateArgs {
    /// Share link whose parameters seed the inputs
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    events: Option<f64>,
    #[arg(long)]
    events_unit: Option<String>,
    #[arg(long)]
    bytes: Option<f64>,
    #[arg(long)]
    bytes_unit: Option<String>,
    #[arg(long)]
    retention_days: Option<u32>,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    plan: Option<String>,
}

fn resolve_plan(raw: Option<&str>, cfg: &AppConfig) -> Result<PaymentPlan, AppError> {
    raw.map_or(Ok(cfg.default_plan), |s| s.parse())
}

fn build_estimate_input(args: &EstimateArgs, cfg: &AppConfig) -> Result<EstimateInput, AppError> {
    let mut input = EstimateInput {
        region: cfg.default_region,
        plan: cfg.default_plan,
        ..EstimateInput::default()
    };

    if let Some(raw) = &args.url {
        let url = share::parse_share_url(raw)?;
        share::apply_share_url(&mut input, &url)?;
    }

    if let Some(events) = args.events {
        input.events = events;
    }
    if let Some(unit) = &args.events_unit {
        input.events_unit = unit.parse()?;
    }
    if let Some(bytes) = args.bytes {
        input.bytes = bytes;
    }
    if let Some(unit) = &args.bytes_unit {
        input.bytes_unit = unit.parse()?;
    }
    if let Some(days) = args.retention_days {
        input.retention_days = days;
    }
    if let Some(region) = &args.region {
        input.region = region.parse()?;
    }
    if let Some(plan) = &args.plan {
        input.plan = plan.parse()?;
    }

    Ok(input)
}

fn convert_value(value: f64, from: &str, to: &str) -> Result<(f64, String), AppError> {
    if let (Ok(from), Ok(to)) = (from.parse::<EventsUnit>(), to.parse::<EventsUnit>()) {
        return Ok((convert_events(value, from, to), to.to_string()));
    }
    if let (Ok(from), Ok(to)) = (from.parse::<BytesUnit>(), to.parse::<BytesUnit>()) {
        return Ok((convert_bytes(value, from, to), to.to_string()));
    }
    Err(AppError::InvalidArgument(format!(
        "Cannot convert from '{from}' to '{to}'. Both units must be event units or byte units."
    )))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Commands::Init => {
            let path = ensure_initialized()?;
            println!("Initialized logcost config at {}.", path.display());
        }
        Commands::Project {
            volume,
            retention,
            plan,
            display_months,
            format,
        } => {
            let output = parse_format(&format, true)?;
            let cfg = load_config()?;
            let rates = PricingRates::with_overrides(&cfg.rate_overrides)?;
            let plan = resolve_plan(plan.as_deref(), &cfg)?;
            let result =
                compute_monthly_projection(&rates, volume, retention, plan, display_months)?;
            match output {
                OutputFormat::Table => {
                    print!(
                        "{}",
                        report::render_projection_table(&report::projection_view(&result))
                    )
                }
                OutputFormat::Json => println!("{}", report::render_json("projection", &result)?),
                OutputFormat::Csv => print!("{}", report::render_projection_csv(&result)),
            }
        }
        Commands::Compare {
            volume,
            plan,
            options,
            horizon,
            format,
        } => {
            let output = parse_format(&format, true)?;
            let cfg = load_config()?;
            let rates = PricingRates::with_overrides(&cfg.rate_overrides)?;
            let plan = resolve_plan(plan.as_deref(), &cfg)?;
            let results = compute_comparative_projection(
                &rates,
                volume,
                plan,
                &options,
                horizon.unwrap_or(cfg.horizon_months),
            )?;
            match output {
                OutputFormat::Table => print!("{}", report::render_comparison_table(&results)),
                OutputFormat::Json => println!("{}", report::render_json("comparison", &results)?),
                OutputFormat::Csv => print!("{}", report::render_comparison_csv(&results)),
            }
        }
        Commands::Estimate { input, format } => {
            let output = parse_format(&format, false)?;
            let cfg = load_config()?;
            let rates = PricingRates::with_overrides(&cfg.rate_overrides)?;
            let input = build_estimate_input(&input, &cfg)?;
            let estimate = compute_estimate(&rates, &input, cfg.exchange_rate_jpy)?;
            match output {
                OutputFormat::Json => println!("{}", report::render_json("estimate", &estimate)?),
                _ => print!("{}", report::render_estimate_table(&estimate)),
            }
        }
        Commands::Share { input, base_url } => {
            let cfg = load_config()?;
            let input = build_estimate_input(&input, &cfg)?;
            let base = match base_url {
                Some(raw) => share::parse_share_url(&raw)?,
                None => cfg.share_base_url()?,
            };
            println!("{}", share::to_share_url(&input, &base));
        }
        Commands::Rates { format } => {
            let output = parse_format(&format, false)?;
            let cfg = load_config()?;
            let rates = PricingRates::with_overrides(&cfg.rate_overrides)?;
            match output {
                OutputFormat::Json => println!("{}", report::render_json("rates", &rates)?),
                _ => print!("{}", report::render_rates_table(&rates)),
            }
        }
        Commands::Convert { value, from, to } => {
            let (converted, unit) = convert_value(value, &from, &to)?;
            println!("{converted} {unit}");
        }
    }

    Ok(())
}
