use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use profit_core::InputField;
use profit_data::{AppConfig, SaleCsvLoader};
use profit_cli::{
    commands::{render_compute, render_log, run_compute, run_log, run_session},
    logging::init_logging,
    render::render_progress,
    utils::parse_decimal,
};
use serde::Serialize;
use tracing::debug;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Per-sale profit calculator for marketplace sellers.
///
/// Computes net proceeds, margin and a fee waterfall for a sale, logs sales
/// against a gross goal, and runs what-if scenarios.
#[derive(Debug, Parser)]
#[command(name = "sale-calc", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML configuration file (fee profile, goal, log level).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute one sale, optionally against a what-if scenario.
    Compute(ComputeArgs),
    /// Log every sale in a CSV file against the gross goal.
    Log(LogArgs),
    /// Read calculator commands from stdin, one per line.
    Session,
}

/// Amounts are read like form input: unparsable values count as 0. Rates
/// left unset come from the configured fee profile.
#[derive(Debug, Args)]
struct ComputeArgs {
    #[arg(long)]
    item_price: Option<String>,
    #[arg(long)]
    shipping_charged: Option<String>,
    #[arg(long)]
    shipping_cost: Option<String>,
    #[arg(long)]
    cogs: Option<String>,
    #[arg(long)]
    ebay_fee_pct: Option<String>,
    #[arg(long)]
    promoted_pct: Option<String>,
    #[arg(long)]
    payment_proc_pct: Option<String>,
    #[arg(long)]
    payment_proc_fixed: Option<String>,
    #[arg(long)]
    refunds_pct: Option<String>,
    #[arg(long)]
    taxes: Option<String>,
    #[arg(long)]
    adjustments: Option<String>,

    /// Scenario override as `field=value`; repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    overrides: Vec<String>,
}

impl ComputeArgs {
    fn fields(&self) -> Vec<(InputField, String)> {
        [
            (InputField::ItemPrice, &self.item_price),
            (InputField::ShippingCharged, &self.shipping_charged),
            (InputField::ShippingCost, &self.shipping_cost),
            (InputField::Cogs, &self.cogs),
            (InputField::EbayFeePct, &self.ebay_fee_pct),
            (InputField::PromotedPct, &self.promoted_pct),
            (InputField::PaymentProcPct, &self.payment_proc_pct),
            (InputField::PaymentProcFixed, &self.payment_proc_fixed),
            (InputField::RefundsPct, &self.refunds_pct),
            (InputField::Taxes, &self.taxes),
            (InputField::Adjustments, &self.adjustments),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|v| (field, v)))
        .collect()
    }
}

#[derive(Debug, Args)]
struct LogArgs {
    /// CSV file of sales, one per row, with a header.
    #[arg(long)]
    file: PathBuf,

    /// Gross goal; defaults to the configured one.
    #[arg(long)]
    goal: Option<String>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    init_logging(&config.log_level, cli.log_file.as_deref())?;
    debug!(config = ?cli.config, "starting sale-calc");

    match cli.command {
        Command::Compute(args) => {
            let report = run_compute(&config, &args.fields(), args.overrides.as_slice())?;
            emit(cli.format, &report, render_compute)
        }
        Command::Log(args) => {
            let goal = args
                .goal
                .as_deref()
                .map(parse_decimal)
                .transpose()
                .context("invalid --goal")?;
            let inputs = SaleCsvLoader::with_fee_profile(config.fees.clone())
                .load_from_file(&args.file)
                .with_context(|| format!("failed to load sales from {}", args.file.display()))?;
            let report = run_log(&config, &inputs, goal)?;
            emit(cli.format, &report, render_log)
        }
        Command::Session => {
            let summary = run_session(&config, io::stdin().lock(), io::stdout().lock())?;
            emit(cli.format, &summary, render_progress)
        }
    }
}

fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    render: impl Fn(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", render(value).trim_end()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
