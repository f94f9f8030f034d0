use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use irrigation_oracle::config::{Config, ConfigOverrides};
use irrigation_oracle::engine::{
    compute_budget, suggest_alternatives, AlternativeList, BudgetInput, BudgetResult,
};
use irrigation_oracle::output::csv::{alternatives_to_csv, budget_to_csv};
use irrigation_oracle::output::json::render_json;
use irrigation_oracle::output::table::{
    render_alternatives_table, render_budget_table, render_crops_table, render_locations_table,
    render_methods_table,
};
use irrigation_oracle::reference::loader::load_reference_store;
use irrigation_oracle::server::run_server;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "irrigation-oracle",
    about = "Water-budget decisions for smallholder irrigation planning"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    dataset: Option<String>,
    #[arg(long = "rainfall-csv")]
    rainfall_csv: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone)]
struct FarmArgs {
    #[arg(short, long)]
    location: String,
    #[arg(long)]
    crop: String,
    #[arg(short, long)]
    area: f64,
    #[arg(short, long)]
    method: String,
    /// Groundwater actually on hand, m³/ha; replaces the district baseline.
    #[arg(short, long)]
    groundwater: Option<f64>,
}

impl From<&FarmArgs> for BudgetInput {
    fn from(args: &FarmArgs) -> Self {
        Self {
            location: args.location.clone(),
            crop: args.crop.clone(),
            area_ha: args.area,
            method: args.method.clone(),
            groundwater_override_m3_per_ha: args.groundwater,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate the water budget for one crop choice
    Budget {
        #[command(flatten)]
        farm: FarmArgs,
    },
    /// Rank alternative crops against the same water supply
    Alternatives {
        #[command(flatten)]
        farm: FarmArgs,
        #[arg(long)]
        top: Option<usize>,
    },
    /// List crop profiles in the reference dataset
    Crops,
    /// List district water baselines
    Locations,
    /// List irrigation methods and efficiencies
    Methods,
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        dataset_path: cli.dataset.clone(),
        rainfall_csv: cli.rainfall_csv.clone(),
        shortlist_size: None,
    });

    if let Commands::Config { init, show } = &cli.command {
        if *init {
            Config::write_template(&config_path)?;
            println!("Wrote config template to {}", config_path.display());
        }
        if *show || !*init {
            println!("{}", render_json(&config)?);
        }
        return Ok(());
    }

    let store = load_reference_store(&config)?;

    match &cli.command {
        Commands::Budget { farm } => {
            let input = BudgetInput::from(farm);
            let result = compute_budget(&store, &config.engine, &input)?;
            print_budget(&result, cli.output)?;
            if !result.classification.is_safe() {
                let list = suggest_alternatives(&store, &config.engine, &result, &input)?;
                print_alternatives(&list, cli.output)?;
            }
        }
        Commands::Alternatives { farm, top } => {
            if let Some(top) = top {
                config.engine.shortlist_size = (*top).max(1);
            }
            let input = BudgetInput::from(farm);
            let result = compute_budget(&store, &config.engine, &input)?;
            if result.classification.is_safe() {
                info!("{} is already Safe here; ranking anyway", result.crop);
            }
            let list = suggest_alternatives(&store, &config.engine, &result, &input)?;
            print_alternatives(&list, cli.output)?;
        }
        Commands::Crops => print_listing(
            store.all_crops(),
            render_crops_table(store.all_crops()),
            cli.output,
        )?,
        Commands::Locations => print_listing(
            store.all_locations(),
            render_locations_table(store.all_locations()),
            cli.output,
        )?,
        Commands::Methods => print_listing(
            store.all_methods(),
            render_methods_table(store.all_methods()),
            cli.output,
        )?,
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let bind = format!("{host}:{port}");
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            return run_server(config, store, addr).await;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn print_budget(result: &BudgetResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_budget_table(result)),
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => println!("{}", budget_to_csv(result)?),
    }
    Ok(())
}

fn print_alternatives(list: &AlternativeList, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_alternatives_table(list)),
        OutputFormat::Json => println!("{}", render_json(list)?),
        OutputFormat::Csv => println!("{}", alternatives_to_csv(list)?),
    }
    Ok(())
}

fn print_listing<T: serde::Serialize>(
    items: &[T],
    table: String,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{table}"),
        OutputFormat::Json => println!("{}", render_json(items)?),
        OutputFormat::Csv => {
            // listings have no CSV shape; JSON is close enough for scripts
            println!("{}", render_json(items)?);
        }
    }
    Ok(())
}
