//! drift CLI - compare SQL Server schemas and generate a remediation script
//!
//! Usage:
//!   drift compare [--config drift.toml] [--types table,view] [--log]
//!   drift list source [--types procedure,function]
//!
//! Examples:
//!   drift compare
//!   drift compare --types table,view --log
//!   drift list target --config staging.toml

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use drift::config::{ConnectionSettings, Settings};
use drift::diff::{CompareOptions, DiffEngine};
use drift::model::{parse_categories, Side};
use drift::repository::{MsSqlRepository, ObjectRepository};
use drift::script::{script_file_name, ScriptWriter};

#[derive(Parser)]
#[command(name = "drift")]
#[command(about = "Compare SQL Server schemas and generate a remediation script")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare source and target schemas and write the remediation script
    Compare {
        /// Path to the config file (defaults to ./drift.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Comma-separated object categories to compare
        #[arg(
            short,
            long,
            value_delimiter = ',',
            default_value = "table,view,procedure,function,trigger"
        )]
        types: Vec<String>,

        /// Write normalized definition snapshots for differing objects
        #[arg(short, long)]
        log: bool,

        /// Maximum number of in-flight comparisons (overrides config)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// List the schema objects of one configured database
    List {
        /// Which database to list
        side: SideArg,

        /// Path to the config file (defaults to ./drift.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Comma-separated object categories to list
        #[arg(
            short,
            long,
            value_delimiter = ',',
            default_value = "table,view,procedure,function,trigger"
        )]
        types: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Source,
    Target,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Source => Side::Source,
            SideArg::Target => Side::Target,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            config,
            types,
            log,
            concurrency,
        } => cmd_compare(config, types, log, concurrency).await,
        Commands::List {
            side,
            config,
            types,
        } => cmd_list(side.into(), config, types).await,
    }
}

async fn cmd_compare(
    config: Option<PathBuf>,
    types: Vec<String>,
    debug_logging: bool,
    concurrency: Option<usize>,
) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(settings) => settings,
        Err(code) => return code,
    };

    for (section, connection) in [("source", &settings.source), ("target", &settings.target)] {
        if let Err(code) = validate_connection(section, connection) {
            return code;
        }
    }

    let categories = parse_categories(&types);
    if categories.is_empty() {
        eprintln!(
            "{}",
            "No recognized object categories requested; nothing to compare".yellow()
        );
        return ExitCode::SUCCESS;
    }

    let pool_size = settings.compare.pool_size;
    let source = match connect(Side::Source, &settings.source, pool_size).await {
        Ok(repository) => repository,
        Err(code) => return code,
    };
    let target = match connect(Side::Target, &settings.target, pool_size).await {
        Ok(repository) => repository,
        Err(code) => return code,
    };

    if debug_logging {
        println!("{}", "Logging enabled".green());
    }

    let run_id = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();

    let mut options = CompareOptions::new(categories.clone(), run_id.clone());
    options.concurrency = concurrency.unwrap_or(settings.compare.concurrency);
    options.fetch_timeout = Duration::from_secs(settings.compare.fetch_timeout_secs);
    options.debug_logging = debug_logging;

    let source_db = source.database_name().to_string();
    let target_db = target.database_name().to_string();

    let engine = DiffEngine::new(source, target, options);
    let report = match engine.compare().await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", format!("Error during comparison: {e}").red());
            return ExitCode::FAILURE;
        }
    };

    let file_name = script_file_name(&source_db, &target_db, &categories, &run_id);
    if let Err(e) = ScriptWriter::new(&file_name).write(&report.outcomes) {
        eprintln!("{}", format!("Error writing output script: {e}").red());
        return ExitCode::FAILURE;
    }

    println!(
        "{}",
        format!(
            "Found {} differences in {} objects",
            report.differing(),
            report.source_total
        )
        .cyan()
    );
    if report.skipped > 0 {
        println!(
            "{}",
            format!("{} objects skipped due to fetch errors", report.skipped).yellow()
        );
    }
    println!(
        "{}",
        format!("Comparison completed. The results are in the '{file_name}' file").green()
    );

    ExitCode::SUCCESS
}

async fn cmd_list(side: Side, config: Option<PathBuf>, types: Vec<String>) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(settings) => settings,
        Err(code) => return code,
    };

    let connection = match side {
        Side::Source => &settings.source,
        Side::Target => &settings.target,
    };
    if let Err(code) = validate_connection(&side.to_string(), connection) {
        return code;
    }
    let repository = match connect(side, connection, settings.compare.pool_size).await {
        Ok(repository) => repository,
        Err(code) => return code,
    };

    let categories = parse_categories(&types);
    let objects = match repository.list_objects(&categories).await {
        Ok(objects) => objects,
        Err(e) => {
            eprintln!(
                "{}",
                format!("Error listing objects from the {side} database: {e}").red()
            );
            return ExitCode::FAILURE;
        }
    };

    for object in &objects {
        println!("{object}");
    }
    println!(
        "{}",
        format!(
            "{} objects in the {} database ({})",
            objects.len(),
            side,
            repository.database_name()
        )
        .cyan()
    );

    ExitCode::SUCCESS
}

fn load_settings(config: Option<PathBuf>) -> Result<Settings, ExitCode> {
    match Settings::load(config.as_deref()) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            eprintln!("{}", format!("Error loading configuration: {e}").red());
            Err(ExitCode::FAILURE)
        }
    }
}

fn validate_connection(section: &str, connection: &ConnectionSettings) -> Result<(), ExitCode> {
    connection.validate(section).map_err(|e| {
        eprintln!("{}", format!("Error loading configuration: {e}").red());
        ExitCode::FAILURE
    })
}

async fn connect(
    side: Side,
    connection: &ConnectionSettings,
    pool_size: usize,
) -> Result<Arc<dyn ObjectRepository>, ExitCode> {
    match MsSqlRepository::connect(connection, pool_size).await {
        Ok(repository) => {
            println!(
                "{}",
                format!("Successfully connected to {side} database").green()
            );
            Ok(Arc::new(repository))
        }
        Err(e) => {
            eprintln!(
                "{}",
                format!("Error connecting to {side} database: {e}").red()
            );
            Err(ExitCode::FAILURE)
        }
    }
}
