use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info, Instrument};

use retail_cleaner::app::CleanDatasetUseCase;
use retail_cleaner::config::Config;
use retail_cleaner::infra::{self, json_store};
use retail_cleaner::logging;
use retail_cleaner::pipeline::processing::datasets::CleanerRegistry;

#[derive(Parser)]
#[command(name = "retail-cleaner")]
#[command(about = "Cleans raw retail extracts into typed, validated tables")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean one dataset extract
    Clean {
        /// Dataset variant. Available: user, card, store, product, orders, events
        #[arg(long)]
        dataset: String,
        /// Input file (.json or .csv)
        #[arg(long)]
        input: PathBuf,
        /// Output file (.json or .csv); the report goes to <output>.report.json
        #[arg(long)]
        output: PathBuf,
        /// Config file (defaults to $RETAIL_CLEANER_CONFIG or ./cleaner.toml)
        #[arg(long)]
        config: Option<String>,
    },
    /// List dataset variants and the active configuration
    Datasets {
        #[arg(long)]
        config: Option<String>,
    },
}

fn load_config(path: Option<&str>) -> retail_cleaner::error::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_clean(
    dataset: &str,
    input: PathBuf,
    output: PathBuf,
    config: Config,
) -> anyhow::Result<()> {
    let source = infra::source_for_path(&input)?;
    let sink = infra::sink_for_path(&output, config.output.pretty_json)?;
    let sample_size = config.report.sample_size;
    let pretty = config.output.pretty_json;

    let use_case = CleanDatasetUseCase::with_default_registry(source, sink, config);
    info!("Starting cleaning run");
    let report = use_case.run(dataset).await?;

    let report_path = json_store::report_path_for(&output);
    json_store::write_report(&report_path, &report, pretty).await?;

    println!("\n📊 Cleaning Results for {}:", dataset);
    println!("   Input rows: {}", report.input_rows);
    println!("   Output rows: {}", report.output_rows);
    println!("   Rejected: {}", report.rejected_count());
    println!("   Coerced to missing: {}", report.unparseable_count());
    for summary in report.summary(sample_size) {
        println!(
            "   - {}: {} rejected, {} unparseable {:?}",
            summary.column, summary.rejected, summary.unparseable, summary.samples
        );
    }
    println!("   Output file: {}", output.display());
    println!("   Report file: {}", report_path.display());

    Ok(())
}

fn print_datasets(config: &Config) {
    let registry = CleanerRegistry::new();

    println!("📋 Dataset variants:");
    for name in registry.list_datasets() {
        let Some(cleaner) = registry.get_cleaner(name) else {
            continue;
        };
        let profile = cleaner.profile();
        println!("\n  {}", profile.name);
        println!("    required columns: {}", profile.required_columns.join(", "));
        if !profile.obsolete_columns.is_empty() {
            println!("    dropped columns: {}", profile.obsolete_columns.join(", "));
        }
        if !profile.date_columns.is_empty() {
            println!("    date columns: {}", profile.date_columns.join(", "));
        }
        for rule in profile.categorical {
            println!("    {} ∈ {{{}}}", rule.column, rule.vocabulary.values.join(", "));
        }
        println!("    \"NULL\" treated as missing: {}", profile.normalize_null_markers);
    }

    println!("\n⚙️  Weight settings:");
    println!(
        "   correction: values < {} kg × {}",
        config.weight.correction_threshold_kg, config.weight.correction_factor
    );
    println!("   on failure: {:?}", config.weight.on_failure);
    println!("   on malformed: {:?}", config.weight.on_malformed);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean {
            dataset,
            input,
            output,
            config,
        } => {
            println!("🧹 Cleaning {} from {}...", dataset, input.display());

            let config = load_config(config.as_deref())?;
            let span = tracing::info_span!("Running dataset", dataset = %dataset);
            match run_clean(&dataset, input, output, config).instrument(span).await {
                Ok(()) => println!("✅ Cleaning run completed successfully"),
                Err(e) => {
                    error!("Cleaning run failed: {:#}", e);
                    println!("❌ Cleaning run failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Datasets { config } => {
            let config = load_config(config.as_deref())?;
            print_datasets(&config);
        }
    }

    Ok(())
}
