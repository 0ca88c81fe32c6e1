use clap::Parser;
use tech_hours::config::toml_config::TomlConfig;
use tech_hours::core::{reader, ConfigProvider, Storage};
use tech_hours::utils::{logger, validation::Validate};
use tech_hours::{EtlEngine, HoursPipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Technician hours report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "hours-config.toml")]
    config: String,

    /// Extra input files, appended to [input].files
    inputs: Vec<String>,

    /// Override [load].output_path
    #[arg(long)]
    output_path: Option<String>,

    /// Keep roster order instead of sorting by total hours
    #[arg(long)]
    no_sort: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Dry run - check inputs against the column mapping without writing a report
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based hours report");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    config.input.files.extend(args.inputs.iter().cloned());
    if let Some(output_path) = &args.output_path {
        config.load.output_path = output_path.clone();
        tracing::info!("🔧 Output path overridden to: {}", output_path);
    }
    if args.no_sort {
        config.report.sort_by_hours_descending = false;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No report will be written");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    let source = LocalStorage::new(String::new());
    let sink = LocalStorage::new(config.output_path().to_string());
    let pipeline = HoursPipeline::new(source, sink, config);

    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Report completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Report completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Chart: {}", config.chart_title());
    println!("  Roster: {} technicians", config.roster().len());
    println!("  Inputs: {}", config.input_files().len());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Sort by hours: {}", config.sort_by_hours_descending());

    if config.bundle_outputs() {
        println!("  Bundle: ZIP");
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
}

async fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let storage = LocalStorage::new(String::new());
    let columns = config.columns();

    println!("🔍 Dry Run Analysis:");
    for path in config.input_files() {
        let dataset = match storage.read_file(path).await {
            Ok(bytes) => reader::read_dataset(path, &bytes),
            Err(e) => Err(e),
        };

        match dataset {
            Ok(dataset) => {
                let missing: Vec<&str> = columns
                    .required()
                    .into_iter()
                    .filter(|c| dataset.column_index(c).is_none())
                    .collect();
                if missing.is_empty() {
                    println!("  ✅ {}: {} rows", path, dataset.rows.len());
                } else {
                    println!("  ⚠️  {}: missing columns {:?}", path, missing);
                }
            }
            Err(e) => println!("  ❌ {}: {}", path, e),
        }
    }

    println!("✅ Dry run completed - configuration appears valid");
    Ok(())
}
