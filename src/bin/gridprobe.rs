use clap::Parser;
use gridprobe::balancing::{self, BalancingOptions, ExportClient};
use gridprobe::cgmes::{self, CgmesDocument, CgmesOptions};
use gridprobe::config::{CliConfig, Config};
use gridprobe::core::error::Result;
use gridprobe::reporting::logging;
use gridprobe::ui::report;
use gridprobe::ui::{Cli, Commands, ProgressReporter, cli_to_config, print_completions};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle completion commands first
    if let Commands::Completions { shell } = cli.command {
        print_completions(shell);
        return;
    }

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let cli_config = cli_to_config(cli);
    let config = load_and_merge_config(&cli_config)?;

    logging::init_logger(config.is_verbose(), cli_config.quiet);
    logging::log_config_info(&config);

    match cli.command {
        Commands::Balancing { ref date, .. } => {
            run_balancing(date, &config, cli_config.quiet).await
        }
        Commands::Cgmes {
            ref file,
            skip_verify,
            ..
        } => run_cgmes(file, skip_verify, &config),
        Commands::Completions { .. } => Ok(()),
    }
}

/// Resolve the config file (or defaults), apply CLI overrides and validate
fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file)?
    } else {
        Config::load_from_standard_locations()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}

async fn run_balancing(raw_date: &str, config: &Config, quiet: bool) -> Result<()> {
    let date = balancing::parse_date(raw_date)?;
    let options = BalancingOptions::from_config(config);
    if let Some(ref dir) = options.chart_dir {
        std::fs::create_dir_all(dir)?;
    }

    let client = ExportClient::from_config(config)?;
    let progress = ProgressReporter::for_terminal(quiet, config.is_json());

    let outcome = balancing::analyze_day(&client, date, &options, Some(&progress)).await?;
    report::display_day_outcome(&outcome, config.is_json())
}

fn run_cgmes(file: &str, skip_verify: bool, config: &Config) -> Result<()> {
    let doc = CgmesDocument::load(file)?;
    let options = CgmesOptions::from_config(config);
    let analysis = cgmes::definitive_analysis(&doc, &options)?;
    logging::log_scan(&analysis);

    let verification = if skip_verify {
        None
    } else {
        Some(cgmes::verify_specific_values(&doc, &options)?)
    };

    report::display_cgmes(&analysis, verification.as_ref(), config.is_json())
}
