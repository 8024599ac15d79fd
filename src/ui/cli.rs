// Command-line interface definitions and parsing for gridprobe

use crate::config::CliConfig;
use crate::core::constants::output_formats;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    // Output & Verbosity
    /// Suppress progress output and logging
    #[arg(short = 'q', long, global = true, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Output format
    #[arg(
        long,
        global = true,
        value_name = "FORMAT",
        value_parser = output_formats::ALL,
        help_heading = "Output & Verbosity"
    )]
    pub format: Option<String>,

    // Configuration
    /// Use specific config file
    #[arg(long, global = true, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, global = true, help_heading = "Configuration")]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare aFRR activation with imbalance volumes for one day
    Balancing {
        /// Day to analyse (YYYY-MM-DD)
        date: String,

        /// Output time zone requested from the API (default: EET)
        #[arg(long, value_name = "TZ")]
        timezone: Option<String>,

        /// Directory for the chart PNG (default: current directory)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<String>,

        /// Skip rendering the chart
        #[arg(long)]
        no_plot: bool,

        /// Export API endpoint
        #[arg(long, value_name = "URL", help_heading = "Network")]
        api_url: Option<String>,

        /// Request timeout in seconds (default: 20)
        #[arg(short = 't', long, value_name = "SECONDS", help_heading = "Network")]
        timeout: Option<u64>,

        /// Retry attempts for failed requests (default: 0)
        #[arg(long, value_name = "COUNT", help_heading = "Network")]
        retry: Option<u8>,

        /// Delay between retries in ms (default: 1000)
        #[arg(long, value_name = "MS", help_heading = "Network")]
        retry_delay: Option<u64>,

        /// Custom User-Agent header
        #[arg(long, value_name = "AGENT", help_heading = "Network")]
        user_agent: Option<String>,

        /// HTTP/HTTPS proxy URL
        #[arg(long, value_name = "URL", help_heading = "Network")]
        proxy: Option<String>,

        /// Rows of the current balancing state to preview (default: 5)
        #[arg(long, value_name = "ROWS")]
        preview_rows: Option<usize>,
    },
    /// Inspect a CGMES equipment XML model
    Cgmes {
        /// Path to the EQ profile XML file
        file: String,

        /// rdf:ID of the transformer whose windings are reported
        #[arg(long, value_name = "ID")]
        transformer_id: Option<String>,

        /// Display label of that transformer
        #[arg(long, value_name = "LABEL")]
        transformer_label: Option<String>,

        /// Line whose operational limits are reported
        #[arg(long, value_name = "NAME")]
        line_name: Option<String>,

        /// Skip the verification pass
        #[arg(long)]
        skip_verify: bool,
    },
    /// Generate shell completions
    #[command(arg_required_else_help = true)]
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Collect the flags that override configuration values
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    let mut cli_config = CliConfig {
        quiet: cli.quiet,
        verbose: cli.verbose,
        output_format: cli.format.clone(),
        config_file: non_empty(&cli.config),
        no_config: cli.no_config,
        ..CliConfig::default()
    };

    match &cli.command {
        Commands::Balancing {
            timezone,
            output_dir,
            no_plot,
            api_url,
            timeout,
            retry,
            retry_delay,
            user_agent,
            proxy,
            preview_rows,
            ..
        } => {
            cli_config.timezone = non_empty(timezone);
            cli_config.output_dir = non_empty(output_dir);
            cli_config.no_plot = *no_plot;
            cli_config.api_url = non_empty(api_url);
            cli_config.timeout = *timeout;
            cli_config.retry_attempts = *retry;
            cli_config.retry_delay = *retry_delay;
            cli_config.user_agent = non_empty(user_agent);
            cli_config.proxy = non_empty(proxy);
            cli_config.preview_rows = *preview_rows;
        }
        Commands::Cgmes {
            transformer_id,
            transformer_label,
            line_name,
            ..
        } => {
            cli_config.transformer_id = non_empty(transformer_id);
            cli_config.transformer_label = non_empty(transformer_label);
            cli_config.line_name = non_empty(line_name);
        }
        Commands::Completions { .. } => {}
    }

    cli_config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gridprobe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_to_config_default() {
        let cli = parse(&["balancing", "2025-09-22"]);
        let config = cli_to_config(&cli);

        assert_eq!(config.timeout, None);
        assert_eq!(config.retry_attempts, None);
        assert_eq!(config.api_url, None);
        assert_eq!(config.output_format, None);
        assert!(!config.no_plot);
        assert!(!config.quiet);
        assert!(!config.verbose);
        assert!(!config.no_config);
    }

    #[test]
    fn test_cli_to_config_balancing_options() {
        let cli = parse(&[
            "balancing",
            "2025-09-22",
            "--timezone",
            "UTC",
            "--output-dir",
            "charts",
            "--no-plot",
            "--api-url",
            "http://localhost:1234/export",
            "--timeout",
            "5",
            "--retry",
            "2",
            "--retry-delay",
            "10",
            "--user-agent",
            "probe/1.0",
            "--proxy",
            "http://proxy:8080",
            "--preview-rows",
            "3",
            "--format",
            "json",
            "-v",
        ]);
        let config = cli_to_config(&cli);

        assert_eq!(config.timezone.as_deref(), Some("UTC"));
        assert_eq!(config.output_dir.as_deref(), Some("charts"));
        assert!(config.no_plot);
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:1234/export"));
        assert_eq!(config.timeout, Some(5));
        assert_eq!(config.retry_attempts, Some(2));
        assert_eq!(config.retry_delay, Some(10));
        assert_eq!(config.user_agent.as_deref(), Some("probe/1.0"));
        assert_eq!(config.proxy.as_deref(), Some("http://proxy:8080"));
        assert_eq!(config.preview_rows, Some(3));
        assert_eq!(config.output_format.as_deref(), Some("json"));
        assert!(config.verbose);
    }

    #[test]
    fn test_cli_to_config_cgmes_options() {
        let cli = parse(&[
            "--quiet",
            "cgmes",
            "model.xml",
            "--transformer-id",
            "_abc",
            "--transformer-label",
            "BE_TR1",
            "--line-name",
            "BE-Line_1",
            "--skip-verify",
        ]);
        let config = cli_to_config(&cli);

        assert!(config.quiet);
        assert_eq!(config.transformer_id.as_deref(), Some("_abc"));
        assert_eq!(config.transformer_label.as_deref(), Some("BE_TR1"));
        assert_eq!(config.line_name.as_deref(), Some("BE-Line_1"));
        match cli.command {
            Commands::Cgmes { file, skip_verify, .. } => {
                assert_eq!(file, "model.xml");
                assert!(skip_verify);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_to_config_whitespace_trimming() {
        let cli = parse(&[
            "cgmes",
            "m.xml",
            "--line-name",
            "  NL-Line_5  ",
            "--transformer-id",
            "   ",
        ]);
        let config = cli_to_config(&cli);

        assert_eq!(config.line_name.as_deref(), Some("NL-Line_5"));
        assert_eq!(config.transformer_id, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["cgmes", "m.xml", "--no-config", "--config", "x.toml"]);
        let config = cli_to_config(&cli);
        assert!(config.no_config);
        assert_eq!(config.config_file.as_deref(), Some("x.toml"));
    }

    #[test]
    fn test_rejects_unknown_format() {
        let result = Cli::try_parse_from(["gridprobe", "--format", "xml", "cgmes", "m.xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["gridprobe"]).is_err());
    }
}
