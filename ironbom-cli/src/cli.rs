//! Command-line argument definitions (clap derive)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Ironbom -- SBOM ingestion tool
///
/// Reads CycloneDX, SPDX and Syft documents from files, directories or stdin
/// and reports the package URLs and licenses they declare.
#[derive(Parser, Debug)]
#[command(name = "ironbom", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "ironbom.toml")]
    pub config: PathBuf,

    /// Override the configured log level
    #[arg(
        long,
        global = true,
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output rendering format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load SBOM documents and list their packages and licenses
    Scan(ScanArgs),
    /// Inspect or validate the configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Files, directories, or `-` for stdin
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Newline-delimited list of vulnerability IDs to ignore
    #[arg(long)]
    pub ignore_file: Option<String>,

    /// YAML suppression document (.snyk style)
    #[arg(long)]
    pub suppression_file: Option<String>,

    /// Maximum size of a single input in bytes
    #[arg(long)]
    pub max_file_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file
    Validate,
    /// Show the effective configuration (file + env overrides + defaults)
    Show {
        /// Only show one section (general, loader)
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_with_multiple_inputs() {
        let cli = Cli::try_parse_from(["ironbom", "scan", "bom.json", "sboms/", "-"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.inputs, vec!["bom.json", "sboms/", "-"]);
                assert!(args.ignore_file.is_none());
                assert!(args.suppression_file.is_none());
                assert!(args.max_file_size.is_none());
            }
            _ => panic!("expected scan command"),
        }
    }

    #[test]
    fn test_scan_requires_an_input() {
        assert!(Cli::try_parse_from(["ironbom", "scan"]).is_err());
    }

    #[test]
    fn test_scan_with_ignore_and_suppression_files() {
        let cli = Cli::try_parse_from([
            "ironbom",
            "scan",
            "bom.xml",
            "--ignore-file",
            ".ironbom-ignore",
            "--suppression-file",
            ".snyk",
            "--max-file-size",
            "1024",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.ignore_file.as_deref(), Some(".ironbom-ignore"));
                assert_eq!(args.suppression_file.as_deref(), Some(".snyk"));
                assert_eq!(args.max_file_size, Some(1024));
            }
            _ => panic!("expected scan command"),
        }
    }

    #[test]
    fn test_default_config_path_and_output() {
        let cli = Cli::try_parse_from(["ironbom", "scan", "bom.json"]).expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("ironbom.toml"));
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ironbom",
            "scan",
            "bom.json",
            "--output",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let result = Cli::try_parse_from(["ironbom", "--log-level", "verbose", "scan", "a"]);
        assert!(result.is_err(), "unknown log level should be rejected");
    }

    #[test]
    fn test_config_show_with_section() {
        let cli = Cli::try_parse_from(["ironbom", "config", "show", "--section", "loader"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Show { section },
            }) => assert_eq!(section.as_deref(), Some("loader")),
            _ => panic!("expected config show"),
        }
    }

    #[test]
    fn test_config_validate() {
        let cli = Cli::try_parse_from(["ironbom", "-c", "/etc/ironbom.toml", "config", "validate"])
            .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/etc/ironbom.toml"));
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                action: ConfigAction::Validate
            })
        ));
    }
}
