//! Command-line interface

use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

/// Exit code used when the specification path is missing
pub const USAGE_EXIT_CODE: u8 = 128;

#[derive(Debug, Default, Parser)]
#[command(
    name = "swagger-preview",
    version,
    about = "Preview a local OpenAPI/Swagger document in Swagger UI",
    override_usage = "swagger-preview [OPTIONS] {path/to/dir/containing/swagger.yml | path/to/swagger.yml}"
)]
pub struct Cli {
    /// Directory of specification files, or a single specification file
    pub target: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'l', value_name = "ADDR")]
    pub listen: Option<String>,

    /// Verbose logging (-vv)
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Re-download the Swagger UI bundle
    #[arg(short = 'u')]
    pub update: bool,

    /// Configuration file (defaults to ./swagger-preview.toml when present)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Usage text printed when no target is given
    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "swagger-preview",
            "-l",
            "127.0.0.1:9000",
            "-vv",
            "-u",
            "specs",
        ])
        .unwrap();

        assert_eq!(cli.listen.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(cli.verbose, 2);
        assert!(cli.update);
        assert_eq!(cli.target, Some(PathBuf::from("specs")));
    }

    #[test]
    fn test_target_is_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["swagger-preview"]).unwrap();
        assert!(cli.target.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(Cli::usage().contains("swagger-preview [OPTIONS]"));
    }
}
