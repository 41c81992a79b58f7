//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;
use scout_core::app::{RunConfig, VerbositySetting};

/// Scrape marketplace listings for Prusa printers and upgrades.
///
/// Each keyword is searched near the given postal code. Listings are
/// classified, summarized and written as JSON under the output directory.
#[derive(Parser, Debug)]
#[command(name = "prusa-scout")]
#[command(author, version, about)]
pub struct Args {
    /// Search keywords (defaults to the four Prusa model searches)
    pub keywords: Vec<String>,

    /// Postal code to search near
    #[arg(short = 'z', long)]
    pub zip_code: Option<String>,

    /// Maximum result pages per keyword (1-100)
    #[arg(short = 'p', long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub max_pages: Option<u32>,

    /// Listings per emitted batch (1-10000)
    #[arg(short = 'b', long, value_parser = clap::value_parser!(u64).range(1..=10000))]
    pub batch_size: Option<u64>,

    /// Directory for current and historical JSON output
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Minimum delay between requests in milliseconds (0 to disable, max 60000)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub rate_limit: Option<u64>,

    /// Attempts per page before giving up (1-10)
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_retries: Option<u32>,

    /// Request timeout in seconds (1-3600)
    #[arg(short = 't', long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Log filter used when `RUST_LOG` is unset. Flags win over the file's
    /// `verbosity`.
    #[must_use]
    pub fn default_log_level(&self, file: Option<VerbositySetting>) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => file.map_or("info", VerbositySetting::filter_directive),
            1 => "debug",
            _ => "trace",
        }
    }

    /// Overlays every flag the user passed on `base`.
    #[must_use]
    pub fn apply(&self, mut base: RunConfig) -> RunConfig {
        if !self.keywords.is_empty() {
            base.keywords.clone_from(&self.keywords);
        }
        if let Some(zip_code) = &self.zip_code {
            base.zip_code.clone_from(zip_code);
        }
        if let Some(output_dir) = &self.output_dir {
            base.output_dir.clone_from(output_dir);
        }
        if let Some(batch_size) = self.batch_size {
            base.batch_size = usize::try_from(batch_size).unwrap_or(base.batch_size);
        }
        base.max_pages = self.max_pages.unwrap_or(base.max_pages);
        base.rate_limit_ms = self.rate_limit.unwrap_or(base.rate_limit_ms);
        base.max_retries = self.max_retries.unwrap_or(base.max_retries);
        base.timeout_secs = self.timeout.unwrap_or(base.timeout_secs);
        base
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["prusa-scout"]).unwrap();
        assert!(args.keywords.is_empty());
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(args.max_pages.is_none());
    }

    #[test]
    fn test_cli_positional_keywords() {
        let args = Args::try_parse_from(["prusa-scout", "Prusa MK4", "Prusa XL"]).unwrap();
        assert_eq!(args.keywords, vec!["Prusa MK4", "Prusa XL"]);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["prusa-scout", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["prusa-scout", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_verbose_and_quiet_conflict() {
        let err = Args::try_parse_from(["prusa-scout", "-v", "-q"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["prusa-scout", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["prusa-scout", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_unknown_flag_rejected() {
        let err = Args::try_parse_from(["prusa-scout", "--concurrency", "4"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_max_pages_range() {
        let args = Args::try_parse_from(["prusa-scout", "--max-pages", "100"]).unwrap();
        assert_eq!(args.max_pages, Some(100));

        let err = Args::try_parse_from(["prusa-scout", "--max-pages", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let err = Args::try_parse_from(["prusa-scout", "-p", "101"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_rate_limit_zero_allowed() {
        let args = Args::try_parse_from(["prusa-scout", "-l", "0"]).unwrap();
        assert_eq!(args.rate_limit, Some(0));

        let err = Args::try_parse_from(["prusa-scout", "-l", "60001"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_max_retries_range() {
        let err = Args::try_parse_from(["prusa-scout", "--max-retries", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_non_numeric_timeout_rejected() {
        let err = Args::try_parse_from(["prusa-scout", "--timeout", "soon"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_apply_overrides_only_given_flags() {
        let args =
            Args::try_parse_from(["prusa-scout", "Prusa XL", "-z", "10001", "-b", "20"]).unwrap();
        let cfg = args.apply(RunConfig::default());
        assert_eq!(cfg.keywords, vec!["Prusa XL"]);
        assert_eq!(cfg.zip_code, "10001");
        assert_eq!(cfg.batch_size, 20);
        assert_eq!(cfg.max_pages, 2);
    }

    #[test]
    fn test_apply_without_keywords_keeps_defaults() {
        let args = Args::try_parse_from(["prusa-scout"]).unwrap();
        let cfg = args.apply(RunConfig::default());
        assert_eq!(cfg, RunConfig::default());
    }

    #[test]
    fn test_default_log_level_precedence() {
        let args = Args::try_parse_from(["prusa-scout"]).unwrap();
        assert_eq!(args.default_log_level(None), "info");
        assert_eq!(args.default_log_level(Some(VerbositySetting::Quiet)), "error");

        let args = Args::try_parse_from(["prusa-scout", "-v"]).unwrap();
        assert_eq!(args.default_log_level(Some(VerbositySetting::Quiet)), "debug");

        let args = Args::try_parse_from(["prusa-scout", "-q"]).unwrap();
        assert_eq!(args.default_log_level(Some(VerbositySetting::Debug)), "error");
    }
}
