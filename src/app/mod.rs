//! Application layer: resolved run settings and the run orchestrator.

mod config;
mod runner;

pub use config::{
    DEFAULT_KEYWORDS, DEFAULT_MAX_PAGES, DEFAULT_RATE_LIMIT_MS, DEFAULT_ZIP_CODE, FileConfig,
    LoadedConfig, RunConfig, VerbositySetting, load_default_file_config, load_file_config,
    parse_config_str, resolve_default_config_path,
};
pub use runner::{RunReport, collect_listings, run, run_with_source};
