//! Run configuration: built-in defaults, optional config file, and the
//! resolved settings a run executes with.
//!
//! The config file is a flat `key = value` subset of TOML:
//!
//! ```toml
//! keywords = "Prusa MK4, Prusa MINI"
//! zip_code = "73120"
//! max_pages = 3
//! output_dir = "public/data"
//! rate_limit = 1500   # milliseconds
//! verbosity = "verbose"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};

use crate::extract::DEFAULT_BATCH_SIZE;
use crate::fetch::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS, FetchConfig};
use crate::persist::DEFAULT_OUTPUT_DIR;

/// Searches run when none are given.
pub const DEFAULT_KEYWORDS: [&str; 4] = ["Prusa MK3S", "Prusa MK4", "Prusa MINI", "Prusa Core One"];

/// Postal code searched near by default.
pub const DEFAULT_ZIP_CODE: &str = "73120";

/// Pages fetched per keyword by default.
pub const DEFAULT_MAX_PAGES: u32 = 2;

/// Default spacing between requests in milliseconds.
pub const DEFAULT_RATE_LIMIT_MS: u64 = 1000;

const APP_DIR: &str = "prusa-scout";

/// Values read from the config file. Every field is optional; unset fields
/// fall back to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Search keywords, comma-separated in the file.
    pub keywords: Option<Vec<String>>,
    pub zip_code: Option<String>,
    pub max_pages: Option<u32>,
    pub batch_size: Option<usize>,
    pub output_dir: Option<PathBuf>,
    /// Milliseconds between requests to the same host; 0 disables pacing.
    pub rate_limit: Option<u64>,
    pub max_retries: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Checks values against the same ranges the command line accepts.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-range key.
    pub fn validate(&self) -> Result<()> {
        if let Some(keywords) = &self.keywords
            && keywords.is_empty()
        {
            bail!("Invalid config value for `keywords`: expected at least one keyword");
        }
        if let Some(zip_code) = &self.zip_code
            && zip_code.trim().is_empty()
        {
            bail!("Invalid config value for `zip_code`: must not be empty");
        }
        validate_range("max_pages", self.max_pages.map(u64::from), 1, 100)?;
        validate_range("batch_size", self.batch_size.map(|v| v as u64), 1, 10_000)?;
        validate_range("rate_limit", self.rate_limit, 0, 60_000)?;
        validate_range("max_retries", self.max_retries.map(u64::from), 1, 10)?;
        validate_range("timeout_secs", self.timeout_secs, 1, 3600)?;
        Ok(())
    }
}

fn validate_range(field: &str, value: Option<u64>, min: u64, max: u64) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(min..=max).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: {min}..={max}");
    }
    Ok(())
}

/// Verbosity labels accepted in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Log filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Debug => "trace",
        }
    }
}

/// Result of looking for the default config file.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Where the file was looked for, if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed config when the file exists.
    pub config: Option<FileConfig>,
}

/// Default config path: `$XDG_CONFIG_HOME/prusa-scout/config.toml`, else
/// `$HOME/.config/prusa-scout/config.toml`.
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg) = env_var_non_empty("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join(APP_DIR).join("config.toml"));
    }
    let home = env_var_non_empty("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join("config.toml"),
    )
}

fn env_var_non_empty(name: &str) -> Option<std::ffi::OsString> {
    env::var_os(name).filter(|value| !value.is_empty())
}

/// Loads the default config file if it exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, parsed or
/// validated.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(p) if p.exists() => Some(load_file_config(p)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

/// Loads and validates a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, contains unknown keys or
/// malformed values, or fails validation.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

/// Parses config text.
///
/// # Errors
///
/// Returns an error on syntax errors, unknown keys, bad values or failed
/// validation.
pub fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();

    for (index, raw_line) in raw.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };
        let (key, value) = (key.trim(), value.trim());
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "keywords" => {
                let list = parse_string_literal(value).with_context(invalid)?;
                cfg.keywords = Some(
                    list.split(',')
                        .map(str::trim)
                        .filter(|k| !k.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            }
            "zip_code" => cfg.zip_code = Some(parse_string_literal(value).with_context(invalid)?),
            "max_pages" => cfg.max_pages = Some(parse_integer(value).with_context(invalid)?),
            "batch_size" => cfg.batch_size = Some(parse_integer(value).with_context(invalid)?),
            "output_dir" => {
                cfg.output_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "rate_limit" => cfg.rate_limit = Some(parse_integer(value).with_context(invalid)?),
            "max_retries" => cfg.max_retries = Some(parse_integer(value).with_context(invalid)?),
            "timeout_secs" => cfg.timeout_secs = Some(parse_integer(value).with_context(invalid)?),
            "verbosity" => {
                let label = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&label).with_context(invalid)?);
            }
            unknown => bail!("Unknown configuration key: '{unknown}' on line {line_no}"),
        }
    }

    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(value: &str) -> Result<String> {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Expected double-quoted string"))
}

fn parse_integer<T>(value: &str) -> Result<T>
where
    T: TryFrom<u64>,
{
    let parsed: u64 = value
        .parse()
        .map_err(|_| anyhow!("Expected non-negative integer, got '{value}'"))?;
    T::try_from(parsed).map_err(|_| anyhow!("Integer value {parsed} out of range"))
}

fn parse_verbosity(label: &str) -> Result<VerbositySetting> {
    match label {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        other => bail!("Unknown verbosity '{other}'. Expected default, verbose, quiet or debug"),
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// One search sweep per keyword, in order.
    pub keywords: Vec<String>,
    pub zip_code: String,
    /// Upper bound on pages per keyword.
    pub max_pages: u32,
    pub batch_size: usize,
    /// Root of the output layout.
    pub output_dir: PathBuf,
    /// Milliseconds between requests to the same host; 0 disables pacing.
    pub rate_limit_ms: u64,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            zip_code: DEFAULT_ZIP_CODE.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            batch_size: DEFAULT_BATCH_SIZE,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RunConfig {
    /// Overlays every value set in `file`.
    #[must_use]
    pub fn with_file(mut self, file: &FileConfig) -> Self {
        if let Some(keywords) = &file.keywords {
            self.keywords.clone_from(keywords);
        }
        if let Some(zip_code) = &file.zip_code {
            self.zip_code.clone_from(zip_code);
        }
        if let Some(output_dir) = &file.output_dir {
            self.output_dir.clone_from(output_dir);
        }
        self.max_pages = file.max_pages.unwrap_or(self.max_pages);
        self.batch_size = file.batch_size.unwrap_or(self.batch_size);
        self.rate_limit_ms = file.rate_limit.unwrap_or(self.rate_limit_ms);
        self.max_retries = file.max_retries.unwrap_or(self.max_retries);
        self.timeout_secs = file.timeout_secs.unwrap_or(self.timeout_secs);
        self
    }

    /// HTTP client settings for the default search endpoint.
    #[must_use]
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.timeout_secs),
            request_delay: Duration::from_millis(self.rate_limit_ms),
            max_retries: self.max_retries,
            ..FetchConfig::default()
        }
    }
}
