//! Process-wide configuration via `doctree.toml` or environment variables
//!
//! Configuration is read once, on first use, and never changes afterwards.
//! The first of these wins:
//!
//! 1. A configuration handed to [`install`] before anything else ran
//! 2. `DOCTREE_*` environment variables layered over the defaults
//!
//! Configuration files are loaded explicitly with [`Config::from_file`] and
//! then installed.

use crate::error::{Error, Result};
use crate::limits::{Limits, MAX_NESTING_DEPTH, MAX_PAD_INDEX};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, warn};

/// Config file name conventionally used for doctree settings
pub const CONFIG_FILE_NAME: &str = "doctree.toml";

/// Default format used when dates are rendered as text
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Default capacity of the date conversion caches
pub const DEFAULT_CACHE_SIZE: usize = 1024;

static GLOBAL: OnceCell<Config> = OnceCell::new();

/// Time zone used to interpret and render dates without an explicit offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneSetting {
    /// The host's local time zone
    Local,
    /// A fixed UTC offset (`UTC` is a zero offset)
    Fixed(FixedOffset),
}

impl ZoneSetting {
    /// Parse `"local"`, `"UTC"`/`"Z"`, or a numeric offset such as `"+02:00"`
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(ZoneSetting::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc")
            || trimmed.eq_ignore_ascii_case("gmt")
            || trimmed == "Z"
        {
            return Ok(ZoneSetting::Fixed(utc_offset()));
        }
        parse_offset(trimmed)
            .map(ZoneSetting::Fixed)
            .ok_or_else(|| Error::Config(format!("Unrecognized time zone '{}'", text)))
    }

    /// Interpret a wall-clock time in this zone
    ///
    /// Ambiguous local times resolve to the earliest instant; times that do
    /// not exist in the zone (DST gaps) yield `None`.
    pub fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            ZoneSetting::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|d| d.with_timezone(&Utc)),
            ZoneSetting::Fixed(offset) => offset
                .from_local_datetime(naive)
                .single()
                .map(|d| d.with_timezone(&Utc)),
        }
    }

    /// Render an instant in this zone with a strftime-style format
    ///
    /// Returns `None` when the format contains an invalid specifier.
    pub fn format(&self, instant: &DateTime<Utc>, format: &str) -> Option<String> {
        let mut out = String::new();
        let written = match self {
            ZoneSetting::Local => write!(out, "{}", instant.with_timezone(&Local).format(format)),
            ZoneSetting::Fixed(offset) => {
                write!(out, "{}", instant.with_timezone(offset).format(format))
            }
        };
        written.ok().map(|_| out)
    }
}

fn utc_offset() -> FixedOffset {
    // Zero is always in range
    FixedOffset::east_opt(0).unwrap_or_else(|| Utc.fix())
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Configuration loaded from `doctree.toml`, the environment, or code
///
/// # Example
///
/// ```toml
/// time_zone = "UTC"
/// timestamp_format = "%Y-%m-%dT%H:%M:%S%.3f%:z"
/// use_timestamps = true
/// cache_size = 1024
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Zone for dates without an explicit offset: `"local"`, `"UTC"` or `"+hh:mm"`
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// strftime-style format used when rendering dates as text
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    /// Render dates as formatted text (`true`) or epoch milliseconds (`false`)
    #[serde(default = "default_use_timestamps")]
    pub use_timestamps: bool,
    /// Capacity of each date conversion cache
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
    /// Maximum number of idle scratch buffers each codec keeps
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Maximum nesting depth accepted by readers
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
    /// Largest list index a write may pad up to
    #[serde(default = "default_max_pad_index")]
    pub max_pad_index: usize,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

fn default_use_timestamps() -> bool {
    true
}

fn default_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}

fn default_pool_size() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (cpus + 1) * 2
}

fn default_max_nesting_depth() -> usize {
    MAX_NESTING_DEPTH
}

fn default_max_pad_index() -> usize {
    MAX_PAD_INDEX
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            timestamp_format: default_timestamp_format(),
            use_timestamps: default_use_timestamps(),
            cache_size: default_cache_size(),
            pool_size: default_pool_size(),
            max_nesting_depth: default_max_nesting_depth(),
            max_pad_index: default_max_pad_index(),
        }
    }
}

impl Config {
    /// Set the time zone (builder pattern)
    pub fn with_time_zone(mut self, zone: impl Into<String>) -> Self {
        self.time_zone = zone.into();
        self
    }

    /// Set the timestamp format (builder pattern)
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Choose formatted text or epoch milliseconds for dates (builder pattern)
    pub fn with_use_timestamps(mut self, use_timestamps: bool) -> Self {
        self.use_timestamps = use_timestamps;
        self
    }

    /// Set the date cache capacity (builder pattern)
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Set the scratch buffer pool size (builder pattern)
    pub fn with_pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    /// Parsed form of [`Config::time_zone`]
    pub fn zone(&self) -> Result<ZoneSetting> {
        ZoneSetting::parse(&self.time_zone)
    }

    /// Size limits derived from this configuration
    pub fn limits(&self) -> Limits {
        Limits {
            max_nesting_depth: self.max_nesting_depth,
            max_pad_index: self.max_pad_index,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        self.zone()?;
        if self.timestamp_format.is_empty() {
            return Err(Error::Config("timestamp_format must not be empty".into()));
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config(format!(
                "Invalid timestamp_format '{}'",
                self.timestamp_format
            )));
        }
        if self.cache_size == 0 {
            return Err(Error::Config("cache_size must be greater than 0".into()));
        }
        if self.pool_size == 0 {
            return Err(Error::Config("pool_size must be greater than 0".into()));
        }
        if self.max_nesting_depth == 0 {
            return Err(Error::Config("max_nesting_depth must be greater than 0".into()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Serialize this config to TOML and write it to the given path
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# doctree configuration
#
# Zone used for dates without an explicit offset: "local", "UTC" or "+hh:mm"
time_zone = "UTC"

# strftime-style format used when dates are rendered as text
timestamp_format = "%Y-%m-%dT%H:%M:%S%.3f%:z"

# Render dates as formatted text (true) or epoch milliseconds (false)
use_timestamps = true

# Capacity of each date conversion cache
cache_size = 1024

# Idle scratch buffers kept per codec (default: (cpus + 1) * 2)
# pool_size = 10
"#
    }

    /// Defaults overridden by `DOCTREE_*` environment variables
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(zone) = lookup("DOCTREE_TIME_ZONE") {
            match ZoneSetting::parse(&zone) {
                Ok(_) => config.time_zone = zone,
                Err(e) => warn!(target: "doctree::config", error = %e, "ignoring DOCTREE_TIME_ZONE"),
            }
        }
        if let Some(format) = lookup("DOCTREE_TIMESTAMP_FORMAT") {
            config.timestamp_format = format;
        }
        if let Some(flag) = lookup("DOCTREE_USE_TIMESTAMPS") {
            match flag.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => config.use_timestamps = true,
                "false" | "0" | "no" => config.use_timestamps = false,
                other => warn!(target: "doctree::config", value = other, "ignoring DOCTREE_USE_TIMESTAMPS"),
            }
        }
        for (name, slot) in [
            ("DOCTREE_CACHE_SIZE", &mut config.cache_size),
            ("DOCTREE_POOL_SIZE", &mut config.pool_size),
        ] {
            if let Some(raw) = lookup(name) {
                match raw.trim().parse::<usize>() {
                    Ok(n) if n > 0 => *slot = n,
                    _ => warn!(target: "doctree::config", variable = name, value = %raw, "ignoring invalid size"),
                }
            }
        }
        if let Err(e) = config.validate() {
            warn!(target: "doctree::config", error = %e, "environment produced invalid config, using defaults");
            return Config::default();
        }
        config
    }
}

/// Install `config` as the process-wide configuration
///
/// # Errors
///
/// Fails if the configuration is invalid or a configuration was already
/// installed or read.
pub fn install(config: Config) -> Result<()> {
    config.validate()?;
    GLOBAL
        .set(config)
        .map_err(|_| Error::Config("configuration already initialized".into()))?;
    debug!(target: "doctree::config", "configuration installed");
    Ok(())
}

/// The process-wide configuration, initialized from the environment on first use
pub fn global() -> &'static Config {
    GLOBAL.get_or_init(|| {
        let config = Config::from_env();
        debug!(target: "doctree::config", ?config, "configuration loaded from environment");
        config
    })
}
