//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use pen_downloader_core::Endpoints;
use pen_downloader_core::download::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use url::Url;

/// `key = value` file configuration for downloader defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default device root.
    pub root: Option<PathBuf>,
    /// Primary REST API base URL.
    pub primary_base_url: Option<String>,
    /// Primary streaming base URL.
    pub streaming_base_url: Option<String>,
    /// Legacy archive server base URL.
    pub secondary_base_url: Option<String>,
    /// Two-letter area tag.
    pub area: Option<String>,
    /// Marker phrase for unknown books on the legacy server.
    pub not_found_marker: Option<String>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP read timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Fetch the version map before every book instead of once per run.
    pub refetch_versions_per_book: Option<bool>,
}

impl FileConfig {
    /// Validates config values.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("primary_base_url", &self.primary_base_url),
            ("streaming_base_url", &self.streaming_base_url),
            ("secondary_base_url", &self.secondary_base_url),
        ] {
            validate_base_url(field, value.as_deref())?;
        }
        if let Some(area) = &self.area
            && !(area.len() == 2 && area.bytes().all(|b| b.is_ascii_alphabetic()))
        {
            bail!("Invalid config value for `area`: '{area}'. Expected two ASCII letters");
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }

    /// Backend endpoints with file values over built-in defaults.
    #[must_use]
    pub fn endpoints(&self) -> Endpoints {
        let defaults = Endpoints::default();
        Endpoints {
            primary_base: self
                .primary_base_url
                .clone()
                .unwrap_or(defaults.primary_base),
            streaming_base: self
                .streaming_base_url
                .clone()
                .unwrap_or(defaults.streaming_base),
            secondary_base: self
                .secondary_base_url
                .clone()
                .unwrap_or(defaults.secondary_base),
            area: self
                .area
                .as_deref()
                .map(str::to_ascii_lowercase)
                .unwrap_or(defaults.area),
            not_found_marker: self
                .not_found_marker
                .clone()
                .unwrap_or(defaults.not_found_marker),
        }
    }

    /// `(connect, read)` timeouts in seconds.
    #[must_use]
    pub fn timeouts(&self) -> (u64, u64) {
        (
            self.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
            self.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
        )
    }
}

fn validate_base_url(field: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let parsed = Url::parse(value)
        .with_context(|| format!("Invalid config value for `{field}`: '{value}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("Invalid config value for `{field}`: '{value}'. Expected an http or https URL");
    }
    Ok(())
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config; default when no file exists.
    pub config: FileConfig,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/pen-downloader/config.toml`
/// 2. `$HOME/.config/pen-downloader/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("pen-downloader")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("pen-downloader")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from `explicit` (which must exist) or the default path (if present).
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config,
        });
    }

    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => load_file_config(path_ref)?,
        _ => FileConfig::default(),
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let context = || format!("Invalid `{key}` value on line {}", line_index + 1);

        match key {
            "root" => {
                cfg.root = Some(PathBuf::from(
                    parse_string_literal(value).with_context(context)?,
                ));
            }
            "primary_base_url" => {
                cfg.primary_base_url = Some(parse_string_literal(value).with_context(context)?);
            }
            "streaming_base_url" => {
                cfg.streaming_base_url = Some(parse_string_literal(value).with_context(context)?);
            }
            "secondary_base_url" => {
                cfg.secondary_base_url = Some(parse_string_literal(value).with_context(context)?);
            }
            "area" => cfg.area = Some(parse_string_literal(value).with_context(context)?),
            "not_found_marker" => {
                cfg.not_found_marker = Some(parse_string_literal(value).with_context(context)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "refetch_versions_per_book" => {
                cfg.refetch_versions_per_book = Some(parse_boolean(value).with_context(context)?);
            }
            unknown => {
                bail!(
                    "Unknown configuration key: '{}' on line {}",
                    unknown,
                    line_index + 1
                );
            }
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

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}
