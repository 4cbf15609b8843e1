#![forbid(unsafe_code)]

use anyhow::{Context, Result, bail};
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::request::DEFAULT_FEED_BASE_URL;

pub const DEFAULT_ENV_PATH: &str = ".env";
pub const DEFAULT_ROSTER_PATH: &str = "roster.toml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
/// Feed lookups sit in a page request; longer waits are clamped.
pub const MAX_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub roster_path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct FeedOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub roster_path: Option<PathBuf>,
    pub env_path: Option<PathBuf>,
}

/// Explicit overrides win over the process environment, which wins over the
/// env file.
pub fn resolve_feed_settings(overrides: FeedOverrides) -> Result<FeedSettings> {
    let env_path = overrides
        .env_path
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_ENV_PATH));
    let file_vars = read_env_file(env_path)?;
    build_feed_settings_with_overrides(&file_vars, env_var_string, overrides)
}

#[cfg(test)]
fn build_feed_settings(
    file_vars: &HashMap<String, String>,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Result<FeedSettings> {
    build_feed_settings_with_overrides(file_vars, env_lookup, FeedOverrides::default())
}

fn build_feed_settings_with_overrides(
    file_vars: &HashMap<String, String>,
    env_lookup: impl Fn(&str) -> Option<String>,
    overrides: FeedOverrides,
) -> Result<FeedSettings> {
    let base_url = overrides
        .base_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| lookup_value("VIDEO_FEED_BASE_URL", file_vars, &env_lookup))
        .unwrap_or_else(|| DEFAULT_FEED_BASE_URL.to_string());
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        bail!("VIDEO_FEED_BASE_URL must be an http(s) URL, got {base_url:?}");
    }
    let base_url = base_url.trim_end_matches('/').to_string();

    let timeout_secs = overrides
        .timeout_secs
        .or_else(|| {
            lookup_value("VIDEO_FEED_TIMEOUT_SECS", file_vars, &env_lookup)
                .and_then(|value| value.parse::<u64>().ok())
        })
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .min(MAX_TIMEOUT_SECS);

    let roster_path = overrides
        .roster_path
        .or_else(|| lookup_value("VIDEO_ROSTER_PATH", file_vars, &env_lookup).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROSTER_PATH));

    Ok(FeedSettings {
        base_url,
        timeout: Duration::from_secs(timeout_secs),
        roster_path,
    })
}

fn env_var_string(key: &str) -> Option<String> {
    env::var(key).ok().and_then(non_blank)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn lookup_value(
    key: &str,
    file_vars: &HashMap<String, String>,
    env_lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    env_lookup(key).or_else(|| file_vars.get(key).cloned().and_then(non_blank))
}

/// Reads `KEY=value` lines, tolerating `export` prefixes, quotes and comments.
/// A missing file is treated as empty.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();
    if !path.exists() {
        return Ok(vars);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        vars.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    Ok(vars)
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| value.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn settings_from(contents: &str) -> FeedSettings {
        let cfg = make_config(contents);
        let vars = read_env_file(cfg.path()).unwrap();
        build_feed_settings(&vars, |_| None).unwrap()
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let settings = build_feed_settings(&HashMap::new(), |_| None).unwrap();
        assert_eq!(settings.base_url, DEFAULT_FEED_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(settings.roster_path, PathBuf::from(DEFAULT_ROSTER_PATH));
    }

    #[test]
    fn env_file_values_are_read() {
        let settings = settings_from(
            "VIDEO_FEED_BASE_URL=\"https://feeds.example/api/\"\nVIDEO_FEED_TIMEOUT_SECS=\"3\"\nVIDEO_ROSTER_PATH=/srv/roster.toml\n",
        );
        assert_eq!(settings.base_url, "https://feeds.example/api");
        assert_eq!(settings.timeout, Duration::from_secs(3));
        assert_eq!(settings.roster_path, PathBuf::from("/srv/roster.toml"));
    }

    #[test]
    fn invalid_or_zero_timeout_defaults() {
        for raw in ["nope", "0", ""] {
            let settings = settings_from(&format!("VIDEO_FEED_TIMEOUT_SECS=\"{raw}\"\n"));
            assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        }
    }

    #[test]
    fn long_timeout_is_clamped() {
        let settings = settings_from("VIDEO_FEED_TIMEOUT_SECS=600\n");
        assert_eq!(settings.timeout, Duration::from_secs(MAX_TIMEOUT_SECS));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let cfg = make_config("VIDEO_FEED_BASE_URL=ftp://feeds.example\n");
        let vars = read_env_file(cfg.path()).unwrap();
        let err = build_feed_settings(&vars, |_| None).unwrap_err();
        assert!(err.to_string().contains("http(s) URL"));
    }

    #[test]
    fn env_wins_over_file_and_overrides_win_over_env() {
        let mut vars = HashMap::new();
        vars.insert("VIDEO_FEED_BASE_URL".to_string(), "http://file".to_string());
        vars.insert("VIDEO_FEED_TIMEOUT_SECS".to_string(), "7".to_string());
        vars.insert("VIDEO_ROSTER_PATH".to_string(), "/file/roster.toml".to_string());

        let settings = build_feed_settings_with_overrides(
            &vars,
            |key| match key {
                "VIDEO_FEED_BASE_URL" => Some("http://env".to_string()),
                "VIDEO_FEED_TIMEOUT_SECS" => Some("9".to_string()),
                _ => None,
            },
            FeedOverrides {
                timeout_secs: Some(2),
                ..FeedOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(settings.base_url, "http://env");
        assert_eq!(settings.timeout, Duration::from_secs(2));
        assert_eq!(settings.roster_path, PathBuf::from("/file/roster.toml"));
    }

    #[test]
    fn blank_override_falls_back() {
        let settings = build_feed_settings_with_overrides(
            &HashMap::new(),
            |_| None,
            FeedOverrides {
                base_url: Some("   ".into()),
                ..FeedOverrides::default()
            },
        )
        .unwrap();
        assert_eq!(settings.base_url, DEFAULT_FEED_BASE_URL);
    }

    #[test]
    fn read_env_file_handles_export_and_quotes() {
        let cfg = make_config(
            r#"
            export VIDEO_FEED_BASE_URL="http://feeds.example"
            VIDEO_ROSTER_PATH='/srv/roster.toml'
            VIDEO_FEED_TIMEOUT_SECS =  "4"
            # comment
            INVALID_LINE
            "#,
        );
        let vars = read_env_file(cfg.path()).unwrap();
        assert_eq!(vars.get("VIDEO_FEED_BASE_URL").unwrap(), "http://feeds.example");
        assert_eq!(vars.get("VIDEO_ROSTER_PATH").unwrap(), "/srv/roster.toml");
        assert_eq!(vars.get("VIDEO_FEED_TIMEOUT_SECS").unwrap(), "4");
        assert!(!vars.contains_key("INVALID_LINE"));
    }

    #[test]
    fn read_env_file_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let vars = read_env_file(&dir.path().join("missing.env")).unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn resolve_feed_settings_reads_given_env_file() {
        let cfg = make_config("VIDEO_ROSTER_PATH=/from/file.toml\n");
        let settings = resolve_feed_settings(FeedOverrides {
            env_path: Some(cfg.path().to_path_buf()),
            roster_path: Some(PathBuf::from("/from/flag.toml")),
            ..FeedOverrides::default()
        })
        .unwrap();
        assert_eq!(settings.roster_path, PathBuf::from("/from/flag.toml"));
    }
}
