// src/config.rs
//! Process-wide settings, read once at startup.
//!
//! Everything comes from the environment (`.env` is loaded by `main`), except
//! the banned-source list which may also live in `config/banned_sources.toml`
//! or `.json`.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_BANNED_PATH: &str = "DIGEST_BANNED_SOURCES_PATH";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Shared secret checked by the route layer.
    pub access_token: String,
    /// One TTL for every source entry, the day quote, and the recency filter.
    pub ttl_hours: i64,
    /// How many items the trending/topic sources keep in their partial view.
    pub top_count: usize,
    /// Ruan Yifeng blog topic slugs to crawl in addition to the archive page.
    pub ruanyifeng_topics: Vec<String>,
    /// DingTalk webhook URLs for the periodic digest broadcast.
    pub webhooks: Vec<String>,
    /// Source names excluded from the registry entirely.
    pub banned_sources: Vec<String>,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Self {
        let banned_sources = load_banned_default().unwrap_or_else(|e| {
            tracing::warn!(error = ?e, "failed to load banned-source list, using none");
            Vec::new()
        });

        Self {
            access_token: std::env::var("CRAWLER_ACCESS_TOKEN").unwrap_or_default(),
            ttl_hours: env_parse("CRAWLER_TIME_SPAN_HOURS", 24),
            top_count: env_parse("CRAWLER_TOP_COUNT", 5),
            ruanyifeng_topics: env_list("CRAWLER_RUANYIFENG_TOPICS"),
            webhooks: env_list("DINGTALK_WEBHOOKS"),
            banned_sources,
            port: env_parse("PORT", 8868),
        }
    }

    /// Window used both for cache staleness and the per-source recency filter.
    pub fn recency_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Load the banned-source list from an explicit path. Supports TOML or JSON.
pub fn load_banned_from(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading banned sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_banned(&content, ext.as_str())
}

/// Load the banned-source list using env var + fallbacks:
/// 1) $DIGEST_BANNED_SOURCES_PATH
/// 2) config/banned_sources.toml
/// 3) config/banned_sources.json
pub fn load_banned_default() -> Result<Vec<String>> {
    if let Ok(p) = std::env::var(ENV_BANNED_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_banned_from(&pb);
        } else {
            return Err(anyhow!(
                "DIGEST_BANNED_SOURCES_PATH points to non-existent path"
            ));
        }
    }
    let toml_p = PathBuf::from("config/banned_sources.toml");
    if toml_p.exists() {
        return load_banned_from(&toml_p);
    }
    let json_p = PathBuf::from("config/banned_sources.json");
    if json_p.exists() {
        return load_banned_from(&json_p);
    }
    Ok(Vec::new())
}

fn parse_banned(s: &str, hint_ext: &str) -> Result<Vec<String>> {
    let try_toml = hint_ext == "toml" || s.contains("sources");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported banned-source list format"))
}

fn parse_toml(s: &str) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct TomlBanned {
        sources: Vec<String>,
    }
    let v: TomlBanned = toml::from_str(s)?;
    Ok(clean_list(v.sources))
}

fn parse_json(s: &str) -> Result<Vec<String>> {
    let v: Vec<String> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    use std::collections::BTreeSet;
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.trim();
        if !t.is_empty() {
            set.insert(t.to_string());
        }
    }
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn dedup_trim_and_formats_work() {
        let toml = r#"sources = [" juejin-hot ", "", "infoq-fe", "infoq-fe"]"#;
        let json = r#"["alimama-fe", "  infoq-fe  ", ""]"#;
        let toml_out = parse_toml(toml).unwrap();
        assert_eq!(
            toml_out,
            vec!["infoq-fe".to_string(), "juejin-hot".to_string()]
        );
        let json_out = parse_json(json).unwrap();
        assert_eq!(
            json_out,
            vec!["alimama-fe".to_string(), "infoq-fe".to_string()]
        );
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo can't interfere.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_BANNED_PATH);

        // No files in the temp CWD -> empty list
        let v = load_banned_default().unwrap();
        assert!(v.is_empty());

        // Env path wins
        let p_json = tmp.path().join("banned_sources.json");
        fs::write(&p_json, r#"["github-trending"]"#).unwrap();
        env::set_var(ENV_BANNED_PATH, p_json.display().to_string());
        let v2 = load_banned_default().unwrap();
        assert_eq!(v2, vec!["github-trending".to_string()]);
        env::remove_var(ENV_BANNED_PATH);

        env::set_current_dir(&old).unwrap();
    }

    #[serial_test::serial]
    #[test]
    fn env_lists_split_on_commas() {
        env::set_var("CRAWLER_RUANYIFENG_TOPICS", "developer, startup ,");
        let topics = env_list("CRAWLER_RUANYIFENG_TOPICS");
        assert_eq!(topics, vec!["developer".to_string(), "startup".to_string()]);
        env::remove_var("CRAWLER_RUANYIFENG_TOPICS");
    }
}
