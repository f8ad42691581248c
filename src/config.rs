use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FEED_URL: &str = "https://moneytreerealty.in/api/properties";
pub const DEFAULT_MEDIA_BASE: &str = "https://moneytreerealty.in/";

/// 运行配置，全部来自环境变量（启动时先加载 `.env`）
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub feed_url: String,
    pub media_base: String,
    pub import_timeout: Duration,
    /// None 表示不限条数
    pub import_limit: Option<usize>,
    pub import_on_start: bool,
    pub seed_sample_data: bool,
    pub placeholder_seed: Option<u64>,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            media_base: DEFAULT_MEDIA_BASE.to_string(),
            import_timeout: Duration::from_secs(15),
            import_limit: Some(10),
            import_on_start: true,
            seed_sample_data: true,
            placeholder_seed: None,
            log_dir: None,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    /// 读取 `.env`（存在时）后再读进程环境
    pub fn load() -> Self {
        let _ = dotenv::dotenv();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// 无法解析的值回落到默认值
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let get = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            feed_url: get("LISTINGS_FEED_URL").unwrap_or(d.feed_url),
            media_base: get("LISTINGS_MEDIA_BASE").unwrap_or(d.media_base),
            import_timeout: get("IMPORT_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(d.import_timeout),
            import_limit: match get("IMPORT_LIMIT").and_then(|v| v.parse::<usize>().ok()) {
                Some(0) => None,
                Some(n) => Some(n),
                None => d.import_limit,
            },
            import_on_start: get("IMPORT_ON_START")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(d.import_on_start),
            seed_sample_data: get("SEED_SAMPLE_DATA")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(d.seed_sample_data),
            placeholder_seed: get("PLACEHOLDER_SEED").and_then(|v| v.parse().ok()),
            log_dir: get("LOG_DIR").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let c = config(&[]);
        assert_eq!(c.feed_url, DEFAULT_FEED_URL);
        assert_eq!(c.import_timeout, Duration::from_secs(15));
        assert_eq!(c.import_limit, Some(10));
        assert!(c.import_on_start);
        assert!(c.seed_sample_data);
        assert_eq!(c.placeholder_seed, None);
    }

    #[test]
    fn overrides_and_bad_values() {
        let c = config(&[
            ("IMPORT_LIMIT", "0"),
            ("IMPORT_TIMEOUT_SECS", "abc"),
            ("IMPORT_ON_START", "off"),
            ("PLACEHOLDER_SEED", "7"),
            ("LOG_DIR", " logs "),
            ("LISTINGS_FEED_URL", "  "),
        ]);
        assert_eq!(c.import_limit, None);
        assert_eq!(c.import_timeout, Duration::from_secs(15));
        assert!(!c.import_on_start);
        assert_eq!(c.placeholder_seed, Some(7));
        assert_eq!(c.log_dir, Some(PathBuf::from("logs")));
        assert_eq!(c.feed_url, DEFAULT_FEED_URL);
    }
}
