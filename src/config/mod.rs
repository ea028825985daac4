use std::env;
use std::str::FromStr;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "SEO Meta Tag Analyzer Bot";
pub const DEFAULT_MAX_HTML_BYTES: usize = 5 * 1024 * 1024;

/// How target pages are retrieved.
#[derive(Clone, Debug)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Skip the private/loopback address check. Off unless explicitly enabled.
    pub allow_private_targets: bool,
    pub max_html_bytes: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_private_targets: false,
            max_html_bytes: DEFAULT_MAX_HTML_BYTES,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub is_dev: bool,
    pub fetch: FetchSettings,
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str) -> bool {
    matches!(
        env::var(key).as_deref().map(str::trim),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

impl Config {
    /// Load `.env` (if present) and read settings from the environment.
    /// Missing or unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parsed_or("SERVER_PORT", 8080),
            is_dev: env::var("APP_ENV").as_deref() != Ok("production"),
            fetch: FetchSettings {
                timeout_secs: parsed_or("FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS),
                user_agent: env::var("FETCH_USER_AGENT")
                    .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
                allow_private_targets: flag("ALLOW_PRIVATE_TARGETS"),
                max_html_bytes: parsed_or("MAX_HTML_BYTES", DEFAULT_MAX_HTML_BYTES),
            },
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
