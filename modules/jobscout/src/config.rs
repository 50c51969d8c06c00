use std::env;
use std::time::Duration;

use crate::orchestrator::OrchestratorConfig;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // LLM provider
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_base_url: Option<String>,

    // Rendering service
    pub render_url: String,
    pub render_token: Option<String>,

    // Pacing
    pub max_parallel: usize,
    pub rate_limit_delay: Duration,
    pub stealth_delay: Duration,

    // Contact ranking. Off by default: each ranked job costs two stealth
    // people-search queries with long delays.
    pub find_connections: bool,
    pub max_connections_per_job: usize,

    // Output
    pub output_dir: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            llm_api_key: required_env("LLM_API_KEY"),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            llm_base_url: env::var("LLM_BASE_URL").ok(),
            render_url: required_env("RENDER_URL"),
            render_token: env::var("RENDER_TOKEN").ok(),
            max_parallel: parse_env("MAX_PARALLEL", 5),
            rate_limit_delay: Duration::from_secs(parse_env("RATE_LIMIT_DELAY_SECS", 2)),
            stealth_delay: Duration::from_secs(parse_env("STEALTH_DELAY_SECS", 5)),
            find_connections: bool_env("FIND_CONNECTIONS", false),
            max_connections_per_job: parse_env("MAX_CONNECTIONS_PER_JOB", 20),
            output_dir: env::var("OUTPUT_DIR").unwrap_or_else(|_| "output".to_string()),
        }
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            max_parallel: self.max_parallel,
            rate_limit_delay: self.rate_limit_delay,
            stealth_delay: self.stealth_delay,
            max_connections_per_job: self.max_connections_per_job,
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number")),
        Err(_) => default,
    }
}

fn bool_env(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => is_truthy(&raw),
        Err(_) => default,
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_values_parse_loosely() {
        for raw in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(is_truthy(raw), "should be truthy: {raw:?}");
        }
        for raw in ["0", "false", "", "off", "nope"] {
            assert!(!is_truthy(raw), "should be falsy: {raw:?}");
        }
    }
}
