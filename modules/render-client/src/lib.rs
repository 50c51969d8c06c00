pub mod error;

pub use error::{RenderError, Result};

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

/// How long the renderer waits before considering navigation settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WaitUntil {
    DomContentLoaded,
    NetworkIdle,
}

/// Rendering options for one page load. Stealth profiles trade speed for a
/// lower automated-traffic footprint: longer timeouts, a settle delay after
/// navigation, and the service's anti-detection mode.
#[derive(Debug, Clone)]
pub struct RenderProfile {
    pub timeout: Duration,
    pub wait_until: WaitUntil,
    pub stealth: bool,
    /// Extra wait after the page settles, before content is captured.
    pub settle_delay: Duration,
}

impl RenderProfile {
    /// Profile for boards without aggressive bot detection.
    pub fn standard() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            wait_until: WaitUntil::DomContentLoaded,
            stealth: false,
            settle_delay: Duration::from_secs(2),
        }
    }

    /// Profile for boards with anti-bot protection.
    pub fn stealth() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            wait_until: WaitUntil::NetworkIdle,
            stealth: true,
            settle_delay: Duration::from_secs(3),
        }
    }

    /// Last-resort re-render profile for protected boards that failed once.
    pub fn stealth_fallback() -> Self {
        Self {
            timeout: Duration::from_secs(45),
            wait_until: WaitUntil::NetworkIdle,
            stealth: true,
            settle_delay: Duration::from_secs(5),
        }
    }
}

pub struct RenderClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RenderClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    /// Fetch fully-rendered page content as markdown via the /content endpoint.
    pub async fn content(&self, url: &str, profile: &RenderProfile) -> Result<String> {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }

        let body = serde_json::json!({
            "url": url,
            "format": "markdown",
            "timeout": profile.timeout.as_millis() as u64,
            "waitUntil": profile.wait_until,
            "stealth": profile.stealth,
            "settleDelay": profile.settle_delay.as_millis() as u64,
        });

        debug!(
            url,
            stealth = profile.stealth,
            timeout_ms = profile.timeout.as_millis() as u64,
            "Requesting rendered content"
        );

        let resp = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(RenderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stealth_profile_waits_longer_than_standard() {
        let standard = RenderProfile::standard();
        let stealth = RenderProfile::stealth();
        assert!(stealth.timeout > standard.timeout);
        assert!(stealth.settle_delay > standard.settle_delay);
        assert_eq!(stealth.wait_until, WaitUntil::NetworkIdle);
    }

    #[test]
    fn fallback_profile_is_the_most_patient() {
        let stealth = RenderProfile::stealth();
        let fallback = RenderProfile::stealth_fallback();
        assert!(fallback.timeout > stealth.timeout);
        assert!(fallback.settle_delay > stealth.settle_delay);
        assert!(fallback.stealth);
    }

    #[test]
    fn wait_until_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&WaitUntil::NetworkIdle).unwrap(),
            "\"networkIdle\""
        );
        assert_eq!(
            serde_json::to_string(&WaitUntil::DomContentLoaded).unwrap(),
            "\"domContentLoaded\""
        );
    }
}
