use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use render_client::{RenderClient, RenderProfile};

/// Boundary to the external rendering collaborator. Returns the page's
/// rendered markdown text; an empty string means the page loaded but yielded
/// no usable content.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str, profile: &RenderProfile) -> Result<String>;
    fn name(&self) -> &str;
}

/// Renderer backed by the rendering service's /content endpoint.
pub struct ServiceRenderer {
    client: RenderClient,
}

impl ServiceRenderer {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        info!(base_url, "Using ServiceRenderer");
        Self {
            client: RenderClient::new(base_url, token),
        }
    }
}

#[async_trait]
impl PageRenderer for ServiceRenderer {
    async fn render(&self, url: &str, profile: &RenderProfile) -> Result<String> {
        info!(url, stealth = profile.stealth, "Rendering URL");

        let text = self
            .client
            .content(url, profile)
            .await
            .context("Render service content request failed")?;

        if text.trim().is_empty() {
            warn!(url, "Empty content from render service");
            return Ok(String::new());
        }

        info!(url, bytes = text.len(), "Rendered successfully");
        Ok(text)
    }

    fn name(&self) -> &str {
        "render-service"
    }
}
