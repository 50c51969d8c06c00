// Test mocks for the extraction pipeline and orchestrator.
//
// Two mocks matching the two collaborator trait boundaries:
// - MockRenderer (PageRenderer): HashMap-based URL to rendered text
// - MockSchemaExtractor (SchemaExtractor): content-marker substring to raw response
//
// Both return Err for anything unregistered, so tests fail loudly when a
// URL or content shape drifts.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use render_client::RenderProfile;

use crate::pipeline::SchemaExtractor;
use crate::renderer::PageRenderer;

// ---------------------------------------------------------------------------
// MockRenderer
// ---------------------------------------------------------------------------

/// HashMap-based renderer. Builder pattern: `.on_page()`, `.failing_once()`.
pub struct MockRenderer {
    pages: HashMap<String, String>,
    fail_once: Mutex<HashMap<String, bool>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            fail_once: Mutex::new(HashMap::new()),
        }
    }

    pub fn on_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    /// The first render of `url` fails; later renders fall through to the
    /// registered page. Models a flaky stealth board.
    pub fn failing_once(self, url: &str) -> Self {
        self.fail_once
            .lock()
            .expect("lock poisoned")
            .insert(url.to_string(), true);
        self
    }
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn render(&self, url: &str, _profile: &RenderProfile) -> Result<String> {
        let mut fail_once = self.fail_once.lock().expect("lock poisoned");
        if fail_once.get(url).copied().unwrap_or(false) {
            fail_once.insert(url.to_string(), false);
            bail!("mock render failure for {url}");
        }
        drop(fail_once);

        match self.pages.get(url) {
            Some(text) => Ok(text.clone()),
            None => bail!("no mock page registered for {url}"),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ---------------------------------------------------------------------------
// MockSchemaExtractor
// ---------------------------------------------------------------------------

/// Substring-keyed extractor: the response whose marker occurs in the page
/// content is returned. `.failing()` makes every call error instead.
pub struct MockSchemaExtractor {
    responses: Vec<(String, String)>,
    fail_always: bool,
}

impl MockSchemaExtractor {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            fail_always: false,
        }
    }

    pub fn on_content(mut self, marker: &str, response: &str) -> Self {
        self.responses
            .push((marker.to_string(), response.to_string()));
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_always = true;
        self
    }
}

impl Default for MockSchemaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaExtractor for MockSchemaExtractor {
    async fn extract(&self, content: &str, _schema: &Value, _instruction: &str) -> Result<String> {
        if self.fail_always {
            bail!("mock extraction failure");
        }
        for (marker, response) in &self.responses {
            if content.contains(marker) {
                return Ok(response.clone());
            }
        }
        bail!("no mock response registered for this content");
    }
}
