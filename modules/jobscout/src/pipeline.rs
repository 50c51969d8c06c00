use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use llm_client::util::truncate_to_char_boundary;
use llm_client::LlmClient;
use render_client::RenderProfile;

use crate::boards::SourceDescriptor;
use crate::error::JobScoutError;
use crate::records::{ContactRecord, JobRecord};
use crate::renderer::PageRenderer;
use crate::validator;

/// Page content larger than this is cut before the model call.
const MAX_EXTRACTION_INPUT: usize = 30_000;

/// Role keywords that open a new candidate block during markdown-heuristic
/// extraction.
const ROLE_LINE_KEYWORDS: [&str; 5] = ["engineer", "developer", "manager", "analyst", "specialist"];

/// Role substrings that let the keyword fallback emit its single synthetic
/// record. Ordered most-specific first.
const FALLBACK_PATTERNS: [&str; 7] = [
    "software engineer",
    "data scientist",
    "product manager",
    "developer",
    "engineer",
    "manager",
    "analyst",
];

// --- SchemaExtractor trait ---

/// Boundary to the extraction-model collaborator: page text, a field schema
/// and an instruction in; the model's raw string out. The raw string may be
/// empty and may not parse as JSON; callers own both cases.
#[async_trait]
pub trait SchemaExtractor: Send + Sync {
    async fn extract(&self, content: &str, schema: &Value, instruction: &str) -> Result<String>;
}

/// SchemaExtractor backed by an OpenAI-compatible chat model.
pub struct LlmExtractor {
    client: LlmClient,
}

impl LlmExtractor {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: LlmClient::new(api_key, model),
        }
    }

    pub fn with_client(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SchemaExtractor for LlmExtractor {
    async fn extract(&self, content: &str, schema: &Value, instruction: &str) -> Result<String> {
        let content = truncate_to_char_boundary(content, MAX_EXTRACTION_INPUT);
        let system = format!(
            "{instruction}\n\nReturn a JSON array of objects matching this schema:\n{schema}"
        );
        self.client.extract(&system, content).await
    }
}

// --- Field schemas sent to the model ---

/// Shape of one job listing the model is asked to return. Doc comments
/// become field descriptions in the generated schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobListingSchema {
    /// Title of the job position
    pub job_title: String,
    /// Name of the company offering the job
    pub company_name: String,
    /// Job location, can be remote or physical location
    pub location: String,
    /// Detailed description of the job requirements and responsibilities
    pub job_description: String,
    /// List of skills required for the job
    pub required_skills: Option<Vec<String>>,
    /// Direct URL to apply for the job
    pub application_url: Option<String>,
    /// When the job was posted
    pub posted_date: Option<String>,
    /// Salary range if provided
    pub salary_range: Option<String>,
    /// Full-time, part-time, contract, etc.
    pub job_type: Option<String>,
    /// Entry level, mid-level, senior, etc.
    pub experience_level: Option<String>,
    /// Remote, hybrid, on-site
    pub remote_option: Option<String>,
    /// Benefits offered
    pub benefits: Option<Vec<String>>,
}

/// Shape of one professional contact the model is asked to return.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContactSchema {
    /// Full name of the contact person
    pub name: String,
    /// Job title of the contact person
    pub title: Option<String>,
    /// Company the contact person works for
    pub company: Option<String>,
    /// LinkedIn profile URL
    pub linkedin_url: Option<String>,
    /// Why this person might be relevant
    pub relevance_reason: Option<String>,
}

fn job_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(JobListingSchema)).unwrap_or_default()
}

fn contact_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(ContactSchema)).unwrap_or_default()
}

fn job_instruction(board_name: &str) -> String {
    format!(
        "Extract ALL job listings from this {board_name} page. Look for actual job \
postings, not navigation links or categories.\n\n\
REQUIRED FIELDS: job_title, company_name, location, job_description.\n\
OPTIONAL FIELDS (if available): required_skills, application_url, posted_date, \
salary_range, job_type, experience_level, remote_option, benefits.\n\n\
IMPORTANT:\n\
- Only extract actual job postings, skip ads and navigation\n\
- If information isn't available, leave it null/empty\n\
- Return a valid JSON array of job objects\n\
- Extract at least the job title and company name for each listing"
    )
}

fn contact_instruction(company: &str, job_title: &str) -> String {
    format!(
        "Extract information about people who work at {company} from this people-search \
page. For each person extract: name, title, company, linkedin_url, and a \
relevance_reason explaining why they might be relevant for a {job_title} position.\n\
Focus on people who work at {company} and could help with job applications.\n\
Return a JSON array of person objects."
    )
}

// --- Tier-1 outcome ---

/// What the schema-guided tier produced. Expected "no data" shapes are
/// variants, not errors; `Failed` is reserved for the collaborator itself
/// going wrong.
enum SchemaOutcome {
    /// Response parsed as an array of objects (or a single object).
    Parsed(Vec<Value>),
    /// Collaborator succeeded but returned an empty response.
    Empty,
    /// Non-empty response that does not parse as JSON; carries the raw text.
    Malformed(String),
    /// The collaborator call itself failed.
    Failed(JobScoutError),
}

// --- Pipeline ---

/// Converts one page into zero or more validated records using three tiers
/// in strict fallback order: schema-guided extraction, markdown-heuristic
/// scan, keyword fallback. Tier 2 runs only on total tier-1 failure; tier 3
/// only on a non-empty tier-1 response that is not valid JSON. A successful
/// tier-1 call that yields zero records triggers neither.
pub struct ExtractionPipeline {
    renderer: Arc<dyn PageRenderer>,
    extractor: Arc<dyn SchemaExtractor>,
}

impl ExtractionPipeline {
    pub fn new(renderer: Arc<dyn PageRenderer>, extractor: Arc<dyn SchemaExtractor>) -> Self {
        Self {
            renderer,
            extractor,
        }
    }

    /// Extract job records from one board's search results page. All error
    /// kinds are recovered here; the orchestrator only ever sees a list.
    pub async fn extract_jobs(&self, url: &str, board: &SourceDescriptor) -> Vec<JobRecord> {
        let profile = if board.needs_stealth {
            RenderProfile::stealth()
        } else {
            RenderProfile::standard()
        };

        let page = match self.renderer.render(url, &profile).await {
            Ok(p) => p,
            Err(e) => {
                warn!(board = board.name, url, error = %e, "Render failed");
                // No rendered text to schema-extract. A stealth re-render may
                // still salvage something for the markdown tier.
                return self.markdown_tier(url, board, None).await;
            }
        };

        if page.trim().is_empty() {
            info!(board = board.name, url, "No content rendered");
            return Vec::new();
        }

        match self
            .run_schema_tier(&page, &job_schema(), &job_instruction(board.name), board.name)
            .await
        {
            SchemaOutcome::Parsed(candidates) => {
                let jobs = build_jobs(candidates, board.name);
                info!(board = board.name, count = jobs.len(), "Schema extraction complete");
                jobs
            }
            SchemaOutcome::Empty => {
                info!(board = board.name, "Empty extraction response");
                Vec::new()
            }
            SchemaOutcome::Malformed(raw) => {
                warn!(board = board.name, "Extraction response is not valid JSON, using keyword fallback");
                keyword_fallback(&raw, board.name)
            }
            SchemaOutcome::Failed(e) => {
                warn!(board = board.name, error = %e, "Schema extraction failed, using markdown fallback");
                self.markdown_tier(url, board, Some(page)).await
            }
        }
    }

    /// Extract contact records from a people-search page. Same tier-1
    /// machinery as jobs; there is no fallback tier for contacts.
    pub async fn extract_contacts(
        &self,
        url: &str,
        company: &str,
        job_title: &str,
    ) -> Vec<ContactRecord> {
        let page = match self.renderer.render(url, &RenderProfile::stealth()).await {
            Ok(p) if !p.trim().is_empty() => p,
            Ok(_) => {
                info!(url, "No content rendered for contact search");
                return Vec::new();
            }
            Err(e) => {
                warn!(url, error = %e, "Contact page render failed");
                return Vec::new();
            }
        };

        let instruction = contact_instruction(company, job_title);
        match self
            .run_schema_tier(&page, &contact_schema(), &instruction, "people-search")
            .await
        {
            SchemaOutcome::Parsed(candidates) => {
                let contacts = build_contacts(candidates);
                info!(url, count = contacts.len(), "Contact extraction complete");
                contacts
            }
            SchemaOutcome::Empty => Vec::new(),
            SchemaOutcome::Malformed(_) => {
                warn!(url, "Contact extraction response is not valid JSON");
                Vec::new()
            }
            SchemaOutcome::Failed(e) => {
                warn!(url, error = %e, "Contact extraction failed");
                Vec::new()
            }
        }
    }

    async fn run_schema_tier(
        &self,
        content: &str,
        schema: &Value,
        instruction: &str,
        board: &str,
    ) -> SchemaOutcome {
        let raw = match self.extractor.extract(content, schema, instruction).await {
            Ok(r) => r,
            Err(e) => {
                return SchemaOutcome::Failed(JobScoutError::Source {
                    board: board.to_string(),
                    message: e.to_string(),
                })
            }
        };

        if raw.trim().is_empty() {
            return SchemaOutcome::Empty;
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => SchemaOutcome::Parsed(items),
            Ok(obj @ Value::Object(_)) => SchemaOutcome::Parsed(vec![obj]),
            // Valid JSON but not a listing shape: a successful-but-useless
            // response, not a parse failure.
            Ok(_) => SchemaOutcome::Parsed(Vec::new()),
            Err(_) => SchemaOutcome::Malformed(raw),
        }
    }

    /// Tier 2. Stealth boards get one more patient re-render first; if that
    /// also fails, fall back to whatever text tier 1 already had.
    async fn markdown_tier(
        &self,
        url: &str,
        board: &SourceDescriptor,
        rendered: Option<String>,
    ) -> Vec<JobRecord> {
        let text = if board.needs_stealth {
            match self
                .renderer
                .render(url, &RenderProfile::stealth_fallback())
                .await
            {
                Ok(t) if !t.trim().is_empty() => t,
                Ok(_) | Err(_) => match rendered {
                    Some(t) => t,
                    None => {
                        warn!(board = board.name, url, "No text available for markdown fallback");
                        return Vec::new();
                    }
                },
            }
        } else {
            match rendered {
                Some(t) => t,
                None => return Vec::new(),
            }
        };

        let jobs = extract_from_markdown(&text);
        info!(board = board.name, count = jobs.len(), "Markdown fallback extraction complete");
        jobs
    }
}

/// Validator gate + construction for each raw candidate. A bad element is
/// logged and skipped; it never aborts the batch.
fn build_jobs(candidates: Vec<Value>, board_name: &str) -> Vec<JobRecord> {
    let mut jobs = Vec::new();
    for candidate in candidates {
        if !validator::is_valid_job(&candidate) {
            continue;
        }
        match JobRecord::from_candidate(&candidate) {
            Ok(job) => jobs.push(job),
            Err(e) => {
                warn!(board = board_name, error = %e, "Skipping malformed job candidate");
            }
        }
    }
    jobs
}

fn build_contacts(candidates: Vec<Value>) -> Vec<ContactRecord> {
    let mut contacts = Vec::new();
    for candidate in candidates {
        match ContactRecord::from_candidate(&candidate) {
            Ok(contact) => contacts.push(contact),
            Err(e) => {
                warn!(error = %e, "Skipping malformed contact candidate");
            }
        }
    }
    contacts
}

/// Tier 2: line-scan the rendered text for job-shaped blocks. A line with a
/// role keyword opens a block; the next non-empty, non-URL-looking line is
/// taken as the company. Blocks are emitted only once they have both.
pub(crate) fn extract_from_markdown(text: &str) -> Vec<JobRecord> {
    struct Block {
        title: String,
        company: Option<String>,
    }

    fn emit(block: Block, jobs: &mut Vec<JobRecord>) {
        if let Some(company) = block.company {
            jobs.push(markdown_job(block.title, company));
        }
    }

    let mut jobs = Vec::new();
    let mut current: Option<Block> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let lower = line.to_lowercase();
        if ROLE_LINE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            if let Some(block) = current.take() {
                emit(block, &mut jobs);
            }
            current = Some(Block {
                title: line.to_string(),
                company: None,
            });
        } else if let Some(block) = current.as_mut() {
            if block.company.is_none()
                && !line.starts_with("http")
                && !line.starts_with("www")
                && !line.starts_with("apply")
            {
                block.company = Some(line.to_string());
            }
        }
    }

    // Final in-progress block, same completeness rule.
    if let Some(block) = current {
        emit(block, &mut jobs);
    }

    jobs
}

fn markdown_job(title: String, company: String) -> JobRecord {
    JobRecord {
        title,
        company,
        location: "Not specified".to_string(),
        description: "Job description not available".to_string(),
        skills: Vec::new(),
        application_url: None,
        posted_date: None,
        salary_range: None,
        job_type: None,
        experience_level: None,
        remote_option: None,
        benefits: Vec::new(),
        source_url: None,
        source_name: None,
    }
}

/// Tier 3: the response was non-empty but unparseable. Emit at most one
/// synthetic record if the text smells like a job page at all.
pub(crate) fn keyword_fallback(content: &str, board_name: &str) -> Vec<JobRecord> {
    let lower = content.to_lowercase();
    for pattern in FALLBACK_PATTERNS {
        if lower.contains(pattern) {
            // The excerpt limit is in characters, not bytes.
            let description = if content.chars().count() > 200 {
                let excerpt: String = content.chars().take(200).collect();
                format!("{excerpt}...")
            } else {
                content.to_string()
            };
            return vec![JobRecord {
                title: format!("Job found on {board_name}"),
                company: "Company name not extracted".to_string(),
                location: "Location not specified".to_string(),
                description,
                skills: Vec::new(),
                application_url: None,
                posted_date: None,
                salary_range: None,
                job_type: None,
                experience_level: None,
                remote_option: None,
                benefits: Vec::new(),
                source_url: None,
                source_name: None,
            }];
        }
    }
    Vec::new()
}
