use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JobScoutError;

/// One normalized job posting. `source_name` and `source_url` are stamped by
/// the orchestrator after construction; everything else is fixed at
/// construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub skills: Vec<String>,
    pub application_url: Option<String>,
    pub posted_date: Option<String>,
    pub salary_range: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub remote_option: Option<String>,
    pub benefits: Vec<String>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
}

impl JobRecord {
    /// Build a record from an untrusted extraction candidate. The candidate
    /// has already passed the spam gate; this is the second, independent
    /// field-level gate. Fails when `job_title` or `company_name` is
    /// missing or empty after trimming.
    pub fn from_candidate(candidate: &Value) -> Result<Self, JobScoutError> {
        let title = required_str(candidate, "job_title")?;
        let company = required_str(candidate, "company_name")?;

        let location = optional_str(candidate, "location")
            .unwrap_or_else(|| "Not specified".to_string());

        Ok(Self {
            title,
            company,
            location,
            description: optional_str(candidate, "job_description").unwrap_or_default(),
            skills: list_field(candidate, "required_skills"),
            application_url: optional_str(candidate, "application_url"),
            posted_date: optional_str(candidate, "posted_date"),
            salary_range: optional_str(candidate, "salary_range"),
            job_type: optional_str(candidate, "job_type"),
            experience_level: optional_str(candidate, "experience_level"),
            remote_option: optional_str(candidate, "remote_option"),
            benefits: list_field(candidate, "benefits"),
            source_url: None,
            source_name: None,
        })
    }
}

/// One candidate professional connection. `relevance_score` is written in
/// place by the scorer and, once set, lies in [0.0, 1.0].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub twitter_url: Option<String>,
    pub email: Option<String>,
    pub connection_path: Option<String>,
    pub relevance_score: Option<f32>,
    pub relevance_reason: Option<String>,
    pub mutual_connections: Option<i64>,
}

impl ContactRecord {
    /// Fails when `name` is missing or empty after trimming.
    pub fn from_candidate(candidate: &Value) -> Result<Self, JobScoutError> {
        let name = required_str(candidate, "name")?;

        Ok(Self {
            name,
            title: optional_str(candidate, "title"),
            company: optional_str(candidate, "company"),
            linkedin_url: optional_str(candidate, "linkedin_url"),
            github_url: optional_str(candidate, "github_url"),
            twitter_url: optional_str(candidate, "twitter_url"),
            email: optional_str(candidate, "email"),
            connection_path: optional_str(candidate, "connection_path"),
            relevance_score: None,
            relevance_reason: optional_str(candidate, "relevance_reason"),
            mutual_connections: candidate.get("mutual_connections").and_then(Value::as_i64),
        })
    }
}

/// Split a delimited skills/benefits string into trimmed, non-empty tokens.
pub fn split_list(input: &str) -> Vec<String> {
    let sep = Regex::new(r"[,;]\s*").expect("valid regex");
    sep.split(input)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn required_str(candidate: &Value, key: &'static str) -> Result<String, JobScoutError> {
    match optional_str(candidate, key) {
        Some(s) => Ok(s),
        None => Err(JobScoutError::MissingField(key)),
    }
}

fn optional_str(candidate: &Value, key: &str) -> Option<String> {
    let trimmed = candidate.get(key)?.as_str()?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// List-valued fields arrive either as a JSON array or as one delimited
/// string. Arrays pass through (trimmed, empties dropped); strings are split
/// on comma/semicolon.
fn list_field(candidate: &Value, key: &str) -> Vec<String> {
    match candidate.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => split_list(s),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delimited_string_splits_on_comma_and_semicolon() {
        assert_eq!(split_list("A, B; C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn split_drops_empty_tokens() {
        assert_eq!(split_list("Python,, ;  Rust ,"), vec!["Python", "Rust"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" ; , ").is_empty());
    }

    #[test]
    fn job_from_full_candidate() {
        let candidate = json!({
            "job_title": "Software Engineer",
            "company_name": "Tech Corp",
            "location": "Remote",
            "job_description": "Build things",
            "required_skills": "Python, Rust; SQL",
            "benefits": ["Health insurance", "  401k  ", ""],
            "salary_range": "$120k-$150k",
        });

        let job = JobRecord::from_candidate(&candidate).unwrap();
        assert_eq!(job.title, "Software Engineer");
        assert_eq!(job.company, "Tech Corp");
        assert_eq!(job.skills, vec!["Python", "Rust", "SQL"]);
        assert_eq!(job.benefits, vec!["Health insurance", "401k"]);
        assert_eq!(job.salary_range.as_deref(), Some("$120k-$150k"));
        assert!(job.source_name.is_none());
    }

    #[test]
    fn job_construction_fails_without_title_or_company() {
        let no_title = json!({ "company_name": "Tech Corp" });
        assert!(JobRecord::from_candidate(&no_title).is_err());

        let blank_company = json!({ "job_title": "Engineer", "company_name": "   " });
        assert!(JobRecord::from_candidate(&blank_company).is_err());
    }

    #[test]
    fn missing_location_defaults_to_not_specified() {
        let candidate = json!({
            "job_title": "Engineer",
            "company_name": "Tech Corp",
            "location": null,
        });
        let job = JobRecord::from_candidate(&candidate).unwrap();
        assert_eq!(job.location, "Not specified");
    }

    #[test]
    fn contact_requires_name() {
        let candidate = json!({ "title": "Engineering Manager" });
        assert!(ContactRecord::from_candidate(&candidate).is_err());

        let named = json!({ "name": "Jordan Smith", "company": "Tech Corp" });
        let contact = ContactRecord::from_candidate(&named).unwrap();
        assert_eq!(contact.name, "Jordan Smith");
        assert!(contact.relevance_score.is_none());
    }
}
