use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::records::{ContactRecord, JobRecord};

/// Final artifact of a search run: metadata plus the full result sets.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchReport {
    pub search_metadata: SearchMetadata,
    pub jobs: Vec<JobRecord>,
    pub connections: Vec<ContactRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchMetadata {
    /// RFC 3339 timestamp of report creation.
    pub timestamp: String,
    pub total_jobs: usize,
    pub total_connections: usize,
    pub job_boards_searched: Vec<String>,
}

impl SearchReport {
    pub fn new(
        jobs: Vec<JobRecord>,
        connections: Vec<ContactRecord>,
        boards_searched: Vec<String>,
    ) -> Self {
        Self {
            search_metadata: SearchMetadata {
                timestamp: Utc::now().to_rfc3339(),
                total_jobs: jobs.len(),
                total_connections: connections.len(),
                job_boards_searched: boards_searched,
            },
            jobs,
            connections,
        }
    }

    pub fn to_pretty_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_counts_match_payload() {
        let jobs = vec![JobRecord {
            title: "Rust Engineer".to_string(),
            company: "Tech Corp".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            skills: Vec::new(),
            application_url: None,
            posted_date: None,
            salary_range: None,
            job_type: None,
            experience_level: None,
            remote_option: None,
            benefits: Vec::new(),
            source_url: None,
            source_name: Some("BoardA".to_string()),
        }];

        let report = SearchReport::new(jobs, Vec::new(), vec!["BoardA".to_string()]);
        assert_eq!(report.search_metadata.total_jobs, 1);
        assert_eq!(report.search_metadata.total_connections, 0);

        let json = report.to_pretty_json().unwrap();
        assert!(json.contains("\"job_boards_searched\""));
        assert!(json.contains("Rust Engineer"));
    }
}
