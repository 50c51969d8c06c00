use std::collections::HashSet;

use crate::records::JobRecord;

/// Identity key for cross-source deduplication. Description, skills and the
/// rest are deliberately not part of the key: two records matching on
/// title/company/location are the same posting, and the first one seen wins
/// even when a later duplicate is richer.
fn identity_key(job: &JobRecord) -> (String, String, String) {
    (
        job.title.trim().to_lowercase(),
        job.company.trim().to_lowercase(),
        job.location.trim().to_lowercase(),
    )
}

/// Stable, order-preserving set reduction: first occurrence wins.
pub fn dedupe_jobs(jobs: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(identity_key(job)))
        .collect()
}
