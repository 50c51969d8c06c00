use crate::records::{ContactRecord, JobRecord};

/// Role keywords that count toward title overlap.
const ROLE_KEYWORDS: [&str; 6] = ["engineer", "developer", "manager", "director", "lead", "senior"];

/// Score every contact against the target job, in place. Contributions:
/// +0.5 when the contact's title contains the job title, +0.2 per role
/// keyword present in both titles, +0.3 when the contact's company contains
/// the job's company. All matching is lower-cased substring; the result is
/// capped at 1.0. Nothing is filtered here; ranking and truncation are the
/// orchestrator's call.
pub fn score_connections(contacts: &mut [ContactRecord], job: &JobRecord) {
    let job_title = job.title.to_lowercase();
    let job_company = job.company.to_lowercase();

    for contact in contacts.iter_mut() {
        let mut score = 0.0_f32;

        if let Some(ref title) = contact.title {
            let title = title.to_lowercase();

            if title.contains(&job_title) {
                score += 0.5;
            }

            for keyword in ROLE_KEYWORDS {
                if title.contains(keyword) && job_title.contains(keyword) {
                    score += 0.2;
                }
            }
        }

        if let Some(ref company) = contact.company {
            if company.to_lowercase().contains(&job_company) {
                score += 0.3;
            }
        }

        contact.relevance_score = Some(score.min(1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_job() -> JobRecord {
        JobRecord {
            title: "Senior Software Engineer".to_string(),
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
            source_name: None,
        }
    }

    fn contact(title: Option<&str>, company: Option<&str>) -> ContactRecord {
        ContactRecord {
            name: "Jordan Smith".to_string(),
            title: title.map(String::from),
            company: company.map(String::from),
            linkedin_url: None,
            github_url: None,
            twitter_url: None,
            email: None,
            connection_path: None,
            relevance_score: None,
            relevance_reason: None,
            mutual_connections: None,
        }
    }

    #[test]
    fn scores_are_strictly_ordered_by_relevance() {
        let job = target_job();
        let mut contacts = vec![
            // exact title (0.5) + "senior" and "engineer" keywords (0.4) +
            // company (0.3) = 1.2, capped at 1.0
            contact(Some("Senior Software Engineer"), Some("Tech Corp")),
            // "engineer" matches inside "Engineering" (0.2) + company (0.3)
            contact(Some("Engineering Manager"), Some("Tech Corp")),
            contact(Some("Marketing Manager"), Some("Other Corp")),
        ];

        score_connections(&mut contacts, &job);

        let exact = contacts[0].relevance_score.unwrap();
        let partial = contacts[1].relevance_score.unwrap();
        let unrelated = contacts[2].relevance_score.unwrap();

        assert!(exact > partial);
        assert!(partial > unrelated);
        assert_eq!(exact, 1.0);
        assert_eq!(unrelated, 0.0);
    }

    #[test]
    fn keyword_overlap_stacks_per_keyword() {
        let job = target_job();
        // Shares "senior" and "engineer" but not the full title: 0.4.
        let mut contacts = vec![contact(Some("Senior Platform Engineer"), None)];
        score_connections(&mut contacts, &job);
        let score = contacts[0].relevance_score.unwrap();
        assert!((score - 0.4).abs() < 1e-6);
    }

    #[test]
    fn score_never_exceeds_one() {
        let job = target_job();
        let mut contacts = vec![contact(
            Some("Senior Software Engineer, Lead Developer and Manager"),
            Some("Tech Corp Holdings"),
        )];
        score_connections(&mut contacts, &job);
        assert_eq!(contacts[0].relevance_score.unwrap(), 1.0);
    }

    #[test]
    fn contact_without_title_or_company_scores_zero() {
        let job = target_job();
        let mut contacts = vec![contact(None, None)];
        score_connections(&mut contacts, &job);
        assert_eq!(contacts[0].relevance_score, Some(0.0));
    }
}
