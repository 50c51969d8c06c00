use serde_json::Value;

/// Title phrases that mark a candidate as board chrome rather than a job
/// posting: alert signups, pagination stubs, account prompts.
pub const SPAM_PHRASES: [&str; 12] = [
    "similar jobs",
    "related jobs",
    "more jobs",
    "view all",
    "job alert",
    "email alert",
    "save search",
    "job search",
    "sign up",
    "create account",
    "login",
    "register",
];

/// Pre-construction gate over an untrusted extraction candidate. Rejecting
/// junk here keeps the construction path free of avoidable errors; field
/// validation at construction time is a second, independent gate.
pub fn is_valid_job(candidate: &Value) -> bool {
    let Some(obj) = candidate.as_object() else {
        return false;
    };

    let title = obj
        .get("job_title")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");
    let company = obj
        .get("company_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");

    if title.is_empty() || company.is_empty() {
        return false;
    }

    let title_lower = title.to_lowercase();
    !SPAM_PHRASES
        .iter()
        .any(|phrase| title_lower.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_objects() {
        assert!(!is_valid_job(&json!("Software Engineer")));
        assert!(!is_valid_job(&json!(["job_title", "company_name"])));
        assert!(!is_valid_job(&json!(null)));
    }

    #[test]
    fn rejects_missing_or_blank_required_fields() {
        assert!(!is_valid_job(&json!({})));
        assert!(!is_valid_job(&json!({ "job_title": "Engineer" })));
        assert!(!is_valid_job(&json!({ "company_name": "Tech Corp" })));
        assert!(!is_valid_job(&json!({
            "job_title": "   ",
            "company_name": "Tech Corp"
        })));
        assert!(!is_valid_job(&json!({
            "job_title": "Engineer",
            "company_name": "  "
        })));
    }

    #[test]
    fn rejects_spam_titles_case_insensitively() {
        for title in [
            "Similar Jobs You May Like",
            "SIGN UP for job alerts",
            "View All Openings",
            "Create Account to apply",
        ] {
            let candidate = json!({
                "job_title": title,
                "company_name": "Tech Corp"
            });
            assert!(!is_valid_job(&candidate), "should reject: {title}");
        }
    }

    #[test]
    fn accepts_a_real_posting() {
        let candidate = json!({
            "job_title": "Senior Software Engineer",
            "company_name": "Tech Corp",
            "location": "Remote"
        });
        assert!(is_valid_job(&candidate));
    }
}
