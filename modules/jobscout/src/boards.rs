use url::form_urlencoded;

/// One configured job board: a unique name, a search URL template with
/// `{keywords}`/`{location}` placeholders, and whether the board needs the
/// elevated-stealth rendering profile.
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    pub name: &'static str,
    pub base_url: &'static str,
    pub search_pattern: &'static str,
    pub needs_stealth: bool,
}

/// The full board table. Stealth boards are the ones known to run aggressive
/// automated-traffic detection; the orchestrator never batches them.
pub fn job_boards() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor {
            name: "LinkedIn",
            base_url: "https://www.linkedin.com",
            search_pattern: "/jobs/search/?keywords={keywords}&location={location}&f_TPR=r86400",
            needs_stealth: true,
        },
        SourceDescriptor {
            name: "Indeed",
            base_url: "https://www.indeed.com",
            search_pattern: "/jobs?q={keywords}&l={location}&fromage=1&sort=date",
            needs_stealth: true,
        },
        SourceDescriptor {
            name: "Glassdoor",
            base_url: "https://www.glassdoor.com",
            search_pattern: "/Job/jobs.htm?sc.keyword={keywords}&locT=C&locId=&locKeyword={location}",
            needs_stealth: true,
        },
        SourceDescriptor {
            name: "ZipRecruiter",
            base_url: "https://www.ziprecruiter.com",
            search_pattern: "/jobs/search?search={keywords}&location={location}&days=1",
            needs_stealth: true,
        },
        SourceDescriptor {
            name: "AngelList",
            base_url: "https://angel.co",
            search_pattern: "/jobs?keywords={keywords}&location={location}",
            needs_stealth: false,
        },
        SourceDescriptor {
            name: "Remote.co",
            base_url: "https://remote.co",
            search_pattern: "/remote-jobs/search/?search_keywords={keywords}",
            needs_stealth: false,
        },
        SourceDescriptor {
            name: "SimplyHired",
            base_url: "https://www.simplyhired.com",
            search_pattern: "/search?q={keywords}&l={location}&fdb=1",
            needs_stealth: true,
        },
        SourceDescriptor {
            name: "Monster",
            base_url: "https://www.monster.com",
            search_pattern: "/jobs/search?q={keywords}&where={location}&tm=1",
            needs_stealth: true,
        },
        SourceDescriptor {
            name: "Dice",
            base_url: "https://www.dice.com",
            search_pattern: "/jobs?q={keywords}&location={location}&filters.postedDate=ONE",
            needs_stealth: true,
        },
    ]
}

/// Build the fully-encoded query URL for one board.
pub fn build_search_url(board: &SourceDescriptor, keywords: &str, location: &str) -> String {
    let path = board
        .search_pattern
        .replace("{keywords}", &quote_plus(keywords))
        .replace("{location}", &quote_plus(location));
    format!("{}{}", board.base_url, path)
}

/// Percent-encode a query value, with spaces as `+`.
pub fn quote_plus(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Resolve a possibly-relative URL against a board's base URL. Absolute URLs
/// pass through unchanged; protocol-relative URLs get https.
pub fn resolve_url(url: &str, base_url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else if url.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), url)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_names_are_unique() {
        let boards = job_boards();
        let mut names: Vec<_> = boards.iter().map(|b| b.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), boards.len());
    }

    #[test]
    fn search_url_encodes_keywords_and_location() {
        let boards = job_boards();
        let indeed = boards.iter().find(|b| b.name == "Indeed").unwrap();
        let url = build_search_url(indeed, "software engineer", "San Francisco, CA");
        assert_eq!(
            url,
            "https://www.indeed.com/jobs?q=software+engineer&l=San+Francisco%2C+CA&fromage=1&sort=date"
        );
    }

    #[test]
    fn quote_plus_uses_plus_for_spaces() {
        assert_eq!(quote_plus("data scientist"), "data+scientist");
        assert_eq!(quote_plus("C++ & Rust"), "C%2B%2B+%26+Rust");
    }

    #[test]
    fn resolve_absolute_url_passes_through() {
        assert_eq!(
            resolve_url("https://x.com/y", "https://jobboard.com"),
            "https://x.com/y"
        );
    }

    #[test]
    fn resolve_protocol_relative_gets_https() {
        assert_eq!(
            resolve_url("//cdn.example.com/x", "https://jobboard.com"),
            "https://cdn.example.com/x"
        );
    }

    #[test]
    fn resolve_rooted_path_joins_base() {
        assert_eq!(
            resolve_url("/job/123", "https://jobboard.com"),
            "https://jobboard.com/job/123"
        );
        assert_eq!(
            resolve_url("/job/123", "https://jobboard.com/"),
            "https://jobboard.com/job/123"
        );
    }

    #[test]
    fn resolve_bare_path_joins_with_slash() {
        assert_eq!(
            resolve_url("job/123", "https://jobboard.com"),
            "https://jobboard.com/job/123"
        );
    }
}
