use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{info, warn};

use crate::boards::{self, SourceDescriptor};
use crate::dedupe;
use crate::pipeline::{ExtractionPipeline, SchemaExtractor};
use crate::records::{ContactRecord, JobRecord};
use crate::renderer::PageRenderer;
use crate::scoring;

/// Stats from one search run. `boards_empty` counts every board that
/// contributed zero records; the pipeline recovers failures internally, so
/// failed and genuinely empty boards are indistinguishable here.
#[derive(Debug, Default)]
pub struct SearchStats {
    pub boards_searched: u32,
    pub boards_empty: u32,
    pub records_extracted: u32,
    pub records_deduplicated: u32,
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Search Run Complete ===")?;
        writeln!(f, "Boards searched:      {}", self.boards_searched)?;
        writeln!(f, "Boards with no jobs:  {}", self.boards_empty)?;
        writeln!(f, "Records extracted:    {}", self.records_extracted)?;
        writeln!(f, "Duplicates removed:   {}", self.records_deduplicated)?;
        Ok(())
    }
}

/// Pacing knobs for the orchestrator. Delays are fixed, not adaptive;
/// adaptive backoff belongs to the rendering collaborator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Regular boards queried concurrently per batch.
    pub max_parallel: usize,
    /// Pause between regular-board batches.
    pub rate_limit_delay: Duration,
    /// Pause after each stealth board. Longer: concurrent or rapid-fire
    /// requests against protected boards raise detection risk.
    pub stealth_delay: Duration,
    /// Contacts kept after ranking.
    pub max_connections_per_job: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_parallel: 5,
            rate_limit_delay: Duration::from_secs(2),
            stealth_delay: Duration::from_secs(5),
            max_connections_per_job: 20,
        }
    }
}

/// Fan-out controller: builds per-board query URLs, runs the extraction
/// pipeline against every configured board, stamps provenance, merges and
/// deduplicates. A board failing contributes zero records; a run where every
/// board fails returns an empty list, never an error.
pub struct BoardOrchestrator {
    pipeline: ExtractionPipeline,
    boards: Vec<SourceDescriptor>,
    config: OrchestratorConfig,
}

impl BoardOrchestrator {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        extractor: Arc<dyn SchemaExtractor>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            pipeline: ExtractionPipeline::new(renderer, extractor),
            boards: boards::job_boards(),
            config,
        }
    }

    /// Replace the static board table. Used by tests and custom deployments.
    pub fn with_boards(mut self, boards: Vec<SourceDescriptor>) -> Self {
        self.boards = boards;
        self
    }

    pub fn boards(&self) -> &[SourceDescriptor] {
        &self.boards
    }

    /// Search every configured board and return the merged, deduplicated
    /// result set.
    pub async fn search(&self, keywords: &str, location: &str) -> Vec<JobRecord> {
        let (stats, jobs) = self.search_with_stats(keywords, location).await;
        info!("{stats}");
        jobs
    }

    pub async fn search_with_stats(
        &self,
        keywords: &str,
        location: &str,
    ) -> (SearchStats, Vec<JobRecord>) {
        info!(keywords, location, "Starting job search");

        let mut stats = SearchStats::default();
        let mut all_jobs: Vec<JobRecord> = Vec::new();

        let stealth: Vec<&SourceDescriptor> =
            self.boards.iter().filter(|b| b.needs_stealth).collect();
        let regular: Vec<&SourceDescriptor> =
            self.boards.iter().filter(|b| !b.needs_stealth).collect();

        // Protected boards are queried strictly one at a time with a longer
        // pause between them.
        if !stealth.is_empty() {
            info!(count = stealth.len(), "Querying stealth boards sequentially");
            for board in &stealth {
                let jobs = self.search_board(board, keywords, location).await;
                self.tally(board, &jobs, &mut stats);
                all_jobs.extend(jobs);
                tokio::time::sleep(self.config.stealth_delay).await;
            }
        }

        // Regular boards run in fixed-size concurrent batches. join_all
        // preserves submission order, so attribution order is deterministic
        // regardless of completion order.
        if !regular.is_empty() {
            info!(
                count = regular.len(),
                batch_size = self.config.max_parallel,
                "Querying regular boards in batches"
            );
            let mut batches = regular.chunks(self.config.max_parallel).peekable();
            while let Some(batch) = batches.next() {
                let results = join_all(
                    batch
                        .iter()
                        .map(|board| self.search_board(board, keywords, location)),
                )
                .await;

                for (board, jobs) in batch.iter().zip(results) {
                    self.tally(board, &jobs, &mut stats);
                    all_jobs.extend(jobs);
                }

                if batches.peek().is_some() {
                    tokio::time::sleep(self.config.rate_limit_delay).await;
                }
            }
        }

        let before = all_jobs.len();
        let unique = dedupe::dedupe_jobs(all_jobs);
        stats.records_deduplicated = (before - unique.len()) as u32;

        info!(total = unique.len(), "Unique jobs found");
        (stats, unique)
    }

    /// Query one board and stamp provenance onto every record it produced.
    async fn search_board(
        &self,
        board: &SourceDescriptor,
        keywords: &str,
        location: &str,
    ) -> Vec<JobRecord> {
        let search_url = boards::build_search_url(board, keywords, location);
        info!(
            board = board.name,
            url = search_url.as_str(),
            stealth = board.needs_stealth,
            "Searching board"
        );

        let mut jobs = self.pipeline.extract_jobs(&search_url, board).await;

        for job in &mut jobs {
            job.source_name = Some(board.name.to_string());
            job.source_url = Some(search_url.clone());
            // Boards often emit relative apply links.
            if let Some(apply) = job.application_url.take() {
                job.application_url = Some(boards::resolve_url(&apply, board.base_url));
            }
        }

        jobs
    }

    fn tally(&self, board: &SourceDescriptor, jobs: &[JobRecord], stats: &mut SearchStats) {
        stats.boards_searched += 1;
        stats.records_extracted += jobs.len() as u32;
        if jobs.is_empty() {
            stats.boards_empty += 1;
            info!(board = board.name, "No jobs found");
        } else {
            info!(board = board.name, count = jobs.len(), "Jobs found");
        }
    }

    /// Find professional contacts relevant to one job: query people search
    /// sequentially (protected source), score against the job, rank, keep
    /// the top N.
    pub async fn find_connections(&self, job: &JobRecord) -> Vec<ContactRecord> {
        info!(
            title = job.title.as_str(),
            company = job.company.as_str(),
            "Finding connections"
        );

        let search_terms = [
            format!("{} {}", job.company, job.title),
            format!("{} engineer", job.company),
        ];

        let mut contacts: Vec<ContactRecord> = Vec::new();
        for term in &search_terms {
            let url = format!(
                "https://www.linkedin.com/search/results/people/?keywords={}",
                boards::quote_plus(term)
            );
            let found = self
                .pipeline
                .extract_contacts(&url, &job.company, &job.title)
                .await;
            if found.is_empty() {
                warn!(term = term.as_str(), "No contacts extracted");
            }
            contacts.extend(found);
            tokio::time::sleep(self.config.stealth_delay).await;
        }

        scoring::score_connections(&mut contacts, job);
        contacts.sort_by(|a, b| {
            b.relevance_score
                .unwrap_or(0.0)
                .total_cmp(&a.relevance_score.unwrap_or(0.0))
        });
        contacts.truncate(self.config.max_connections_per_job);

        info!(count = contacts.len(), "Connections ranked");
        contacts
    }
}
