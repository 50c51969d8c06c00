use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jobscout::config::Config;
use jobscout::orchestrator::BoardOrchestrator;
use jobscout::pipeline::LlmExtractor;
use jobscout::records::ContactRecord;
use jobscout::renderer::ServiceRenderer;
use jobscout::report::SearchReport;
use llm_client::LlmClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jobscout=info".parse()?))
        .init();

    info!("JobScout starting...");

    let config = Config::from_env();

    let mut args = std::env::args().skip(1);
    let keywords = args
        .next()
        .unwrap_or_else(|| "software engineer".to_string());
    let location = args.next().unwrap_or_else(|| "remote".to_string());

    let renderer = Arc::new(ServiceRenderer::new(
        &config.render_url,
        config.render_token.as_deref(),
    ));

    let mut llm = LlmClient::new(&config.llm_api_key, &config.llm_model);
    if let Some(base) = &config.llm_base_url {
        llm = llm.with_base_url(base);
    }
    let extractor = Arc::new(LlmExtractor::with_client(llm));

    let orchestrator = BoardOrchestrator::new(renderer, extractor, config.orchestrator());
    let boards_searched: Vec<String> = orchestrator
        .boards()
        .iter()
        .map(|b| b.name.to_string())
        .collect();

    let jobs = orchestrator.search(&keywords, &location).await;
    info!(count = jobs.len(), "Search complete");

    // Each ranked job costs two stealth people-search queries with long
    // delays, so ranking is opt-in and covers only the top posting.
    let mut connections: Vec<ContactRecord> = Vec::new();
    if config.find_connections {
        if let Some(job) = jobs.first() {
            connections = orchestrator.find_connections(job).await;
        }
    }

    let report = SearchReport::new(jobs, connections, boards_searched);

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output dir {}", config.output_dir))?;
    let filename = format!(
        "job_search_results_{}.json",
        Utc::now().format("%Y%m%d_%H%M%S")
    );
    let path = Path::new(&config.output_dir).join(&filename);
    fs::write(&path, report.to_pretty_json()?)
        .with_context(|| format!("writing report to {}", path.display()))?;

    info!(path = %path.display(), "Report written");
    Ok(())
}
