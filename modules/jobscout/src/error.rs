use thiserror::Error;

/// Failure kinds inside the extraction-and-reconciliation pipeline. None of
/// these are fatal to a search run: construction and parse failures are
/// recovered per candidate, source failures per board. A run that loses every
/// source still returns an empty result list to the caller.
#[derive(Error, Debug)]
pub enum JobScoutError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Source failure for {board}: {message}")]
    Source { board: String, message: String },
}
