pub mod boards;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod records;
pub mod renderer;
pub mod report;
pub mod scoring;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod validator;
