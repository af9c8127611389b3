//! Runner-side pieces of the LLM council: layered settings, the failure
//! report, the deployment check and tracing setup used by `llm-council`.

pub mod check;
pub mod config;
pub mod report;
pub mod telemetry;

pub use check::{check_deployments, check_invoker, render_outcomes, CheckOutcome};
pub use config::{CouncilSettings, SettingsError};
pub use report::{failure_report, ConfigStatus, EMPTY_QUERY_MESSAGE};
