//! LLM Council coordination library
//!
//! This library provides:
//! - Council configuration: three seats (two members and a chair), each bound
//!   to one model deployment
//! - A model invoker with per-attempt timeouts and exponential-backoff retries
//! - The debate orchestrator running the three-round protocol
//!
//! # Protocol
//!
//! 1. Round 1: both members answer the query independently and concurrently
//! 2. Round 2: member A critiques member B, then member B answers member A
//! 3. Round 3: the chair reads the full transcript and delivers the verdict
//!
//! # Usage
//!
//! ```no_run
//! use coordination::{format_debate, CouncilConfig, DebateOrchestrator};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CouncilConfig::new("https://acct.openai.azure.com", "api-key");
//! let orchestrator = DebateOrchestrator::from_config(config)?;
//! let result = orchestrator.conduct_debate("Should we use microservices?").await?;
//! println!("{}", format_debate(&result, &orchestrator.display_names()));
//! # Ok(())
//! # }
//! ```

pub mod council;
pub mod debate;
pub mod resilience;

pub use council::{
    normalize_endpoint, AzureChatBackend, CallFailure, ChatBackend, ChatRequest, ConfigError,
    CouncilConfig, InvokeError, ModelInvoker, ParticipantRole, ParticipantSpec, RetryingInvoker,
};
pub use debate::{
    format_debate, DebateError, DebateNotice, DebateOrchestrator, DebatePhase, DebateResult,
    DebateSession, DebateStage, DisplayNames,
};
pub use resilience::RetryPolicy;
