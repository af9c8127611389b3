//! Debate Orchestration: three-round council protocol
//!
//! Two members analyse a query independently, critique each other in a
//! fixed order, and a chair synthesises the transcript into a verdict.
//! Every debate issues exactly five model calls when it succeeds.
//!
//! # Debate Flow
//!
//! ```text
//! Idle → Round1Running ──────────→ Round2AComputing → Round2BComputing → Round3Computing → Complete
//!          │  member A ─┐              │ A critiques B    │ B answers A      │ chair verdict
//!          │  member B ─┘ (concurrent) │                  │                  │
//!          └──────────────┬────────────┴──────────────────┴──────────────────┘
//!                         └─ any call exhausts its retries → Failed
//! ```

pub mod format;
pub mod orchestrator;
pub mod prompts;
pub mod state;

pub use format::{format_debate, DisplayNames};
pub use orchestrator::{DebateError, DebateNotice, DebateOrchestrator, DebateResult};
pub use state::{DebatePhase, DebateSession, DebateStage, DebateTransition, TransitionError};
