//! Markdown rendering of a finished debate.

use serde::{Deserialize, Serialize};

use super::orchestrator::DebateResult;
use crate::council::CouncilConfig;

/// Labels used for the section headers of the rendered debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNames {
    pub member_a: String,
    pub member_b: String,
    /// Shown in the round-3 header.
    pub chair: String,
}

impl From<&CouncilConfig> for DisplayNames {
    fn from(config: &CouncilConfig) -> Self {
        Self {
            member_a: config.member_a.display_name.clone(),
            member_b: config.member_b.display_name.clone(),
            chair: config.chair.model.clone(),
        }
    }
}

/// Render the five responses into one document, rounds in protocol order.
pub fn format_debate(result: &DebateResult, names: &DisplayNames) -> String {
    format!(
        "# LLM Council Debate\n\
         \n\
         ## Round 1: Independent Analysis\n\
         \n\
         ### {member_a}\n\
         {round1_a}\n\
         \n\
         ---\n\
         \n\
         ### {member_b}\n\
         {round1_b}\n\
         \n\
         ---\n\
         \n\
         ## Round 2: Chain-of-Debate\n\
         \n\
         ### Member A's Critique\n\
         {round2_a}\n\
         \n\
         ---\n\
         \n\
         ### Member B's Response\n\
         {round2_b}\n\
         \n\
         ---\n\
         \n\
         ## Round 3: Chair's Final Verdict ({chair})\n\
         \n\
         {round3}\n",
        member_a = names.member_a,
        member_b = names.member_b,
        chair = names.chair,
        round1_a = result.round1_member_a,
        round1_b = result.round1_member_b,
        round2_a = result.round2_member_a,
        round2_b = result.round2_member_b,
        round3 = result.round3_chair,
    )
}
