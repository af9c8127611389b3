//! Prompt builder for the three council seats.
//!
//! Pure string assembly: fixed system prompts per seat, and per-round user
//! messages built from the query and earlier responses. Nothing here can
//! fail or touch the network.

const MEMBER_A_PROMPT: &str = concat!(
    "You are Council Member A, an analytical AI expert who provides thorough, \n",
    "data-driven analysis. Your role is to:\n",
    "\n",
    "1. In Round 1: Provide your independent analysis of the query with clear reasoning\n",
    "2. In Round 2: Review Council Member B's perspective and either:\n",
    "   - Challenge their assumptions with evidence\n",
    "   - Agree and strengthen their points\n",
    "   - Offer alternative viewpoints\n",
    "\n",
    "Be direct, analytical, and evidence-based in your responses.",
);

const MEMBER_B_PROMPT: &str = concat!(
    "You are Council Member B, a critical thinking AI expert who questions \n",
    "assumptions and explores edge cases. Your role is to:\n",
    "\n",
    "1. In Round 1: Provide your independent analysis focusing on risks, limitations, and alternatives\n",
    "2. In Round 2: Review Council Member A's perspective and either:\n",
    "   - Point out overlooked considerations or flaws\n",
    "   - Acknowledge strong points\n",
    "   - Present contrarian views with reasoning\n",
    "\n",
    "Be skeptical, thorough, and constructively critical.",
);

const CHAIR_PROMPT: &str = concat!(
    "You are the Chair, the final decision maker who synthesizes the council's debate.\n",
    "\n",
    "Your role is to review the ENTIRE debate thread and produce a structured final verdict with:\n",
    "\n",
    "## Areas of Complete Consensus\n",
    "List all points where both Council Members agreed, either initially or after debate.\n",
    "\n",
    "## Key Debates  \n",
    "Highlight areas where the members disagreed. For each:\n",
    "- State the disagreement clearly\n",
    "- Summarize Member A's position and reasoning\n",
    "- Summarize Member B's position and reasoning\n",
    "\n",
    "## The Verdict\n",
    "Based on the complete debate, provide your final decision/recommendation. Explain:\n",
    "- Which perspectives you're adopting and why\n",
    "- How you're resolving any disagreements\n",
    "- Your conclusive answer to the original query\n",
    "\n",
    "Be objective, balanced, and make clear final judgments.",
);

pub fn member_a_system_prompt() -> &'static str {
    MEMBER_A_PROMPT
}

pub fn member_b_system_prompt() -> &'static str {
    MEMBER_B_PROMPT
}

pub fn chair_system_prompt() -> &'static str {
    CHAIR_PROMPT
}

/// Round 1 sends the query unchanged to both members.
pub fn round1_user_message(query: &str) -> String {
    query.to_string()
}

/// Member A critiques member B's round-1 analysis.
pub fn round2_user_message_for_a(query: &str, round1_b: &str) -> String {
    format!(
        "Original Query: {query}\n\n\
         Council Member B's Analysis:\n\
         {round1_b}\n\n\
         Now provide your critique, counterarguments, or supporting arguments to Member B's analysis."
    )
}

/// Member B answers member A's opening analysis and critique.
pub fn round2_user_message_for_b(query: &str, round1_a: &str, round2_a: &str) -> String {
    format!(
        "Original Query: {query}\n\n\
         Council Member A's Initial Analysis:\n\
         {round1_a}\n\n\
         Council Member A's Critique of Your Analysis:\n\
         {round2_a}\n\n\
         Now respond: critique Member A's points and defend or refine your position."
    )
}

/// Full transcript handed to the chair for the verdict.
pub fn chair_user_message(
    query: &str,
    round1_a: &str,
    round1_b: &str,
    round2_a: &str,
    round2_b: &str,
) -> String {
    format!(
        "Original Query: {query}\n\n\
         === FULL DEBATE TRANSCRIPT ===\n\n\
         ROUND 1 - Council Member A (Analytical):\n\
         {round1_a}\n\n\
         ROUND 1 - Council Member B (Critical):\n\
         {round1_b}\n\n\
         ROUND 2 - Member A's Critique:\n\
         {round2_a}\n\n\
         ROUND 2 - Member B's Response:\n\
         {round2_b}\n\n\
         === END TRANSCRIPT ===\n\n\
         Now provide your structured final verdict following the format specified in your instructions."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1_is_query_verbatim() {
        assert_eq!(
            round1_user_message("Should we use microservices?"),
            "Should we use microservices?"
        );
    }

    #[test]
    fn test_round2_for_a_layout() {
        let msg = round2_user_message_for_a("Q?", "B says no");
        assert_eq!(
            msg,
            "Original Query: Q?\n\nCouncil Member B's Analysis:\nB says no\n\n\
             Now provide your critique, counterarguments, or supporting arguments to Member B's analysis."
        );
    }

    #[test]
    fn test_round2_for_b_embeds_both_a_texts() {
        let msg = round2_user_message_for_b("Q?", "A opening", "A critique");
        assert!(msg.starts_with("Original Query: Q?\n\n"));
        let opening = msg.find("Council Member A's Initial Analysis:\nA opening").unwrap();
        let critique = msg
            .find("Council Member A's Critique of Your Analysis:\nA critique")
            .unwrap();
        assert!(opening < critique);
        assert!(msg.ends_with("defend or refine your position."));
    }

    #[test]
    fn test_chair_message_orders_transcript() {
        let msg = chair_user_message("Q?", "A1", "B1", "A2", "B2");
        let positions: Vec<usize> = [
            "=== FULL DEBATE TRANSCRIPT ===",
            "ROUND 1 - Council Member A (Analytical):\nA1",
            "ROUND 1 - Council Member B (Critical):\nB1",
            "ROUND 2 - Member A's Critique:\nA2",
            "ROUND 2 - Member B's Response:\nB2",
            "=== END TRANSCRIPT ===",
        ]
        .iter()
        .map(|needle| msg.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_system_prompts_keep_original_line_breaks() {
        assert!(member_a_system_prompt().contains("thorough, \ndata-driven analysis"));
        assert!(member_b_system_prompt().contains("who questions \nassumptions"));
        assert!(chair_system_prompt().contains("## Key Debates  \nHighlight"));
        for section in [
            "## Areas of Complete Consensus",
            "## Key Debates",
            "## The Verdict",
        ] {
            assert!(chair_system_prompt().contains(section));
        }
    }

    #[test]
    fn test_builders_accept_empty_prior_text() {
        let msg = chair_user_message("Q?", "", "", "", "");
        assert!(msg.contains("=== END TRANSCRIPT ==="));
    }
}
