//! Debate state machine and per-debate session tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::council::ParticipantRole;

/// Phase of a debate session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebatePhase {
    /// Session created, no call issued yet.
    Idle,
    /// Both members analysing the query concurrently.
    Round1Running,
    /// Member A critiquing member B's analysis.
    Round2AComputing,
    /// Member B answering member A.
    Round2BComputing,
    /// Chair synthesising the verdict.
    Round3Computing,
    /// All five responses collected.
    Complete,
    /// A stage failed; the debate was abandoned.
    Failed,
}

impl DebatePhase {
    /// Whether this is a terminal phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Valid transitions from this phase.
    pub fn valid_transitions(self) -> &'static [DebatePhase] {
        match self {
            Self::Idle => &[Self::Round1Running, Self::Failed],
            Self::Round1Running => &[Self::Round2AComputing, Self::Failed],
            Self::Round2AComputing => &[Self::Round2BComputing, Self::Failed],
            Self::Round2BComputing => &[Self::Round3Computing, Self::Failed],
            Self::Round3Computing => &[Self::Complete, Self::Failed],
            Self::Complete | Self::Failed => &[],
        }
    }

    /// The phase that follows on success, if any.
    pub fn next(self) -> Option<DebatePhase> {
        match self {
            Self::Idle => Some(Self::Round1Running),
            Self::Round1Running => Some(Self::Round2AComputing),
            Self::Round2AComputing => Some(Self::Round2BComputing),
            Self::Round2BComputing => Some(Self::Round3Computing),
            Self::Round3Computing => Some(Self::Complete),
            Self::Complete | Self::Failed => None,
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Round1Running => write!(f, "round1_running"),
            Self::Round2AComputing => write!(f, "round2a_computing"),
            Self::Round2BComputing => write!(f, "round2b_computing"),
            Self::Round3Computing => write!(f, "round3_computing"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One of the five model calls of a debate, keyed by (round, participant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateStage {
    Round1MemberA,
    Round1MemberB,
    Round2MemberA,
    Round2MemberB,
    Round3Chair,
}

impl DebateStage {
    /// All stages in protocol order.
    pub const ALL: [DebateStage; 5] = [
        Self::Round1MemberA,
        Self::Round1MemberB,
        Self::Round2MemberA,
        Self::Round2MemberB,
        Self::Round3Chair,
    ];

    pub fn round(self) -> u8 {
        match self {
            Self::Round1MemberA | Self::Round1MemberB => 1,
            Self::Round2MemberA | Self::Round2MemberB => 2,
            Self::Round3Chair => 3,
        }
    }

    pub fn role(self) -> ParticipantRole {
        match self {
            Self::Round1MemberA | Self::Round2MemberA => ParticipantRole::MemberA,
            Self::Round1MemberB | Self::Round2MemberB => ParticipantRole::MemberB,
            Self::Round3Chair => ParticipantRole::Chair,
        }
    }
}

impl std::fmt::Display for DebateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "round{}/{}", self.round(), self.role())
    }
}

/// A phase transition record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateTransition {
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
}

/// Error for invalid state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: DebatePhase,
    pub to: DebatePhase,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid transition {} → {} (allowed: {:?})",
            self.from,
            self.to,
            self.from.valid_transitions()
        )
    }
}

impl std::error::Error for TransitionError {}

/// State and transition history of one debate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSession {
    /// Unique session identifier.
    pub id: String,
    pub phase: DebatePhase,
    pub transitions: Vec<DebateTransition>,
    pub created_at: DateTime<Utc>,
}

impl DebateSession {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            phase: DebatePhase::Idle,
            transitions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Session with a fresh random id.
    pub fn generate() -> Self {
        Self::new(&uuid::Uuid::new_v4().to_string())
    }

    /// Transition to a new phase with a reason.
    pub fn transition(&mut self, to: DebatePhase, reason: &str) -> Result<(), TransitionError> {
        if !self.phase.valid_transitions().contains(&to) {
            return Err(TransitionError {
                from: self.phase,
                to,
            });
        }

        self.transitions.push(DebateTransition {
            from: self.phase,
            to,
            timestamp: Utc::now(),
            reason: reason.to_string(),
        });
        self.phase = to;
        Ok(())
    }

    /// Move to the next phase of the protocol.
    pub fn advance(&mut self, reason: &str) -> Result<DebatePhase, TransitionError> {
        let to = self.phase.next().ok_or(TransitionError {
            from: self.phase,
            to: self.phase,
        })?;
        self.transition(to, reason)?;
        Ok(to)
    }

    /// Mark the debate failed. No-op once terminal.
    pub fn fail(&mut self, reason: &str) {
        if !self.phase.is_terminal() {
            // Failed is valid from every non-terminal phase
            let _ = self.transition(DebatePhase::Failed, reason);
        }
    }

    /// Compact status line.
    pub fn status_line(&self) -> String {
        format!(
            "[{}] debate={} | {} transitions",
            self.phase,
            self.id,
            self.transitions.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = DebateSession::new("d-001");
        assert_eq!(session.phase, DebatePhase::Idle);
        assert!(session.transitions.is_empty());
        assert!(!session.phase.is_terminal());
    }

    #[test]
    fn test_full_protocol_walk() {
        let mut session = DebateSession::new("d-001");
        let mut visited = Vec::new();
        while let Ok(phase) = session.advance("ok") {
            visited.push(phase);
        }
        assert_eq!(
            visited,
            vec![
                DebatePhase::Round1Running,
                DebatePhase::Round2AComputing,
                DebatePhase::Round2BComputing,
                DebatePhase::Round3Computing,
                DebatePhase::Complete,
            ]
        );
        assert!(session.phase.is_terminal());
        assert_eq!(session.transitions.len(), 5);
    }

    #[test]
    fn test_failed_reachable_from_every_non_terminal_phase() {
        for steps in 0..5 {
            let mut session = DebateSession::new("d-001");
            for _ in 0..steps {
                session.advance("ok").unwrap();
            }
            session.fail("call failed");
            assert_eq!(session.phase, DebatePhase::Failed);
        }
    }

    #[test]
    fn test_cannot_skip_phases() {
        let mut session = DebateSession::new("d-001");
        let err = session
            .transition(DebatePhase::Round3Computing, "skip")
            .unwrap_err();
        assert_eq!(err.from, DebatePhase::Idle);
        assert_eq!(err.to, DebatePhase::Round3Computing);
    }

    #[test]
    fn test_terminal_phases_are_final() {
        let mut session = DebateSession::new("d-001");
        session.advance("start").unwrap();
        session.fail("round 1 failed");
        assert!(session.advance("retry").is_err());
        assert!(session
            .transition(DebatePhase::Round1Running, "restart")
            .is_err());
        session.fail("again");
        assert_eq!(session.transitions.len(), 2);
    }

    #[test]
    fn test_stage_keys() {
        assert_eq!(DebateStage::Round1MemberB.to_string(), "round1/member_b");
        assert_eq!(DebateStage::Round3Chair.to_string(), "round3/chair");
        assert_eq!(DebateStage::Round2MemberA.role(), ParticipantRole::MemberA);
    }

    #[test]
    fn test_status_line() {
        let mut session = DebateSession::new("d-042");
        session.advance("start").unwrap();
        let line = session.status_line();
        assert!(line.contains("[round1_running]"));
        assert!(line.contains("d-042"));
    }
}
