//! Debate orchestrator: drives the fixed three-round, five-call protocol.
//!
//! Ties together the state machine, prompt builder and model invoker to run
//! one debate end-to-end. The orchestrator is the only holder of
//! cross-round state, and that state lives on the stack of a single
//! [`DebateOrchestrator::conduct_debate`] call, so concurrent debates share
//! nothing but the invoker's connection pool.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, error, info};

use super::format::DisplayNames;
use super::prompts;
use super::state::{DebatePhase, DebateSession, DebateStage, TransitionError};
use crate::council::{
    AzureChatBackend, ChatRequest, ConfigError, CouncilConfig, InvokeError, ModelInvoker,
    RetryingInvoker,
};

/// Everything a debate produced: the query and the five responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateResult {
    pub debate_id: String,
    pub query: String,
    pub round1_member_a: String,
    pub round1_member_b: String,
    pub round2_member_a: String,
    pub round2_member_b: String,
    pub round3_chair: String,
    /// Wall-clock duration of the whole debate.
    pub elapsed_ms: u64,
}

impl DebateResult {
    /// Response produced at the given stage.
    pub fn response(&self, stage: DebateStage) -> &str {
        match stage {
            DebateStage::Round1MemberA => &self.round1_member_a,
            DebateStage::Round1MemberB => &self.round1_member_b,
            DebateStage::Round2MemberA => &self.round2_member_a,
            DebateStage::Round2MemberB => &self.round2_member_b,
            DebateStage::Round3Chair => &self.round3_chair,
        }
    }
}

/// Debate-level failure. No partial result accompanies it.
#[derive(Debug, Error)]
pub enum DebateError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("debate failed at {stage}: {source}")]
    StageFailed {
        stage: DebateStage,
        #[source]
        source: InvokeError,
    },

    #[error("debate exceeded its {deadline:?} deadline during {phase}")]
    DeadlineExceeded {
        deadline: Duration,
        phase: DebatePhase,
    },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl DebateError {
    /// Stage whose call failed, when the failure came from a model call.
    pub fn stage(&self) -> Option<DebateStage> {
        match self {
            Self::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Advisory notice sent once, before round 1 begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebateNotice {
    Started { debate_id: String },
}

impl DebateNotice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Started { .. } => {
                "Initializing LLM Council...\n\nRound 1: Council members analyzing independently..."
            }
        }
    }
}

/// Runs debates for one validated council configuration.
pub struct DebateOrchestrator {
    config: CouncilConfig,
    invoker: Arc<dyn ModelInvoker>,
}

impl DebateOrchestrator {
    /// Create an orchestrator around any invoker. Fails on invalid config.
    pub fn new(config: CouncilConfig, invoker: Arc<dyn ModelInvoker>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, invoker })
    }

    /// Create an orchestrator calling the configured Azure endpoint.
    pub fn from_config(config: CouncilConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let backend = AzureChatBackend::from_config(&config)
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        let invoker = RetryingInvoker::new(backend, config.retry.clone(), config.timeout);
        Self::new(config, Arc::new(invoker))
    }

    pub fn display_names(&self) -> DisplayNames {
        DisplayNames::from(&self.config)
    }

    /// Run one complete debate on `query`.
    pub async fn conduct_debate(&self, query: &str) -> Result<DebateResult, DebateError> {
        self.run(query, None).await
    }

    /// Like [`Self::conduct_debate`], announcing the start on `notice`.
    pub async fn conduct_debate_with_notice(
        &self,
        query: &str,
        notice: oneshot::Sender<DebateNotice>,
    ) -> Result<DebateResult, DebateError> {
        self.run(query, Some(notice)).await
    }

    async fn run(
        &self,
        query: &str,
        notice: Option<oneshot::Sender<DebateNotice>>,
    ) -> Result<DebateResult, DebateError> {
        if query.trim().is_empty() {
            return Err(DebateError::EmptyQuery);
        }

        let mut session = DebateSession::generate();
        let started = Instant::now();

        let outcome = match self.config.debate_deadline {
            Some(deadline) => {
                let bounded =
                    tokio::time::timeout(deadline, self.execute(query, &mut session, notice)).await;
                match bounded {
                    Ok(outcome) => outcome,
                    Err(_) => Err(DebateError::DeadlineExceeded {
                        deadline,
                        phase: session.phase,
                    }),
                }
            }
            None => self.execute(query, &mut session, notice).await,
        };

        match outcome {
            Ok(mut result) => {
                result.elapsed_ms = started.elapsed().as_millis() as u64;
                info!(
                    debate = %session.id,
                    elapsed_ms = result.elapsed_ms,
                    "debate complete"
                );
                Ok(result)
            }
            Err(e) => {
                session.fail(&e.to_string());
                error!(
                    debate = %session.id,
                    status = %session.status_line(),
                    error = %e,
                    "debate aborted"
                );
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        query: &str,
        session: &mut DebateSession,
        notice: Option<oneshot::Sender<DebateNotice>>,
    ) -> Result<DebateResult, DebateError> {
        if let Some(tx) = notice {
            let _ = tx.send(DebateNotice::Started {
                debate_id: session.id.clone(),
            });
        }

        session.advance("round 1: independent analysis")?;
        info!(debate = %session.id, phase = %session.phase, "round 1: independent analysis");
        let (round1_a, round1_b) = self.round1(query).await?;
        info!(
            debate = %session.id,
            member_a_chars = round1_a.len(),
            member_b_chars = round1_b.len(),
            "round 1 complete"
        );

        session.advance("round 2: member A critiques member B")?;
        info!(debate = %session.id, phase = %session.phase, "round 2: chain of debate");
        let round2_a = self
            .call(
                DebateStage::Round2MemberA,
                prompts::round2_user_message_for_a(query, &round1_b),
            )
            .await?;

        session.advance("round 2: member B responds")?;
        let round2_b = self
            .call(
                DebateStage::Round2MemberB,
                prompts::round2_user_message_for_b(query, &round1_a, &round2_a),
            )
            .await?;

        session.advance("round 3: chair synthesis")?;
        info!(debate = %session.id, phase = %session.phase, "round 3: chair synthesis");
        let round3_chair = self
            .call(
                DebateStage::Round3Chair,
                prompts::chair_user_message(query, &round1_a, &round1_b, &round2_a, &round2_b),
            )
            .await?;

        session.advance("verdict received")?;

        Ok(DebateResult {
            debate_id: session.id.clone(),
            query: query.to_string(),
            round1_member_a: round1_a,
            round1_member_b: round1_b,
            round2_member_a: round2_a,
            round2_member_b: round2_b,
            round3_chair,
            elapsed_ms: 0,
        })
    }

    /// Both members analyse the query at once. The first failure aborts the
    /// round and drops the other call; member A is polled first, so it wins
    /// a tie.
    async fn round1(&self, query: &str) -> Result<(String, String), DebateError> {
        let message = prompts::round1_user_message(query);
        let member_a = self.call(DebateStage::Round1MemberA, message.clone());
        let member_b = self.call(DebateStage::Round1MemberB, message);
        tokio::pin!(member_a, member_b);

        tokio::select! {
            biased;
            first = &mut member_a => {
                let round1_a = first?;
                let round1_b = member_b.await?;
                Ok((round1_a, round1_b))
            }
            first = &mut member_b => {
                let round1_b = first?;
                let round1_a = member_a.await?;
                Ok((round1_a, round1_b))
            }
        }
    }

    async fn call(&self, stage: DebateStage, user_message: String) -> Result<String, DebateError> {
        let spec = self.config.participant(stage.role());
        let request = ChatRequest {
            model: spec.model.clone(),
            system_prompt: spec.system_prompt().to_string(),
            user_message,
            temperature: spec.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!(stage = %stage, model = %spec.model, "issuing model call");
        let text = self
            .invoker
            .invoke(&request)
            .await
            .map_err(|source| DebateError::StageFailed { stage, source })?;
        debug!(stage = %stage, chars = text.len(), "model call returned");
        Ok(text)
    }
}
