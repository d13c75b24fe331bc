//! Chairman synthesis use case
//!
//! Optional second stage: a chairman model reads the successful council
//! opinions and writes one consolidated recommendation.

use crate::config::CouncilParams;
use crate::ports::model_backend::{CallError, ModelBackend};
use council_domain::{CouncilResult, ModelId, PromptTemplate, SynthesisResult};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("No successful council opinions to synthesize")]
    NoOpinions,

    #[error("Chairman call failed: {0}")]
    Call(#[from] CallError),
}

pub struct ChairmanSynthesis {
    backend: Arc<dyn ModelBackend>,
    chairman_model: ModelId,
    timeout: Duration,
}

impl ChairmanSynthesis {
    pub fn new(backend: Arc<dyn ModelBackend>, params: &CouncilParams) -> Self {
        Self {
            backend,
            chairman_model: params.chairman_model.clone(),
            timeout: params.chairman_timeout,
        }
    }

    pub fn chairman_model(&self) -> &ModelId {
        &self.chairman_model
    }

    /// Ask the chairman for a recommendation over the successful opinions
    pub async fn synthesize(&self, result: &CouncilResult) -> Result<SynthesisResult, SynthesisError> {
        let responses = result.responses();
        if responses.is_empty() {
            return Err(SynthesisError::NoOpinions);
        }

        let prompt = PromptTemplate::synthesis_prompt(&result.query, &responses);
        info!(
            chairman = %self.chairman_model,
            opinions = responses.len(),
            "Requesting chairman synthesis"
        );

        let call = self.backend.call(
            &self.chairman_model,
            PromptTemplate::chairman_system(),
            &prompt,
            self.timeout,
        );
        let recommendation = match tokio::time::timeout(self.timeout, call).await {
            Ok(response) => response?,
            Err(_) => return Err(CallError::Timeout(self.timeout).into()),
        };

        Ok(SynthesisResult::new(
            self.chairman_model.as_str(),
            recommendation,
        ))
    }

    /// Run synthesis and fold the outcome into the result
    ///
    /// A failed synthesis keeps the stage-1 opinions and records the error.
    pub async fn apply(&self, result: CouncilResult) -> CouncilResult {
        match self.synthesize(&result).await {
            Ok(synthesis) => result.with_synthesis(synthesis),
            Err(e) => {
                warn!(session_id = %result.session_id, "Chairman synthesis failed: {}", e);
                let message = e.to_string();
                result.with_synthesis_error(message)
            }
        }
    }
}
