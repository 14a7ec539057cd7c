use crate::error::to_user_message;
use crate::extract::{ExtractionError, ExtractionStrategy, extract};
use crate::fallback::fallback_for;
use crate::invoker::ModelInvoker;
use crate::prompt::build_prompt;
use common::models::{AnalysisInput, AnalysisResult};
use log::{error, info};

/// Terminal state of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Succeeded(AnalysisResult),
    /// The model answered but nothing usable was found in its text.
    Fallback {
        result: AnalysisResult,
        reason: ExtractionError,
    },
    /// The model could not be reached. Carries the user-facing message.
    Failed(String),
}

pub async fn analyze<I: ModelInvoker>(
    invoker: &I,
    input: &AnalysisInput,
    strategy: ExtractionStrategy,
) -> Outcome {
    let use_case = input.use_case();
    let prompt = build_prompt(input);

    let text = match invoker.invoke(&prompt).await {
        Ok(text) => text,
        Err(err) => {
            error!("{use_case}: {err}");
            return Outcome::Failed(to_user_message(&err, use_case));
        }
    };

    match extract(&text, strategy) {
        Ok(result) => {
            info!("{use_case}: analysis completed");
            Outcome::Succeeded(result)
        }
        Err(reason) => Outcome::Fallback {
            result: fallback_for(use_case, &text),
            reason,
        },
    }
}
