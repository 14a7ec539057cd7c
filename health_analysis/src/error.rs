use common::models::UseCase;
use reqwest::StatusCode;
use thiserror::Error;

/// The model call itself did not complete.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("error while sending llm request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("llm provider answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected llm response envelope: {0}")]
    Envelope(&'static str),
}

/// Message shown to the user when the model could not be reached.
pub fn to_user_message(_err: &TransportError, use_case: UseCase) -> String {
    match use_case {
        UseCase::SymptomAnalysis => "Failed to analyze symptoms. Please try again.",
        UseCase::WomensHealth => "Failed to analyze women's health data.",
        UseCase::LabReport => "Failed to analyze lab report.",
        UseCase::MentalWellness => "Failed to get mental wellness advice.",
        UseCase::Nutrition => "Failed to get nutrition advice.",
        UseCase::ReproductiveHealth => "Failed to analyze reproductive health.",
        UseCase::MaternalHealth => "Failed to analyze maternal health.",
        UseCase::YouthHealth => "Failed to analyze youth health.",
    }
    .to_string()
}
