//! Form-level checks run before a request is handed to the model.

use crate::models::{
    AnalysisInput, LabReportRequest, MentalWellnessRequest, NutritionRequest, YouthHealthRequest,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

/// Upper end of the stress slider.
pub const MAX_STRESS_LEVEL: u8 = 10;

impl AnalysisInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            AnalysisInput::LabReport(request) => validate_lab_report(request),
            AnalysisInput::MentalWellness(request) => validate_mental_wellness(request),
            AnalysisInput::Nutrition(request) => validate_nutrition(request),
            AnalysisInput::YouthHealth(request) => validate_youth_health(request),
            AnalysisInput::Symptoms(_)
            | AnalysisInput::WomensHealth(_)
            | AnalysisInput::ReproductiveHealth(_)
            | AnalysisInput::MaternalHealth(_) => Ok(()),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn validate_stress_level(stress_level: Option<u8>) -> Result<(), ValidationError> {
    if stress_level.is_some_and(|level| level > MAX_STRESS_LEVEL) {
        return Err(ValidationError("Stress level must be between 0 and 10"));
    }
    Ok(())
}

fn validate_lab_report(request: &LabReportRequest) -> Result<(), ValidationError> {
    if is_blank(request.report_text.as_deref()) {
        return Err(ValidationError("Please enter lab report data"));
    }
    Ok(())
}

fn validate_mental_wellness(request: &MentalWellnessRequest) -> Result<(), ValidationError> {
    if is_blank(request.mood.as_deref()) {
        return Err(ValidationError("Please select your current mood"));
    }
    validate_stress_level(request.stress_level)
}

fn validate_nutrition(request: &NutritionRequest) -> Result<(), ValidationError> {
    let complete = request.age.is_some_and(|age| age > 0)
        && request.weight.is_some_and(|weight| weight > 0.0)
        && request.height.is_some_and(|height| height > 0.0)
        && !is_blank(request.activity_level.as_deref());
    if !complete {
        return Err(ValidationError("Please fill in all required fields"));
    }
    Ok(())
}

fn validate_youth_health(request: &YouthHealthRequest) -> Result<(), ValidationError> {
    if !request.age.is_some_and(|age| age > 0) {
        return Err(ValidationError("Please enter your age"));
    }
    validate_stress_level(request.stress_level)
}
