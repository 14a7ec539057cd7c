use askama::Template;
use common::models::{
    AnalysisInput, LabReportRequest, MaternalHealthRequest, MentalWellnessRequest,
    NutritionRequest, ReproductiveHealthRequest, SymptomRequest, WomensHealthRequest,
    YouthHealthRequest,
};
use std::fmt::Display;

pub const NOT_PROVIDED: &str = "Not provided";
pub const NONE_REPORTED: &str = "None reported";
pub const NONE: &str = "None";

#[derive(Template)]
#[template(path = "symptom_analysis.txt")]
struct SymptomPrompt {
    symptoms: String,
    age: String,
    gender: String,
}

#[derive(Template)]
#[template(path = "womens_health.txt")]
struct WomensHealthPrompt {
    cycle_length: String,
    last_period: String,
    symptoms: String,
    age: String,
}

#[derive(Template)]
#[template(path = "lab_report.txt")]
struct LabReportPrompt {
    report_text: String,
}

#[derive(Template)]
#[template(path = "mental_wellness.txt")]
struct MentalWellnessPrompt {
    mood: String,
    stress_level: String,
    concerns: String,
}

#[derive(Template)]
#[template(path = "nutrition.txt")]
struct NutritionPrompt {
    age: String,
    weight: String,
    height: String,
    activity_level: String,
    dietary_restrictions: String,
    health_goals: String,
}

#[derive(Template)]
#[template(path = "reproductive_health.txt")]
struct ReproductiveHealthPrompt {
    age: String,
    symptoms: String,
    cycle_history: String,
    concerns: String,
}

#[derive(Template)]
#[template(path = "maternal_health.txt")]
struct MaternalHealthPrompt {
    pregnancy_week: String,
    symptoms: String,
    previous_pregnancies: String,
    age: String,
}

#[derive(Template)]
#[template(path = "youth_health.txt")]
struct YouthHealthPrompt {
    age: String,
    study_hours: String,
    screen_time: String,
    sleep_hours: String,
    stress_level: String,
    concerns: String,
}

// Empty strings, empty lists and zero values count as absent, the same way
// the web forms treat an untouched field.

fn text_or(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

fn number_or<T: Display + PartialEq + Default>(value: Option<T>, placeholder: &str) -> String {
    match value {
        Some(v) if v != T::default() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

fn list_or(values: &[String], placeholder: &str) -> String {
    if values.is_empty() {
        placeholder.to_string()
    } else {
        values.join(", ")
    }
}

/// Renders the instruction sent to the model for one submission.
///
/// Never fails: absent fields are replaced with their placeholder text.
pub fn build_prompt(input: &AnalysisInput) -> String {
    match input {
        AnalysisInput::Symptoms(request) => symptoms(request).to_string(),
        AnalysisInput::WomensHealth(request) => womens_health(request).to_string(),
        AnalysisInput::LabReport(request) => lab_report(request).to_string(),
        AnalysisInput::MentalWellness(request) => mental_wellness(request).to_string(),
        AnalysisInput::Nutrition(request) => nutrition(request).to_string(),
        AnalysisInput::ReproductiveHealth(request) => reproductive_health(request).to_string(),
        AnalysisInput::MaternalHealth(request) => maternal_health(request).to_string(),
        AnalysisInput::YouthHealth(request) => youth_health(request).to_string(),
    }
}

fn symptoms(request: &SymptomRequest) -> SymptomPrompt {
    SymptomPrompt {
        symptoms: text_or(request.symptoms.as_deref(), NOT_PROVIDED),
        age: number_or(request.age, NOT_PROVIDED),
        gender: request
            .gender
            .map_or_else(|| NOT_PROVIDED.to_string(), |g| g.to_string()),
    }
}

fn womens_health(request: &WomensHealthRequest) -> WomensHealthPrompt {
    WomensHealthPrompt {
        cycle_length: number_or(request.cycle_length, NOT_PROVIDED),
        last_period: text_or(request.last_period.as_deref(), NOT_PROVIDED),
        symptoms: list_or(&request.symptoms, NONE_REPORTED),
        age: number_or(request.age, NOT_PROVIDED),
    }
}

fn lab_report(request: &LabReportRequest) -> LabReportPrompt {
    LabReportPrompt {
        report_text: text_or(request.report_text.as_deref(), NOT_PROVIDED),
    }
}

fn mental_wellness(request: &MentalWellnessRequest) -> MentalWellnessPrompt {
    MentalWellnessPrompt {
        mood: text_or(request.mood.as_deref(), NOT_PROVIDED),
        // a slider at zero is still an answer
        stress_level: request
            .stress_level
            .map_or_else(|| NOT_PROVIDED.to_string(), |s| s.to_string()),
        concerns: list_or(&request.concerns, NONE),
    }
}

fn nutrition(request: &NutritionRequest) -> NutritionPrompt {
    NutritionPrompt {
        age: number_or(request.age, NOT_PROVIDED),
        weight: number_or(request.weight, NOT_PROVIDED),
        height: number_or(request.height, NOT_PROVIDED),
        activity_level: text_or(request.activity_level.as_deref(), "Moderate"),
        dietary_restrictions: list_or(&request.dietary_restrictions, NONE),
        health_goals: list_or(&request.health_goals, "General wellness"),
    }
}

fn reproductive_health(request: &ReproductiveHealthRequest) -> ReproductiveHealthPrompt {
    ReproductiveHealthPrompt {
        age: number_or(request.age, NOT_PROVIDED),
        symptoms: list_or(&request.symptoms, NONE_REPORTED),
        cycle_history: text_or(request.cycle_history.as_deref(), NOT_PROVIDED),
        concerns: list_or(&request.concerns, NONE),
    }
}

fn maternal_health(request: &MaternalHealthRequest) -> MaternalHealthPrompt {
    MaternalHealthPrompt {
        pregnancy_week: number_or(request.pregnancy_week, NOT_PROVIDED),
        symptoms: list_or(&request.symptoms, NONE_REPORTED),
        previous_pregnancies: number_or(request.previous_pregnancies, "0"),
        age: number_or(request.age, NOT_PROVIDED),
    }
}

fn youth_health(request: &YouthHealthRequest) -> YouthHealthPrompt {
    YouthHealthPrompt {
        age: number_or(request.age, NOT_PROVIDED),
        study_hours: number_or(request.study_hours, NOT_PROVIDED),
        screen_time: number_or(request.screen_time, NOT_PROVIDED),
        sleep_hours: number_or(request.sleep_hours, NOT_PROVIDED),
        stress_level: number_or(request.stress_level, NOT_PROVIDED),
        concerns: list_or(&request.concerns, NONE),
    }
}
