use common::models::{AnalysisResult, UseCase};
use serde_json::{Value, json};

const EXCERPT_CHARS: usize = 200;

/// Default result shown when the model answered but nothing usable could
/// be extracted from its text.
pub fn fallback(use_case: UseCase) -> AnalysisResult {
    match use_case {
        UseCase::SymptomAnalysis => object([
            ("riskLevel", json!("medium")),
            ("possibleConditions", json!([{
                "name": "General symptoms",
                "confidence": 50,
                "description": "Requires further evaluation",
            }])),
            ("recommendations", json!(["Monitor symptoms", "Stay hydrated", "Rest"])),
            ("seekCareIf", json!(["Symptoms worsen", "High fever", "Difficulty breathing"])),
            ("homeCare", json!(["Rest", "Hydration", "Monitor temperature"])),
            ("summary", json!(excerpt(""))),
        ]),
        UseCase::WomensHealth => object([
            ("cycleHealth", json!("regular")),
            ("fertileWindow", json!("Ovulation phase")),
            ("healthScore", json!(85)),
            ("recommendations", json!(["Track cycle regularly", "Maintain healthy diet"])),
            ("riskFactors", json!([])),
            ("nextPeriod", json!("In 14 days")),
            ("insights", json!(["Cycle appears regular", "Good overall reproductive health"])),
        ]),
        UseCase::LabReport => object([
            ("overallHealth", json!("good")),
            ("abnormalValues", json!([])),
            ("recommendations", json!(["Continue healthy lifestyle"])),
            ("followUpNeeded", json!(false)),
            ("riskFactors", json!([])),
            ("summary", json!("Lab results appear normal")),
        ]),
        UseCase::MentalWellness => object([
            ("wellnessScore", json!(75)),
            ("moodAnalysis", json!("Moderate stress levels detected")),
            ("recommendations", json!(["Practice mindfulness", "Regular exercise"])),
            ("exercises", json!(["Deep breathing", "10-minute meditation"])),
            ("resources", json!(["NIMHANS helpline: 080-26995000"])),
            ("urgentCare", json!(false)),
            ("tips", json!(["Take regular breaks", "Connect with friends"])),
        ]),
        UseCase::Nutrition => object([
            ("dailyCalories", json!(2000)),
            ("macros", json!({"protein": 150, "carbs": 250, "fat": 65})),
            ("mealPlan", json!({
                "breakfast": ["Oats with fruits", "Green tea"],
                "lunch": ["Dal rice", "Mixed vegetables"],
                "dinner": ["Roti with curry", "Salad"],
                "snacks": ["Nuts", "Fruits"],
            })),
            ("indianFoods", json!(["Dal", "Roti", "Sabzi", "Rice"])),
            ("supplements", json!(["Vitamin D", "B12"])),
            ("hydration", json!("3-4 liters daily")),
            ("tips", json!(["Eat at regular intervals", "Include variety in diet"])),
        ]),
        UseCase::ReproductiveHealth => object([
            ("pcosRisk", json!("low")),
            ("fertilityScore", json!(85)),
            ("hormoneBalance", json!("balanced")),
            ("recommendations", json!(["Regular exercise", "Balanced diet"])),
            ("lifestyle", json!(["Maintain healthy weight", "Manage stress"])),
            ("redFlags", json!([])),
            ("followUp", json!("6 months")),
        ]),
        UseCase::MaternalHealth => object([
            ("trimester", json!("second")),
            ("riskLevel", json!("low")),
            ("developmentStage", json!("Normal development")),
            ("recommendations", json!(["Regular prenatal visits", "Take prenatal vitamins"])),
            ("nutrition", json!(["Folic acid rich foods", "Iron supplements"])),
            ("exercises", json!(["Prenatal yoga", "Walking"])),
            ("warningSigns", json!(["Severe headaches", "Unusual bleeding"])),
            ("nextCheckup", json!("4 weeks")),
        ]),
        UseCase::YouthHealth => object([
            ("healthScore", json!(75)),
            ("sleepQuality", json!("good")),
            ("stressLevel", json!("medium")),
            ("screenTimeRisk", json!("medium")),
            ("recommendations", json!(["Take regular breaks", "Exercise daily"])),
            ("studyTips", json!(["Pomodoro technique", "Regular breaks"])),
            ("exerciseRoutine", json!(["Morning walk", "Yoga"])),
            ("mentalHealth", json!(["Practice mindfulness", "Talk to friends"])),
        ]),
    }
}

/// Like [`fallback`], but the symptom summary quotes the start of the raw
/// model output.
pub fn fallback_for(use_case: UseCase, raw_output: &str) -> AnalysisResult {
    let mut result = fallback(use_case);
    if use_case == UseCase::SymptomAnalysis {
        result.insert("summary", Value::String(excerpt(raw_output)));
    }
    result
}

fn object<const N: usize>(fields: [(&str, Value); N]) -> AnalysisResult {
    AnalysisResult(
        fields
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
    )
}

fn excerpt(raw_output: &str) -> String {
    let mut summary: String = raw_output.chars().take(EXCERPT_CHARS).collect();
    summary.push_str("...");
    summary
}
