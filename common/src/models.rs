use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use utoipa::ToSchema;

/// The health feature a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum UseCase {
    SymptomAnalysis,
    WomensHealth,
    LabReport,
    MentalWellness,
    Nutrition,
    ReproductiveHealth,
    MaternalHealth,
    YouthHealth,
}

impl UseCase {
    pub const ALL: [UseCase; 8] = [
        UseCase::SymptomAnalysis,
        UseCase::WomensHealth,
        UseCase::LabReport,
        UseCase::MentalWellness,
        UseCase::Nutrition,
        UseCase::ReproductiveHealth,
        UseCase::MaternalHealth,
        UseCase::YouthHealth,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            UseCase::SymptomAnalysis => "symptom-analysis",
            UseCase::WomensHealth => "womens-health",
            UseCase::LabReport => "lab-report",
            UseCase::MentalWellness => "mental-wellness",
            UseCase::Nutrition => "nutrition",
            UseCase::ReproductiveHealth => "reproductive-health",
            UseCase::MaternalHealth => "maternal-health",
            UseCase::YouthHealth => "youth-health",
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Other => "other",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SymptomRequest {
    pub symptoms: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WomensHealthRequest {
    pub cycle_length: Option<u32>,
    pub last_period: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub age: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabReportRequest {
    pub report_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentalWellnessRequest {
    pub mood: Option<String>,
    /// Self-reported stress on a 0 to 10 scale.
    pub stress_level: Option<u8>,
    #[serde(default)]
    pub concerns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRequest {
    pub age: Option<u32>,
    /// Kilograms.
    pub weight: Option<f64>,
    /// Centimetres.
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub health_goals: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReproductiveHealthRequest {
    pub age: Option<u32>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub cycle_history: Option<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaternalHealthRequest {
    pub pregnancy_week: Option<u32>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub previous_pregnancies: Option<u32>,
    pub age: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YouthHealthRequest {
    pub age: Option<u32>,
    pub study_hours: Option<f64>,
    pub screen_time: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub stress_level: Option<u8>,
    #[serde(default)]
    pub concerns: Vec<String>,
}

/// A submitted form for any of the supported use cases.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisInput {
    Symptoms(SymptomRequest),
    WomensHealth(WomensHealthRequest),
    LabReport(LabReportRequest),
    MentalWellness(MentalWellnessRequest),
    Nutrition(NutritionRequest),
    ReproductiveHealth(ReproductiveHealthRequest),
    MaternalHealth(MaternalHealthRequest),
    YouthHealth(YouthHealthRequest),
}

impl AnalysisInput {
    pub fn use_case(&self) -> UseCase {
        match self {
            AnalysisInput::Symptoms(_) => UseCase::SymptomAnalysis,
            AnalysisInput::WomensHealth(_) => UseCase::WomensHealth,
            AnalysisInput::LabReport(_) => UseCase::LabReport,
            AnalysisInput::MentalWellness(_) => UseCase::MentalWellness,
            AnalysisInput::Nutrition(_) => UseCase::Nutrition,
            AnalysisInput::ReproductiveHealth(_) => UseCase::ReproductiveHealth,
            AnalysisInput::MaternalHealth(_) => UseCase::MaternalHealth,
            AnalysisInput::YouthHealth(_) => UseCase::YouthHealth,
        }
    }

    /// An input of the given use case with every field left empty.
    pub fn empty(use_case: UseCase) -> Self {
        match use_case {
            UseCase::SymptomAnalysis => AnalysisInput::Symptoms(Default::default()),
            UseCase::WomensHealth => AnalysisInput::WomensHealth(Default::default()),
            UseCase::LabReport => AnalysisInput::LabReport(Default::default()),
            UseCase::MentalWellness => AnalysisInput::MentalWellness(Default::default()),
            UseCase::Nutrition => AnalysisInput::Nutrition(Default::default()),
            UseCase::ReproductiveHealth => AnalysisInput::ReproductiveHealth(Default::default()),
            UseCase::MaternalHealth => AnalysisInput::MaternalHealth(Default::default()),
            UseCase::YouthHealth => AnalysisInput::YouthHealth(Default::default()),
        }
    }
}

macro_rules! impl_from_request {
    ($($request:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$request> for AnalysisInput {
                fn from(request: $request) -> Self {
                    AnalysisInput::$variant(request)
                }
            }
        )*
    };
}

impl_from_request! {
    SymptomRequest => Symptoms,
    WomensHealthRequest => WomensHealth,
    LabReportRequest => LabReport,
    MentalWellnessRequest => MentalWellness,
    NutritionRequest => Nutrition,
    ReproductiveHealthRequest => ReproductiveHealth,
    MaternalHealthRequest => MaternalHealth,
    YouthHealthRequest => YouthHealth,
}

/// Whatever JSON object was recovered from the model, or a fallback payload.
///
/// The shape depends on the use case and is not checked against a schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(pub Map<String, Value>);

impl AnalysisResult {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn use_case_serializes_as_slug() {
        for use_case in UseCase::ALL {
            let value = serde_json::to_value(use_case).unwrap();
            assert_eq!(value, json!(use_case.slug()));
            assert_eq!(use_case.to_string(), use_case.slug());
        }
    }

    #[test]
    fn requests_accept_camel_case_and_missing_lists() {
        let request: NutritionRequest = serde_json::from_value(json!({
            "age": 28,
            "weight": 61.5,
            "activityLevel": "Active",
            "healthGoals": ["Weight loss"]
        }))
        .unwrap();

        assert_eq!(request.age, Some(28));
        assert_eq!(request.weight, Some(61.5));
        assert_eq!(request.height, None);
        assert_eq!(request.activity_level.as_deref(), Some("Active"));
        assert!(request.dietary_restrictions.is_empty());
        assert_eq!(request.health_goals, vec!["Weight loss".to_string()]);
    }

    #[test]
    fn empty_request_deserializes_from_empty_object() {
        let request: MaternalHealthRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request, MaternalHealthRequest::default());
    }

    #[test]
    fn input_knows_its_use_case() {
        for use_case in UseCase::ALL {
            assert_eq!(AnalysisInput::empty(use_case).use_case(), use_case);
        }
        let input: AnalysisInput = SymptomRequest::default().into();
        assert_eq!(input.use_case(), UseCase::SymptomAnalysis);
    }

    #[test]
    fn result_is_a_transparent_object() {
        let result: AnalysisResult =
            serde_json::from_value(json!({"riskLevel": "low", "score": 3})).unwrap();
        assert_eq!(result.get("riskLevel"), Some(&json!("low")));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"riskLevel": "low", "score": 3})
        );
    }
}
