use crate::AppState;
use crate::pipeline::{Outcome, analyze};
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use common::models::{
    AnalysisInput, AnalysisResult, LabReportRequest, MaternalHealthRequest,
    MentalWellnessRequest, NutritionRequest, ReproductiveHealthRequest, SymptomRequest, UseCase,
    WomensHealthRequest, YouthHealthRequest,
};
use log::{error, warn};
use serde::Serialize;
use utoipa::ToSchema;

pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Succeeded,
    /// Model output was unusable and a default result is returned instead.
    Fallback,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub use_case: UseCase,
    pub outcome: OutcomeKind,
    #[schema(value_type = Object)]
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysisErrorResponse {
    pub code: u16,
    pub message: String,
}

type AnalysisErrorReply = (StatusCode, Json<AnalysisErrorResponse>);
type AnalysisReply = Result<Json<AnalysisResponse>, AnalysisErrorReply>;

fn error_reply(status: StatusCode, message: impl Into<String>) -> AnalysisErrorReply {
    (
        status,
        Json(AnalysisErrorResponse {
            code: status.as_u16(),
            message: message.into(),
        }),
    )
}

async fn submit(state: &AppState, headers: &HeaderMap, input: AnalysisInput) -> AnalysisReply {
    let use_case = input.use_case();
    input
        .validate()
        .map_err(|e| error_reply(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let session = headers
        .get(SESSION_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty());
    let _permit = match session {
        Some(session) => Some(state.submissions.begin(session, use_case).ok_or_else(|| {
            warn!("{use_case}: rejected submission while another is pending");
            error_reply(StatusCode::CONFLICT, "An analysis is already in progress")
        })?),
        None => None,
    };

    let _upstream = state.upstream_semaphore.acquire().await.map_err(|e| {
        error!("failed to acquire upstream permit: {e}");
        error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "an internal error occurred",
        )
    })?;

    match analyze(state.llm.as_ref(), &input, state.config.extraction_strategy).await {
        Outcome::Succeeded(result) => Ok(Json(AnalysisResponse {
            use_case,
            outcome: OutcomeKind::Succeeded,
            result,
        })),
        Outcome::Fallback { result, reason } => {
            warn!("{use_case}: {reason}, serving fallback result");
            Ok(Json(AnalysisResponse {
                use_case,
                outcome: OutcomeKind::Fallback,
                result,
            }))
        }
        Outcome::Failed(message) => Err(error_reply(StatusCode::BAD_GATEWAY, message)),
    }
}

#[utoipa::path(post, path = "/api/v1/analysis/symptom-analysis", request_body = SymptomRequest, params(("x-session-id" = Option<String>, Header, description = "Client session, one pending analysis per use case")), responses((status = OK, body = AnalysisResponse), (status = CONFLICT, body = AnalysisErrorResponse), (status = BAD_GATEWAY, body = AnalysisErrorResponse)), description = "Assess symptoms")]
pub async fn analyze_symptoms(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<SymptomRequest>,
) -> AnalysisReply {
    submit(&state, &headers, body.0.into()).await
}

#[utoipa::path(post, path = "/api/v1/analysis/womens-health", request_body = WomensHealthRequest, params(("x-session-id" = Option<String>, Header, description = "Client session, one pending analysis per use case")), responses((status = OK, body = AnalysisResponse), (status = CONFLICT, body = AnalysisErrorResponse), (status = BAD_GATEWAY, body = AnalysisErrorResponse)), description = "Analyze menstrual cycle data")]
pub async fn analyze_womens_health(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<WomensHealthRequest>,
) -> AnalysisReply {
    submit(&state, &headers, body.0.into()).await
}

#[utoipa::path(post, path = "/api/v1/analysis/lab-report", request_body = LabReportRequest, params(("x-session-id" = Option<String>, Header, description = "Client session, one pending analysis per use case")), responses((status = OK, body = AnalysisResponse), (status = UNPROCESSABLE_ENTITY, body = AnalysisErrorResponse), (status = CONFLICT, body = AnalysisErrorResponse), (status = BAD_GATEWAY, body = AnalysisErrorResponse)), description = "Interpret a lab report")]
pub async fn analyze_lab_report(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<LabReportRequest>,
) -> AnalysisReply {
    submit(&state, &headers, body.0.into()).await
}

#[utoipa::path(post, path = "/api/v1/analysis/mental-wellness", request_body = MentalWellnessRequest, params(("x-session-id" = Option<String>, Header, description = "Client session, one pending analysis per use case")), responses((status = OK, body = AnalysisResponse), (status = UNPROCESSABLE_ENTITY, body = AnalysisErrorResponse), (status = CONFLICT, body = AnalysisErrorResponse), (status = BAD_GATEWAY, body = AnalysisErrorResponse)), description = "Get mental wellness advice")]
pub async fn analyze_mental_wellness(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<MentalWellnessRequest>,
) -> AnalysisReply {
    submit(&state, &headers, body.0.into()).await
}

#[utoipa::path(post, path = "/api/v1/analysis/nutrition", request_body = NutritionRequest, params(("x-session-id" = Option<String>, Header, description = "Client session, one pending analysis per use case")), responses((status = OK, body = AnalysisResponse), (status = UNPROCESSABLE_ENTITY, body = AnalysisErrorResponse), (status = CONFLICT, body = AnalysisErrorResponse), (status = BAD_GATEWAY, body = AnalysisErrorResponse)), description = "Get a nutrition plan")]
pub async fn analyze_nutrition(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<NutritionRequest>,
) -> AnalysisReply {
    submit(&state, &headers, body.0.into()).await
}

#[utoipa::path(post, path = "/api/v1/analysis/reproductive-health", request_body = ReproductiveHealthRequest, params(("x-session-id" = Option<String>, Header, description = "Client session, one pending analysis per use case")), responses((status = OK, body = AnalysisResponse), (status = CONFLICT, body = AnalysisErrorResponse), (status = BAD_GATEWAY, body = AnalysisErrorResponse)), description = "Analyze PCOS and fertility indicators")]
pub async fn analyze_reproductive_health(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<ReproductiveHealthRequest>,
) -> AnalysisReply {
    submit(&state, &headers, body.0.into()).await
}

#[utoipa::path(post, path = "/api/v1/analysis/maternal-health", request_body = MaternalHealthRequest, params(("x-session-id" = Option<String>, Header, description = "Client session, one pending analysis per use case")), responses((status = OK, body = AnalysisResponse), (status = CONFLICT, body = AnalysisErrorResponse), (status = BAD_GATEWAY, body = AnalysisErrorResponse)), description = "Get pregnancy guidance")]
pub async fn analyze_maternal_health(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<MaternalHealthRequest>,
) -> AnalysisReply {
    submit(&state, &headers, body.0.into()).await
}

#[utoipa::path(post, path = "/api/v1/analysis/youth-health", request_body = YouthHealthRequest, params(("x-session-id" = Option<String>, Header, description = "Client session, one pending analysis per use case")), responses((status = OK, body = AnalysisResponse), (status = UNPROCESSABLE_ENTITY, body = AnalysisErrorResponse), (status = CONFLICT, body = AnalysisErrorResponse), (status = BAD_GATEWAY, body = AnalysisErrorResponse)), description = "Analyze student health habits")]
pub async fn analyze_youth_health(
    state: State<AppState>,
    headers: HeaderMap,
    body: Json<YouthHealthRequest>,
) -> AnalysisReply {
    submit(&state, &headers, body.0.into()).await
}
