use std::any::Any;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::Deserialize;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
};

use crate::output::{ErrorEnvelope, format_error, format_transcript};
use crate::pipeline::Pipeline;
use crate::{Error, Stage, StageError};

const MISSING_URL: &str = "Missing youtube_url in request body";

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    youtube_url: Option<String>,
}

/// An [`ErrorEnvelope`] paired with the status its stage maps to
pub struct ApiError {
    status: StatusCode,
    envelope: ErrorEnvelope,
}

impl ApiError {
    fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            status: status_for(stage),
            envelope: format_error(message, stage),
        }
    }
}

impl From<StageError> for ApiError {
    fn from(err: StageError) -> Self {
        ApiError::new(err.stage, err.source.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

fn status_for(stage: Stage) -> StatusCode {
    match stage {
        Stage::Validation | Stage::TranscriptExtraction => StatusCode::BAD_REQUEST,
        Stage::SummaryGeneration | Stage::KeypointsGeneration | Stage::QuizGeneration | Stage::ServerError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Build the application router
pub fn router(pipeline: Pipeline) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health_handler))
        .route("/api/process", post(process_handler))
        .route("/api/transcript", post(transcript_handler))
        .with_state(pipeline)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}

/// Bind and serve until the process is stopped
pub async fn serve(pipeline: Pipeline, addr: &str) -> eyre::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}

fn youtube_url(payload: Result<Json<VideoRequest>, JsonRejection>) -> Result<String, StageError> {
    let missing = || StageError::new(Stage::Validation, Error::Validation(MISSING_URL.to_string()));
    match payload {
        Ok(Json(VideoRequest { youtube_url: Some(url) })) => Ok(url),
        Ok(_) => Err(missing()),
        Err(rejection) => {
            info!("Rejected request body: {rejection}");
            Err(missing())
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "running",
        "message": "Smart Video Learning Tool API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn process_handler(
    State(pipeline): State<Pipeline>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let url = youtube_url(payload)?;
    let package = pipeline.process(&url).await.inspect_err(|e| error!("Processing {url} failed: {e}"))?;
    Ok((StatusCode::OK, Json(package)).into_response())
}

async fn transcript_handler(
    State(pipeline): State<Pipeline>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let url = youtube_url(payload)?;
    let transcript = pipeline
        .transcript(&url)
        .await
        .inspect_err(|e| error!("Transcript for {url} failed: {e}"))?;
    Ok((StatusCode::OK, Json(format_transcript(&transcript))).into_response())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Handler panicked: {detail}");
    ApiError::new(Stage::ServerError, format!("Unexpected server error: {detail}")).into_response()
}
