use std::path::{Path, PathBuf};

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, PipelineError};
use crate::models::{OutputReport, ResumeProfile};
use crate::pipeline::application::PlanApplicationWarning;
use crate::pipeline::driver::{PipelineDriver, PipelineInputs, PipelineState};
use crate::render::sink::FileArtifactSink;
use crate::sources::pdf::extract_text_from_bytes;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub resume_text: String,
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub run_id: Uuid,
    pub report: OutputReport,
    pub report_markdown: String,
    pub tailored_resume: ResumeProfile,
    pub warnings: Vec<PlanApplicationWarning>,
    pub states: Vec<PipelineState>,
    pub report_path: PathBuf,
    pub resume_path: PathBuf,
}

fn require_text(field: &str, value: &str) -> Result<(), PipelineError> {
    if value.trim().is_empty() {
        return Err(PipelineError::before_start(AppError::Validation(format!(
            "{field} must not be empty"
        ))));
    }
    Ok(())
}

/// Runs one pipeline with artifacts under `<output_dir>/<run id>/`.
async fn run_pipeline(state: &AppState, inputs: PipelineInputs) -> Result<TailorResponse, PipelineError> {
    let mut driver = PipelineDriver::new(state.stage_context());
    let sink = FileArtifactSink::in_dir(&state.config.output_dir.join(driver.run_id().to_string()));

    let outcome = driver.run(&inputs, &sink).await?;
    info!("Run {} served with {} warnings", outcome.run_id, outcome.warnings.len());

    Ok(TailorResponse {
        run_id: outcome.run_id,
        report: outcome.report,
        report_markdown: outcome.published.report_markdown,
        tailored_resume: outcome.tailored_resume,
        warnings: outcome.warnings,
        states: outcome.history,
        report_path: outcome.published.report_path,
        resume_path: outcome.published.resume_path,
    })
}

/// POST /api/v1/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, PipelineError> {
    require_text("resume_text", &req.resume_text)?;
    require_text("job_text", &req.job_text)?;

    let inputs = PipelineInputs {
        resume_text: req.resume_text,
        job_text: req.job_text,
    };
    Ok(Json(run_pipeline(&state, inputs).await?))
}

/// POST /api/v1/tailor/upload
/// Multipart: `resume` (PDF file) and `job_text` (text).
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TailorResponse>, PipelineError> {
    let bad_request =
        |e: axum::extract::multipart::MultipartError| PipelineError::before_start(AppError::Validation(e.to_string()));

    let mut resume: Option<(String, bytes::Bytes)> = None;
    let mut job_text: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let part = field.name().unwrap_or_default().to_string();
        match part.as_str() {
            "resume" => {
                let name = field.file_name().unwrap_or("resume.pdf").to_string();
                resume = Some((name, field.bytes().await.map_err(bad_request)?));
            }
            "job_text" => job_text = Some(field.text().await.map_err(bad_request)?),
            _ => {}
        }
    }

    let (file_name, pdf) = resume.ok_or_else(|| {
        PipelineError::before_start(AppError::Validation("missing 'resume' file part".to_string()))
    })?;
    let job_text = job_text.ok_or_else(|| {
        PipelineError::before_start(AppError::Validation("missing 'job_text' part".to_string()))
    })?;
    require_text("job_text", &job_text)?;

    let resume_text = extract_text_from_bytes(pdf.to_vec(), Path::new(&file_name))
        .await
        .map_err(PipelineError::before_start)?;
    require_text("resume", &resume_text)?;

    let inputs = PipelineInputs {
        resume_text,
        job_text,
    };
    Ok(Json(run_pipeline(&state, inputs).await?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::agents::testing::{keyword_agent, ScriptedAgent};
    use crate::agents::AgentRole;
    use crate::config::Config;
    use crate::models::job::fixtures::python_job;
    use crate::models::resume::fixtures::sample_resume;
    use crate::routes::build_router;
    use crate::state::AppState;

    fn app(agent: ScriptedAgent, output_dir: &std::path::Path) -> Router {
        build_router(AppState {
            agent: Arc::new(agent),
            config: Config {
                anthropic_api_key: "test".to_string(),
                agent_timeout: Duration::from_secs(30),
                output_dir: output_dir.to_path_buf(),
                port: 0,
                rust_log: "info".to_string(),
            },
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(ScriptedAgent::new(), dir.path())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["service"], "tailor");
    }

    #[tokio::test]
    async fn test_tailor_runs_pipeline_and_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let agent = keyword_agent(&sample_resume(), &python_job());

        let response = app(agent, dir.path())
            .oneshot(post_json(
                "/api/v1/tailor",
                json!({"resume_text": "Jane Doe ...", "job_text": "Data Engineer, Python"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let run_id = body["run_id"].as_str().unwrap().to_string();
        assert_eq!(body["states"].as_array().unwrap().last().unwrap(), "done");
        assert!(body["report_markdown"].as_str().unwrap().starts_with("# Job Fit Report"));
        assert!(body["report"]["final_match_result"]["fit_score_overall"].as_u64().unwrap() <= 100);
        assert!(dir.path().join(&run_id).join("job_fit_report.md").exists());
        assert!(dir.path().join(&run_id).join("tailored_resume.pdf").exists());
    }

    #[tokio::test]
    async fn test_empty_job_text_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let agent = ScriptedAgent::new();

        let response = app(agent, dir.path())
            .oneshot(post_json(
                "/api/v1/tailor",
                json!({"resume_text": "Jane Doe", "job_text": "   "}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_extraction_failure_is_bad_gateway_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let agent = keyword_agent(&sample_resume(), &python_job())
            .respond_raw(AgentRole::JobExtraction, "sorry, no JSON today");

        let response = app(agent, dir.path())
            .oneshot(post_json(
                "/api/v1/tailor",
                json!({"resume_text": "Jane Doe", "job_text": "Data Engineer"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["error"]["code"], "EXTRACTION_ERROR");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf_resume() {
        let dir = tempfile::tempdir().unwrap();
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\nnot really a pdf\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"job_text\"\r\n\r\nData Engineer\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/tailor/upload")
            .header("content-type", format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap();

        let response = app(ScriptedAgent::new(), dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "INPUT_ERROR");
    }

    #[tokio::test]
    async fn test_upload_missing_job_text() {
        let dir = tempfile::tempdir().unwrap();
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"cv.pdf\"\r\n\r\n%PDF-1.4\r\n--{b}--\r\n",
            b = boundary
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/tailor/upload")
            .header("content-type", format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap();

        let response = app(ScriptedAgent::new(), dir.path()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }
}
