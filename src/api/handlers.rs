//! HTTP request handlers for the chunking service.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::chunkers::CodeChunker;
use crate::error::Result;
use crate::processing::{FileSelector, SupportedLanguage};
use crate::types::{ChunkDocument, ChunkingConfig, FileRecord};

/// Application state shared across handlers.
#[derive(Debug)]
pub struct AppState {
    pub chunker: CodeChunker,
    pub config: ChunkingConfig,
}

impl AppState {
    /// Build the pipeline described by `config`.
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        let chunker = CodeChunker::new(config.pipeline()?)?;
        Ok(Self { chunker, config })
    }
}

/// Error body returned by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A handler failure with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Capabilities of one language.
#[derive(Debug, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub language: SupportedLanguage,
    pub structural_parser: bool,
    pub splitter: bool,
}

/// List languages and how each is chunked.
pub async fn list_languages(State(state): State<Arc<AppState>>) -> Json<Vec<LanguageInfo>> {
    let registry = state.chunker.registry();
    let languages = SupportedLanguage::ALL
        .into_iter()
        .map(|language| LanguageInfo {
            language,
            structural_parser: registry.supports(language),
            splitter: language.splitter_language().is_some(),
        })
        .collect();

    Json(languages)
}

/// Request to chunk a batch of files.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkCodeRequest {
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub whitelist: Vec<String>,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

/// Chunks produced for a batch.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkCodeResponse {
    pub chunks: Vec<ChunkDocument>,
    pub total_chunks: usize,
    pub files_received: usize,
}

/// Chunk a batch of files.
pub async fn chunk_code(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChunkCodeRequest>,
) -> std::result::Result<Json<ChunkCodeResponse>, ApiError> {
    let files_received = request.files.len();

    if files_received == 0 {
        return Err(ApiError::bad_request("No files provided"));
    }
    if files_received > state.config.max_files_per_request {
        return Err(ApiError::bad_request(format!(
            "Too many files: {} (limit {})",
            files_received, state.config.max_files_per_request
        )));
    }

    let selector = FileSelector::new(&request.whitelist[..], &request.blacklist[..])
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    info!(files = files_received, "Received chunk request");

    let worker_state = Arc::clone(&state);
    let chunked = tokio::task::spawn_blocking(move || {
        let selected = request
            .files
            .into_iter()
            .filter(|file| selector.is_selected(&file.file_name));
        worker_state
            .chunker
            .chunk_files(selected)
            .collect::<Result<Vec<_>>>()
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Chunking task failed");
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Chunking task failed".to_string(),
        }
    })?;

    let chunks = chunked.map_err(|e| ApiError::unprocessable(e.to_string()))?;

    info!(
        files = files_received,
        chunks = chunks.len(),
        "Chunk request completed"
    );

    Ok(Json(ChunkCodeResponse {
        total_chunks: chunks.len(),
        chunks,
        files_received,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast_engine::ParserRegistry;
    use pretty_assertions::assert_eq;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(ChunkingConfig::default()).unwrap())
    }

    fn request(files: Vec<FileRecord>) -> ChunkCodeRequest {
        ChunkCodeRequest {
            files,
            whitelist: vec![],
            blacklist: vec![],
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let Json(health) = health_check().await;
        assert_eq!(health.status, "healthy");
    }

    #[tokio::test]
    async fn test_list_languages() {
        let Json(languages) = list_languages(State(state())).await;

        assert_eq!(languages.len(), SupportedLanguage::ALL.len());
        let c = languages
            .iter()
            .find(|info| info.language == SupportedLanguage::C)
            .unwrap();
        assert!(c.structural_parser);
        assert!(!c.splitter);
        let lua = languages
            .iter()
            .find(|info| info.language == SupportedLanguage::Lua)
            .unwrap();
        assert!(!lua.structural_parser);
    }

    #[tokio::test]
    async fn test_chunk_code() {
        let files = vec![
            FileRecord::new("main.go", "func A(){}\nfunc B(){}\n"),
            FileRecord::new("logo.png", "binary"),
        ];

        let Json(response) = chunk_code(State(state()), Json(request(files)))
            .await
            .unwrap();

        assert_eq!(response.files_received, 2);
        assert_eq!(response.total_chunks, 2);
        assert_eq!(response.chunks[0].method_name, "A");
        assert_eq!(response.chunks[1].method_name, "B");
    }

    #[tokio::test]
    async fn test_chunk_code_applies_selection() {
        let mut request = request(vec![
            FileRecord::new("src/a.go", "func A(){}\n"),
            FileRecord::new("src/a_test.go", "func TestA(){}\n"),
            FileRecord::new("notes.txt", "hello"),
        ]);
        request.whitelist = vec!["*.go".to_string()];
        request.blacklist = vec!["*_test.go".to_string()];

        let Json(response) = chunk_code(State(state()), Json(request)).await.unwrap();

        assert_eq!(response.files_received, 3);
        assert_eq!(response.total_chunks, 1);
        assert_eq!(response.chunks[0].filename, "src/a.go");
    }

    #[tokio::test]
    async fn test_chunk_code_rejects_bad_requests() {
        let err = chunk_code(State(state()), Json(request(vec![])))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let config = ChunkingConfig {
            max_files_per_request: 1,
            ..Default::default()
        };
        let limited = Arc::new(AppState::new(config).unwrap());
        let files = vec![
            FileRecord::new("a.go", "func A(){}\n"),
            FileRecord::new("b.go", "func B(){}\n"),
        ];
        let err = chunk_code(State(limited), Json(request(files)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pipeline_failure_is_unprocessable() {
        let mut app = AppState::new(ChunkingConfig::default()).unwrap();
        app.chunker = app.chunker.with_registry(ParserRegistry::default());

        let files = vec![FileRecord::new("a.go", "func A(){}\n")];
        let err = chunk_code(State(Arc::new(app)), Json(request(files)))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.message.contains("a.go"));
    }
}
