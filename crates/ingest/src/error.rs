use fieldguard_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported content type: {0}")]
    UnsupportedMediaType(String),
    #[error("multipart/form-data bodies are not supported")]
    Multipart,
    #[error("request body must be an object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML body: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Convert(#[from] CoreError),
}
