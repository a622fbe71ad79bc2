use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unsupported YAML value at '{path}': {reason}")]
    UnsupportedYaml { path: String, reason: String },
}
