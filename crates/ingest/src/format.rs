use std::fmt;

use crate::error::IngestError;

/// Body encodings the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Form,
    Yaml,
}

impl BodyFormat {
    /// Pick a format from a `Content-Type` value, ignoring parameters and case.
    pub fn from_content_type(content_type: &str) -> Result<Self, IngestError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/json" => Ok(Self::Json),
            "application/x-www-form-urlencoded" => Ok(Self::Form),
            "application/yaml" | "application/x-yaml" | "text/yaml" => Ok(Self::Yaml),
            "multipart/form-data" => Err(IngestError::Multipart),
            _ if essence.ends_with("+json") => Ok(Self::Json),
            _ => Err(IngestError::UnsupportedMediaType(essence)),
        }
    }

    /// Guess a format from a file extension (`json`, `yml`, `form`, ...).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            "form" | "urlencoded" => Some(Self::Form),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
            Self::Yaml => "application/yaml",
        }
    }
}

impl fmt::Display for BodyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_and_case_are_ignored() {
        assert_eq!(
            BodyFormat::from_content_type("Application/JSON; charset=utf-8").unwrap(),
            BodyFormat::Json
        );
        assert_eq!(
            BodyFormat::from_content_type("application/x-www-form-urlencoded;charset=UTF-8")
                .unwrap(),
            BodyFormat::Form
        );
        assert_eq!(
            BodyFormat::from_content_type("text/yaml").unwrap(),
            BodyFormat::Yaml
        );
    }

    #[test]
    fn structured_json_suffix_is_json() {
        assert_eq!(
            BodyFormat::from_content_type("application/problem+json").unwrap(),
            BodyFormat::Json
        );
    }

    #[test]
    fn multipart_is_reported_separately() {
        let err = BodyFormat::from_content_type("multipart/form-data; boundary=x").unwrap_err();
        assert!(matches!(err, IngestError::Multipart));
    }

    #[test]
    fn unknown_types_are_rejected() {
        let err = BodyFormat::from_content_type("text/csv").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedMediaType(ref t) if t == "text/csv"));
    }

    #[test]
    fn extensions() {
        assert_eq!(BodyFormat::from_extension("YML"), Some(BodyFormat::Yaml));
        assert_eq!(BodyFormat::from_extension("form"), Some(BodyFormat::Form));
        assert_eq!(BodyFormat::from_extension("pdf"), None);
    }
}
