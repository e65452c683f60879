use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("read file failed `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{format} decode failed `{path}`: {message}")]
    Decode {
        path: String,
        format: &'static str,
        message: String,
    },
}

pub fn read_text(path: &Path) -> Result<String, DocumentError> {
    fs::read_to_string(path).map_err(|source| DocumentError::ReadFile {
        path: path.display().to_string(),
        source,
    })
}

pub fn decode_document<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T, DocumentError> {
    let decode_error = |format: &'static str, message: String| DocumentError::Decode {
        path: path.display().to_string(),
        format,
        message,
    };
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            serde_json::from_str(text).map_err(|error| decode_error("json", error.to_string()))
        }
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(text).map_err(|error| decode_error("yaml", error.to_string()))
        }
        _ => serde_yaml::from_str(text)
            .or_else(|_| serde_json::from_str(text))
            .map_err(|error| decode_error("yaml/json", error.to_string())),
    }
}

pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    let text = read_text(path)?;
    decode_document(path, &text)
}

#[cfg(test)]
#[path = "read_document_test.rs"]
mod tests;
