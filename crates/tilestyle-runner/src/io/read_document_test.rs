use super::{decode_document, read_document, DocumentError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    name: String,
    floors: u32,
}

#[test]
fn decodes_by_extension() {
    let yaml = decode_document::<Sample>(Path::new("a.yaml"), "name: tower\nfloors: 3\n")
        .expect("yaml must decode");
    let json = decode_document::<Sample>(Path::new("a.json"), r#"{"name":"tower","floors":3}"#)
        .expect("json must decode");
    assert_eq!(yaml, json);
}

#[test]
fn unknown_extension_falls_back_to_json() {
    let sample = decode_document::<Sample>(Path::new("a.txt"), r#"{"name":"hall","floors":1}"#)
        .expect("fallback must decode");
    assert_eq!(sample.name, "hall");
}

#[test]
fn json_extension_does_not_accept_yaml() {
    let err = decode_document::<Sample>(Path::new("a.json"), "name: tower\nfloors: 3\n")
        .expect_err("must fail");
    assert!(matches!(err, DocumentError::Decode { format: "json", .. }));
}

#[test]
fn read_document_reports_missing_file() {
    let path = temp_path("missing", "yaml");
    let err = read_document::<Sample>(&path).expect_err("must fail");
    assert!(matches!(err, DocumentError::ReadFile { .. }));
    assert!(err.to_string().contains("read file failed"));
}

#[test]
fn read_document_decodes_file() {
    let path = temp_path("sample", "yml");
    fs::write(&path, "name: depot\nfloors: 2\n").expect("must write temp file");
    let sample = read_document::<Sample>(&path).expect("must decode");
    assert_eq!(
        sample,
        Sample {
            name: "depot".to_string(),
            floors: 2,
        }
    );
}

fn temp_path(prefix: &str, extension: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time must be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "tilestyle-runner-{prefix}-{}-{nanos}.{extension}",
        std::process::id()
    ))
}
