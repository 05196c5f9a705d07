// ABOUTME: Image descriptor loading from build output JSON.
// ABOUTME: Text, file, and reader inputs all share one validation routine.

use crate::config::{EnvSource, ImageInfoSource, locate_resource};
use crate::error::{Error, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

const IMAGE_FIELD: &str = "image";

/// Extract the `image` string from image info JSON.
///
/// `location` only appears in error messages.
pub fn parse(json: &str, location: &str) -> Result<String> {
    let info: Value = serde_json::from_str(json).map_err(|source| Error::Parse {
        location: location.to_string(),
        source,
    })?;

    match info.get(IMAGE_FIELD) {
        None => Err(Error::MissingImage(location.to_string())),
        Some(Value::String(image)) => Ok(image.clone()),
        Some(_) => Err(Error::BadImage(location.to_string())),
    }
}

pub fn from_file(path: &Path) -> Result<String> {
    let json = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    parse(&json, &path.display().to_string())
}

pub fn from_reader(mut reader: impl Read, location: &str) -> Result<String> {
    let mut json = String::new();
    reader
        .read_to_string(&mut json)
        .map_err(|source| Error::Read {
            location: location.to_string(),
            source,
        })?;
    parse(&json, location)
}

/// Load the image for the current build, wherever the environment points.
pub fn from_build(env: &dyn EnvSource) -> Result<String> {
    match ImageInfoSource::from_env(env) {
        ImageInfoSource::Path(path) => from_file(&path),
        ImageInfoSource::Resource(name) => {
            let path = locate_resource(&name, env)?;
            tracing::debug!("Resolved image info resource {} to {}", name, path.display());
            from_file(&path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_image() {
        assert_eq!(parse(r#"{"image":"foo/bar:1"}"#, "test").unwrap(), "foo/bar:1");
    }

    #[test]
    fn parse_ignores_other_fields() {
        let json = r#"{"image":"foo:2","digest":"sha256:abc","tags":[1,2]}"#;
        assert_eq!(parse(json, "test").unwrap(), "foo:2");
    }

    #[test]
    fn missing_image_field() {
        let err = parse("{}", "info.json").unwrap_err();
        assert!(matches!(err, Error::MissingImage(_)));
        assert_eq!(err.to_string(), "missing image field in image info: info.json");
    }

    #[test]
    fn non_string_image_field() {
        let err = parse(r#"{"image":123}"#, "info.json").unwrap_err();
        assert!(matches!(err, Error::BadImage(_)));
        assert_eq!(err.to_string(), "bad image field in image info: info.json");
    }

    #[test]
    fn null_image_field_is_bad_not_missing() {
        let err = parse(r#"{"image":null}"#, "info.json").unwrap_err();
        assert!(matches!(err, Error::BadImage(_)));
    }

    #[test]
    fn non_object_document_is_missing_image() {
        let err = parse(r#"["image"]"#, "info.json").unwrap_err();
        assert!(matches!(err, Error::MissingImage(_)));
    }

    #[test]
    fn malformed_json_names_location() {
        let err = parse("{not json", "/build/info.json").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("/build/info.json"));
    }

    #[test]
    fn reader_input_uses_same_validation() {
        let err = from_reader(&b"{}"[..], "stdin").unwrap_err();
        assert!(matches!(err, Error::MissingImage(ref loc) if loc == "stdin"));

        let image = from_reader(&br#"{"image":"x:1"}"#[..], "stdin").unwrap();
        assert_eq!(image, "x:1");
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
