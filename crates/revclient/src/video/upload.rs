//! Upload inputs.

use std::path::PathBuf;

use bytes::Bytes;

use crate::error::{Error, InvalidArgumentError};

/// A file to upload.
#[derive(Debug, Clone)]
pub enum UploadFile {
    /// Read from disk; the name is taken from the path.
    Path(PathBuf),
    /// In-memory contents with an explicit name.
    NamedStream {
        name: String,
        content_type: Option<String>,
        data: Bytes,
    },
}

/// An upload resolved to its name, MIME type, and contents.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadFile {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        UploadFile::Path(path.into())
    }

    pub fn named(name: impl Into<String>, content_type: Option<String>, data: impl Into<Bytes>) -> Self {
        UploadFile::NamedStream {
            name: name.into(),
            content_type,
            data: data.into(),
        }
    }

    pub(crate) async fn resolve(self) -> Result<ResolvedFile, Error> {
        match self {
            UploadFile::Path(path) => {
                let data = tokio::fs::read(&path).await.map_err(|e| InvalidArgumentError::Other {
                    message: format!("cannot read '{}': {}", path.display(), e),
                })?;
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Ok(ResolvedFile {
                    name,
                    content_type: None,
                    data: Bytes::from(data),
                })
            }
            UploadFile::NamedStream {
                name,
                content_type,
                data,
            } => Ok(ResolvedFile {
                name,
                content_type,
                data,
            }),
        }
    }
}

/// Transcription languages accepted by Rev.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "de", "en", "en-gb", "es-es", "es-419", "es", "fr", "fr-ca", "id", "it", "ko", "ja", "nl",
    "no", "pl", "pt", "pt-br", "th", "tr", "fi", "sv", "ru", "el", "zh", "zh-tw", "zh-cmn-hans",
];

/// Lower-case a language code and fall back to its two-letter prefix when
/// the regional variant is not supported.
pub fn normalize_language(language: &str) -> Result<String, Error> {
    let language = language.to_ascii_lowercase();
    if SUPPORTED_LANGUAGES.contains(&language.as_str()) {
        return Ok(language);
    }

    match language.get(..2) {
        Some(prefix) if SUPPORTED_LANGUAGES.contains(&prefix) => Ok(prefix.to_string()),
        _ => Err(InvalidArgumentError::Other {
            message: format!(
                "invalid language '{}', supported values are {}",
                language,
                SUPPORTED_LANGUAGES.join(", ")
            ),
        }
        .into()),
    }
}

/// Rev only accepts `.srt` and `.vtt` transcription names.
pub(crate) fn transcription_file_name(name: &str) -> String {
    if name.ends_with("srt") || name.ends_with("vtt") {
        name.to_string()
    } else {
        format!("{}.srt", name)
    }
}
