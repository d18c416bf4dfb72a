//! Video endpoints.
//!
//! Thin wrappers that map calls onto request shapes. Metadata is passed
//! through as opaque JSON.

mod patch;
mod upload;

pub use patch::{PatchField, PatchOperation, UnsupportedField};
pub use upload::{SUPPORTED_LANGUAGES, UploadFile, normalize_language};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::{Stream, TryStreamExt};
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument};

use crate::client::RevClient;
use crate::error::{Error, InvalidArgumentError};
use crate::http::{FilePart, MultipartBody, Payload, RequestDescriptor};
use crate::types::format_iso;

const VIDEOS: &str = "/api/v2/videos";
const VIDEO_UPLOAD: &str = "/api/v2/uploads/videos";
const TRANSCRIPTION_UPLOAD: &str = "/api/uploads/transcription-files";
const VIDEO_SEARCH: &str = "/api/v2/videos/search";

const DEFAULT_VIDEO_NAME: &str = "video";
const DEFAULT_VIDEO_CONTENT_TYPE: &str = "video/mp4";
const DEFAULT_TRANSCRIPTION_CONTENT_TYPE: &str = "application/x-subrip";

/// Options for [`VideoClient::migrate`].
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    /// New owner.
    pub username: Option<String>,
    pub when_uploaded: Option<DateTime<Utc>>,
    /// Only the date is sent.
    pub when_published: Option<DateTime<Utc>>,
}

/// Result of [`VideoClient::patch_metadata`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchOutcome {
    /// Keys that were not patchable, with their values.
    pub invalid: Map<String, Value>,
}

/// Video endpoints, borrowed from a [`RevClient`].
#[derive(Debug, Clone, Copy)]
pub struct VideoClient<'a> {
    client: &'a RevClient,
}

impl<'a> VideoClient<'a> {
    pub(crate) fn new(client: &'a RevClient) -> Self {
        Self { client }
    }

    /// Processing status of a video.
    pub async fn status(&self, video_id: &str) -> Result<Value, Error> {
        self.client
            .get_json(&format!("{}/{}/status", VIDEOS, video_id), None)
            .await
    }

    pub async fn details(&self, video_id: &str) -> Result<Value, Error> {
        self.client
            .get_json(&format!("{}/{}/details", VIDEOS, video_id), None)
            .await
    }

    /// Replace a video's metadata.
    pub async fn update(&self, video_id: &str, metadata: &Value) -> Result<(), Error> {
        self.client
            .put(&format!("{}/{}", VIDEOS, video_id), Some(metadata.clone()))
            .await?;
        Ok(())
    }

    /// Change owner and upload/publish dates of a video.
    #[instrument(skip(self, options))]
    pub async fn migrate(&self, video_id: &str, options: &MigrateOptions) -> Result<(), Error> {
        let mut body = Map::new();
        if let Some(username) = &options.username {
            body.insert("UserName".into(), Value::String(username.clone()));
        }
        if let Some(when) = &options.when_uploaded {
            body.insert("whenUploaded".into(), Value::String(format_iso(when)));
        }
        if let Some(when) = &options.when_published {
            body.insert(
                "whenPublished".into(),
                Value::String(when.format("%Y-%m-%d").to_string()),
            );
        }

        self.client
            .put(
                &format!("{}/{}/migration", VIDEOS, video_id),
                Some(Value::Object(body)),
            )
            .await?;
        Ok(())
    }

    /// Apply typed patch fields. Nothing is sent when no operation results.
    pub async fn patch(&self, video_id: &str, fields: &[(PatchField, Value)]) -> Result<(), Error> {
        let mut operations = Vec::with_capacity(fields.len());
        for (field, value) in fields {
            if let Some(op) = field.operation(value)? {
                operations.push(op);
            }
        }
        self.send_patch(video_id, operations).await
    }

    /// Apply patch fields given by name.
    ///
    /// In strict mode an unknown key fails the whole call before any request.
    /// Otherwise unknown keys are skipped and returned in
    /// [`PatchOutcome::invalid`].
    #[instrument(skip(self, metadata))]
    pub async fn patch_metadata(
        &self,
        video_id: &str,
        metadata: &Map<String, Value>,
        strict: bool,
    ) -> Result<PatchOutcome, Error> {
        let mut operations = Vec::new();
        let mut outcome = PatchOutcome::default();

        for (key, value) in metadata {
            match key.parse::<PatchField>() {
                Ok(field) => {
                    if let Some(op) = field.operation(value)? {
                        operations.push(op);
                    }
                }
                Err(unsupported) if strict => {
                    return Err(InvalidArgumentError::from(unsupported).into());
                }
                Err(_) => {
                    debug!(key = %key, "Skipping unsupported patch field");
                    outcome.invalid.insert(key.clone(), value.clone());
                }
            }
        }

        self.send_patch(video_id, operations).await?;
        Ok(outcome)
    }

    /// Upload a video file and return the new video id.
    ///
    /// `metadata` must carry an `uploader`, unless the client logs in with a
    /// username, which is then used.
    #[instrument(skip(self, file, metadata))]
    pub async fn upload(
        &self,
        file: UploadFile,
        mut metadata: Map<String, Value>,
    ) -> Result<String, Error> {
        if !metadata.contains_key("uploader") {
            let username = self.client.credential().username().ok_or_else(|| {
                InvalidArgumentError::Other {
                    message: "metadata must include an uploader".to_string(),
                }
            })?;
            metadata.insert("uploader".into(), Value::String(username.to_string()));
        }

        let file = file.resolve().await?;
        let mut name = if file.name.is_empty() {
            DEFAULT_VIDEO_NAME.to_string()
        } else {
            file.name
        };
        let content_type = match file.content_type {
            Some(content_type) => content_type,
            None => {
                if !name.ends_with(".mp4") {
                    name.push_str(".mp4");
                }
                DEFAULT_VIDEO_CONTENT_TYPE.to_string()
            }
        };

        let size = file.data.len();
        let body = MultipartBody::new()
            .file(file_part("VideoFile", name, content_type, file.data))
            .text("video", Value::Object(metadata).to_string());
        let request = RequestDescriptor::post(VIDEO_UPLOAD).payload(Payload::Multipart(body));

        let response = self.client.request(&request).await?.into_json()?;
        let video_id = response
            .as_ref()
            .and_then(|body| body.get("videoId"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::decode("upload response is missing videoId"))?
            .to_string();

        info!(video_id = %video_id, bytes = size, "Video uploaded");
        Ok(video_id)
    }

    /// Attach a caption file to a video.
    #[instrument(skip(self, file))]
    pub async fn upload_transcription(
        &self,
        video_id: &str,
        file: UploadFile,
        language: &str,
    ) -> Result<Option<Value>, Error> {
        let language = normalize_language(language)?;
        let file = file.resolve().await?;
        let name = upload::transcription_file_name(&file.name);
        let content_type = file
            .content_type
            .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_CONTENT_TYPE.to_string());

        let files = json!({ "files": [{ "language": language, "fileName": name }] });
        let body = MultipartBody::new()
            .file(file_part("File", name, content_type, file.data))
            .text("TranscriptionFiles", files.to_string());
        let request = RequestDescriptor::post(format!("{}/{}", TRANSCRIPTION_UPLOAD, video_id))
            .payload(Payload::Multipart(body));

        self.client.request(&request).await?.into_json()
    }

    /// Search videos, yielding results one at a time.
    pub fn search_stream(
        &self,
        query: Map<String, Value>,
        max_results: Option<usize>,
    ) -> impl Stream<Item = Result<Value, Error>> + use<> {
        self.client
            .scroll::<Value>(VIDEO_SEARCH, "totalVideos", "videos", query, max_results)
            .into_item_stream()
    }

    /// Search videos and collect every result.
    pub async fn search(
        &self,
        query: Map<String, Value>,
        max_results: Option<usize>,
    ) -> Result<Vec<Value>, Error> {
        self.search_stream(query, max_results).try_collect().await
    }

    async fn send_patch(
        &self,
        video_id: &str,
        operations: Vec<PatchOperation>,
    ) -> Result<(), Error> {
        if operations.is_empty() {
            debug!(video_id, "No patch operations, skipping request");
            return Ok(());
        }

        let body = serde_json::to_value(&operations)
            .map_err(|e| Error::decode(format!("cannot encode patch: {}", e)))?;
        self.client
            .patch(&format!("{}/{}", VIDEOS, video_id), Some(body))
            .await?;
        Ok(())
    }
}

fn file_part(field: &str, file_name: String, content_type: String, data: Bytes) -> FilePart {
    FilePart {
        field: field.to_string(),
        file_name,
        content_type,
        data,
    }
}
