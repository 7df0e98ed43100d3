//! Remote assistant port.
//!
//! Any backend that answers chat turns implements [`AssistantClient`].
//! Calls never fail with an error: the outcome is always carried by the
//! `success` flag of [`ApiResponse`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of a remote assistant call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    /// A successful reply carrying the assistant text.
    pub fn ok(data: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    /// A failed call carrying an error message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Returns the reply text if the call succeeded with a non-empty reply.
    pub fn reply(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.data.as_deref().filter(|data| !data.is_empty())
    }
}

/// An image picked by the user, held in memory for the duration of a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// Where the image was read from, if it came from disk
    pub source: Option<PathBuf>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl AsRef<Path>) -> Self {
        self.source = Some(source.as_ref().to_path_buf());
        self
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// The part of the MIME type after the slash (`png` for `image/png`).
    pub fn subtype(&self) -> &str {
        self.mime_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .unwrap_or_default()
    }

    /// A transient reference to the image for previews.
    ///
    /// Points at the source file when there is one; such references are not
    /// guaranteed to resolve after the file moves or the app restarts.
    pub fn preview_url(&self) -> String {
        match &self.source {
            Some(path) => format!("file://{}", path.display()),
            None => format!("preview:{}", self.file_name),
        }
    }
}

/// A request ready to be dispatched to an [`AssistantClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantRequest {
    Text { text: String, instruction: String },
    Image { image: ImageUpload, instruction: String },
}

impl AssistantRequest {
    pub fn instruction(&self) -> &str {
        match self {
            Self::Text { instruction, .. } | Self::Image { instruction, .. } => instruction,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// A remote chat backend.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Sends user text with the selected prompt's instruction.
    async fn send_text(&self, text: &str, instruction: &str) -> ApiResponse;

    /// Sends an image with the selected prompt's instruction.
    async fn send_image(&self, image: &ImageUpload, instruction: &str) -> ApiResponse;

    /// Dispatches a prepared request to the matching call.
    async fn send(&self, request: &AssistantRequest) -> ApiResponse {
        match request {
            AssistantRequest::Text { text, instruction } => self.send_text(text, instruction).await,
            AssistantRequest::Image { image, instruction } => {
                self.send_image(image, instruction).await
            }
        }
    }
}
