//! Upload surfaces of the application under test.
//!
//! Each surface has its own type whitelist and size limit. The policy here
//! predicts the surface's verdict for a file so fixture roles can be checked
//! before a browser ever sees them.

use crate::content::extension_of;
use crate::error::{FixtureError, Result};
use crate::{CHAT_ATTACHMENT_LIMIT_BYTES, PROJECT_UPLOAD_LIMIT_BYTES};
use log::debug;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes read from the head of a file for content sniffing.
const SNIFF_LEN: u64 = 8192;

const PROJECT_EXTENSIONS: &[&str] = &[
    "txt", "md", "docx", "doc", "pdf", "pptx", "xlsx", "xls", "jpeg", "jpg", "png", "gif", "webp", "svg",
];

const CHAT_EXTENSIONS: &[&str] = &[
    "txt", "md", "pdf", "doc", "docx", "xls", "xlsx", "csv", "png", "jpg", "jpeg",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadSurface {
    /// "Upload project files" dialog.
    ProjectFiles,
    /// Attachment control of the chat input.
    ChatAttachment,
}

impl UploadSurface {
    /// Largest accepted size; the limit itself is accepted.
    pub fn limit_bytes(self) -> u64 {
        match self {
            UploadSurface::ProjectFiles => PROJECT_UPLOAD_LIMIT_BYTES,
            UploadSurface::ChatAttachment => CHAT_ATTACHMENT_LIMIT_BYTES,
        }
    }

    pub fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            UploadSurface::ProjectFiles => PROJECT_EXTENSIONS,
            UploadSurface::ChatAttachment => CHAT_EXTENSIONS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UploadSurface::ProjectFiles => "project files",
            UploadSurface::ChatAttachment => "chat attachment",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    Empty,
    UnsupportedType {
        extension: Option<String>,
        detected_mime: Option<String>,
    },
    TooLarge {
        size: u64,
        limit: u64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Accepted { detected_mime: Option<String> },
    Rejected(RejectReason),
}

/// Verdict with the payload stripped, for comparing against expectations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictClass {
    Accepted,
    Empty,
    UnsupportedType,
    TooLarge,
}

impl Verdict {
    pub fn class(&self) -> VerdictClass {
        match self {
            Verdict::Accepted { .. } => VerdictClass::Accepted,
            Verdict::Rejected(RejectReason::Empty) => VerdictClass::Empty,
            Verdict::Rejected(RejectReason::UnsupportedType { .. }) => VerdictClass::UnsupportedType,
            Verdict::Rejected(RejectReason::TooLarge { .. }) => VerdictClass::TooLarge,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct UploadPolicy {
    surface: UploadSurface,
}

impl UploadPolicy {
    pub fn new(surface: UploadSurface) -> Self {
        Self { surface }
    }

    pub fn project_files() -> Self {
        Self::new(UploadSurface::ProjectFiles)
    }

    pub fn chat_attachment() -> Self {
        Self::new(UploadSurface::ChatAttachment)
    }

    pub fn surface(&self) -> UploadSurface {
        self.surface
    }

    /// Judge a file the way the surface would: empty first, then type, then size.
    pub fn evaluate(&self, path: &Path) -> Result<Verdict> {
        let inspect_err = |source| FixtureError::Inspect {
            path: path.to_path_buf(),
            source,
        };

        let size = std::fs::metadata(path).map_err(inspect_err)?.len();
        if size == 0 {
            return Ok(Verdict::Rejected(RejectReason::Empty));
        }

        let mut head = Vec::new();
        File::open(path)
            .and_then(|file| file.take(SNIFF_LEN).read_to_end(&mut head))
            .map_err(inspect_err)?;

        // Detect file type using magic bytes
        let detected_mime = infer::get(&head).map(|t| t.mime_type().to_string());

        let extension = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(extension_of);

        debug!(
            "Evaluating {:?} for {}: {} bytes, extension {:?}, detected {:?}",
            path,
            self.surface.label(),
            size,
            extension,
            detected_mime
        );

        let supported = extension
            .as_deref()
            .map(|ext| self.surface.accepted_extensions().contains(&ext))
            .unwrap_or(false);
        if !supported {
            return Ok(Verdict::Rejected(RejectReason::UnsupportedType {
                extension,
                detected_mime,
            }));
        }

        let limit = self.surface.limit_bytes();
        if size > limit {
            return Ok(Verdict::Rejected(RejectReason::TooLarge { size, limit }));
        }

        Ok(Verdict::Accepted { detected_mime })
    }
}
