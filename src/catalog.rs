//! The fixed fixture catalogs and the value model behind them.

use crate::content::{CSV_TABLE, SVG_MARKUP};
use crate::error::{FixtureError, Result};
use crate::upload::{UploadSurface, VerdictClass};
use crate::{CHAT_ATTACHMENT_LIMIT_BYTES, PROJECT_UPLOAD_LIMIT_BYTES};
use serde::Serialize;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// How a fixture's bytes are produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileKind {
    /// UTF-8 content written verbatim.
    Text { content: String },
    /// Minimal PDF document padded with filler.
    Pdf,
    /// ZIP signature then zeros (docx/xlsx/pptx).
    ZipContainer,
    /// OLE compound-file signature then zeros (doc/xls/ppt).
    OleCompound,
    /// Extension-specific image signature then zeros.
    Image,
    Svg,
    Csv,
    Empty,
    /// A single byte repeated to the target size.
    Filled { byte: u8 },
    /// OS-sourced random bytes.
    Random,
}

/// Why a fixture is in the catalog, i.e. what the upload surface should do with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureRole {
    Supported,
    AtLimit,
    Oversized,
    Empty,
    Unsupported,
    /// Acceptance not settled by the application yet; no expectation.
    Exploratory,
}

impl FixtureRole {
    pub fn expected_verdict(self) -> Option<VerdictClass> {
        match self {
            FixtureRole::Supported | FixtureRole::AtLimit => Some(VerdictClass::Accepted),
            FixtureRole::Oversized => Some(VerdictClass::TooLarge),
            FixtureRole::Empty => Some(VerdictClass::Empty),
            FixtureRole::Unsupported => Some(VerdictClass::UnsupportedType),
            FixtureRole::Exploratory => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FixtureSpec {
    pub name: String,
    pub size_bytes: u64,
    pub kind: FileKind,
    pub role: FixtureRole,
}

impl FixtureSpec {
    /// Entry whose size is given explicitly. For content-defined kinds the
    /// size is taken from the content instead and `size_bytes` is ignored.
    pub fn new(name: impl Into<String>, size_bytes: u64, kind: FileKind, role: FixtureRole) -> Self {
        let size_bytes = match &kind {
            FileKind::Text { content } => content.len() as u64,
            FileKind::Svg => SVG_MARKUP.len() as u64,
            FileKind::Csv => CSV_TABLE.len() as u64,
            FileKind::Empty => 0,
            _ => size_bytes,
        };
        Self {
            name: name.into(),
            size_bytes,
            kind,
            role,
        }
    }

    pub fn text(name: impl Into<String>, content: impl Into<String>, role: FixtureRole) -> Self {
        Self::new(name, 0, FileKind::Text { content: content.into() }, role)
    }
}

/// An ordered set of fixtures aimed at one upload surface.
#[derive(Clone, Debug, Serialize)]
pub struct FixtureCatalog {
    pub surface: UploadSurface,
    pub entries: Vec<FixtureSpec>,
}

impl FixtureCatalog {
    pub fn new(surface: UploadSurface) -> Self {
        Self {
            surface,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, spec: FixtureSpec) -> &mut Self {
        self.entries.push(spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FixtureSpec> {
        self.entries.iter().find(|spec| spec.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|spec| spec.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Supported fixtures must be strictly under the surface limit, otherwise
    /// the "accepted" tests they back would be testing the boundary instead.
    pub fn validate(&self) -> Result<()> {
        let limit = self.surface.limit_bytes();
        for spec in &self.entries {
            if spec.role == FixtureRole::Supported && spec.size_bytes >= limit {
                return Err(FixtureError::ExceedsSurfaceLimit {
                    name: spec.name.clone(),
                    size: spec.size_bytes,
                    limit,
                    surface: self.surface.label(),
                });
            }
        }
        Ok(())
    }

    /// JSON manifest of the catalog for automation running in another process.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The catalog behind the project-files upload dialog.
    pub fn project_files() -> Self {
        use FixtureRole::*;

        let mut catalog = Self::new(UploadSurface::ProjectFiles);

        catalog
            .push(FixtureSpec::text("test-file.txt", "This is a test text file.\nLine 2\nLine 3", Supported))
            .push(FixtureSpec::text("file1.txt", "Sample text content for testing", Supported))
            .push(FixtureSpec::text(
                "readme.md",
                "# Test Markdown\n\n## Overview\nThis is a test markdown file.",
                Supported,
            ))
            .push(FixtureSpec::text("file2.md", "# Another Markdown\n\nTest content here.", Supported));

        for name in [
            "sample.pdf",
            "document.pdf",
            "document1.pdf",
            "test.pdf",
            "to-delete.pdf",
            "valid-document.pdf",
        ] {
            catalog.push(FixtureSpec::new(name, 1000 * KIB, FileKind::Pdf, Supported));
        }

        catalog
            .push(FixtureSpec::new("report.docx", 200 * KIB, FileKind::ZipContainer, Supported))
            .push(FixtureSpec::new("letter.doc", 1000 * KIB, FileKind::OleCompound, Supported))
            .push(FixtureSpec::new("document2.docx", 1000 * KIB, FileKind::ZipContainer, Supported))
            .push(FixtureSpec::new("data.xlsx", 1000 * KIB, FileKind::ZipContainer, Supported))
            .push(FixtureSpec::new("budget.xls", 120 * KIB, FileKind::OleCompound, Supported))
            .push(FixtureSpec::new("spreadsheet.xlsx", 1000 * KIB, FileKind::ZipContainer, Supported))
            .push(FixtureSpec::new("presentation.pptx", 1000 * KIB, FileKind::ZipContainer, Supported));

        for name in [
            "photo.jpg",
            "screenshot.png",
            "image.png",
            "valid-image.png",
            "sample.jpeg",
            "sample.webp",
            "sample.gif",
        ] {
            catalog.push(FixtureSpec::new(name, 1000 * KIB, FileKind::Image, Supported));
        }

        catalog
            .push(FixtureSpec::new("logo.svg", 0, FileKind::Svg, Supported))
            .push(FixtureSpec::new("data.csv", 0, FileKind::Csv, Exploratory));

        // Size boundaries
        catalog
            .push(FixtureSpec::new("large-file-11mb.pdf", 11 * MIB, FileKind::Pdf, Oversized))
            .push(FixtureSpec::new(
                "exact-10mb.txt",
                PROJECT_UPLOAD_LIMIT_BYTES,
                FileKind::Filled { byte: b'A' },
                AtLimit,
            ))
            .push(FixtureSpec::new("empty-file.txt", 0, FileKind::Empty, Empty));

        // Unsupported types
        catalog
            .push(FixtureSpec::new("malicious.exe", 50 * KIB, FileKind::Random, Unsupported))
            .push(FixtureSpec::text("script.js", "console.log(\"test\");", Unsupported))
            .push(FixtureSpec::new("video.mp4", 1024 * KIB, FileKind::Random, Unsupported))
            .push(FixtureSpec::new("audio.mp3", 512 * KIB, FileKind::Random, Unsupported))
            .push(FixtureSpec::new("invalid.exe", 100 * KIB, FileKind::Random, Unsupported));

        catalog
    }

    /// The catalog behind the chat input's attachment control.
    pub fn chat_attachments() -> Self {
        use FixtureRole::*;

        let mut catalog = Self::new(UploadSurface::ChatAttachment);

        catalog
            .push(FixtureSpec::text("document.txt", "Test content", Supported))
            .push(FixtureSpec::new("large.txt", 99 * KIB, FileKind::Filled { byte: b'a' }, Supported))
            .push(FixtureSpec::new(
                "limit.txt",
                CHAT_ATTACHMENT_LIMIT_BYTES,
                FileKind::Filled { byte: b'a' },
                AtLimit,
            ))
            .push(FixtureSpec::new("huge.txt", 200 * KIB, FileKind::Filled { byte: b'a' }, Oversized))
            .push(FixtureSpec::new("massive.txt", MIB, FileKind::Filled { byte: b'x' }, Oversized))
            .push(FixtureSpec::new("malware.exe", KIB, FileKind::Random, Unsupported))
            .push(FixtureSpec::text("script.sh", "#!/bin/sh\necho test\n", Unsupported))
            .push(FixtureSpec::new("archive.zip", KIB, FileKind::ZipContainer, Unsupported))
            .push(FixtureSpec::new("empty.txt", 0, FileKind::Empty, Exploratory))
            .push(FixtureSpec::text("null.txt", "text\0null", Exploratory));

        catalog
    }
}
