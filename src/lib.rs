use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod upload;

pub use catalog::{FileKind, FixtureCatalog, FixtureRole, FixtureSpec};
pub use config::{init_logging, FixtureConfig};
pub use error::{FixtureError, Result};
pub use upload::{RejectReason, UploadPolicy, UploadSurface, Verdict, VerdictClass};

/// Size limit of the project-files upload dialog (inclusive).
pub const PROJECT_UPLOAD_LIMIT_BYTES: u64 = 10 * 1024 * 1024;

/// Size limit of chat input attachments (inclusive).
pub const CHAT_ATTACHMENT_LIMIT_BYTES: u64 = 100 * 1024;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    pub failed: Vec<PathBuf>,
    pub dir_removed: bool,
}

/// Writes fixture catalogs into a working directory and removes them again.
///
/// Every path written is tracked exactly once; `cleanup` deletes the tracked
/// paths and then the directory, but only if nothing else was left in it.
#[derive(Debug)]
pub struct FixtureGenerator {
    working_dir: PathBuf,
    tracked: Vec<PathBuf>,
}

impl FixtureGenerator {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            tracked: Vec::new(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn tracked_files(&self) -> &[PathBuf] {
        &self.tracked
    }

    /// Path a logical fixture name resolves to. Existence is not checked.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.working_dir.join(name)
    }

    /// Write the full project-files catalog.
    pub fn generate_all(&mut self) -> Result<()> {
        self.generate_catalog(&FixtureCatalog::project_files())
    }

    /// Write every entry of `catalog`. The first failure aborts the pass.
    pub fn generate_catalog(&mut self, catalog: &FixtureCatalog) -> Result<()> {
        catalog.validate()?;
        self.ensure_dir()?;

        info!(
            "Creating {} {} fixtures in {:?}",
            catalog.len(),
            catalog.surface.label(),
            self.working_dir
        );
        let start = Instant::now();

        let mut total_bytes = 0u64;
        for spec in &catalog.entries {
            self.generate(spec)?;
            total_bytes += spec.size_bytes;
        }

        info!(
            "Created {} fixtures ({} bytes) in {:.2?}",
            catalog.len(),
            total_bytes,
            start.elapsed()
        );
        Ok(())
    }

    /// Write a single fixture, overwriting any previous file of the same name.
    pub fn generate(&mut self, spec: &FixtureSpec) -> Result<PathBuf> {
        self.ensure_dir()?;

        let data = content::render(spec)?;
        let path = self.path_for(&spec.name);

        // One write per file so a failure never leaves a half-signed fixture behind
        std::fs::write(&path, &data).map_err(|source| FixtureError::Write {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote {:?} ({} bytes)", path, data.len());

        self.track(path.clone());
        Ok(path)
    }

    fn ensure_dir(&self) -> Result<()> {
        if self.working_dir.is_dir() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.working_dir).map_err(|source| FixtureError::CreateDir {
            path: self.working_dir.clone(),
            source,
        })
    }

    fn track(&mut self, path: PathBuf) {
        if !self.tracked.contains(&path) {
            self.tracked.push(path);
        }
    }

    /// Delete every tracked file, then the working directory if it is empty.
    ///
    /// Failures are logged and skipped; this never fails.
    pub fn cleanup(&mut self) -> CleanupReport {
        info!("Cleaning up {} fixture files...", self.tracked.len());

        let mut report = CleanupReport::default();

        for path in self.tracked.drain(..) {
            if !path.exists() {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    report.removed += 1;
                    debug!("Deleted fixture: {:?}", path);
                }
                Err(e) => {
                    warn!("Failed to delete fixture {:?}: {}", path, e);
                    report.failed.push(path);
                }
            }
        }

        report.dir_removed = self.remove_dir_if_empty();

        info!(
            "Cleanup finished: {} removed, {} failed, directory removed: {}",
            report.removed,
            report.failed.len(),
            report.dir_removed
        );
        report
    }

    fn remove_dir_if_empty(&self) -> bool {
        let mut entries = match std::fs::read_dir(&self.working_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return false,
            Err(e) => {
                warn!("Failed to read fixture directory {:?}: {}", self.working_dir, e);
                return false;
            }
        };

        if entries.next().is_some() {
            debug!("Keeping non-empty fixture directory {:?}", self.working_dir);
            return false;
        }

        match std::fs::remove_dir(&self.working_dir) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to remove fixture directory {:?}: {}", self.working_dir, e);
                false
            }
        }
    }
}

/// Generator that cleans up after itself when dropped.
///
/// Files are left on disk when the owning thread is panicking (a failed test)
/// or when the config asks to keep them, so they can be inspected.
#[derive(Debug)]
pub struct FixtureSession {
    generator: FixtureGenerator,
    keep_files: bool,
}

impl FixtureSession {
    /// Generate the project-files catalog under `config.working_dir`.
    pub fn start(config: &FixtureConfig) -> Result<Self> {
        Self::with_catalog(config, &FixtureCatalog::project_files())
    }

    pub fn with_catalog(config: &FixtureConfig, catalog: &FixtureCatalog) -> Result<Self> {
        let mut generator = FixtureGenerator::new(&config.working_dir);
        if let Err(e) = generator.generate_catalog(catalog) {
            // Whatever was written before the failure is still ours to remove
            generator.cleanup();
            return Err(e);
        }
        Ok(Self {
            generator,
            keep_files: config.keep_files,
        })
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.generator.path_for(name)
    }

    pub fn generator(&mut self) -> &mut FixtureGenerator {
        &mut self.generator
    }
}

impl Drop for FixtureSession {
    fn drop(&mut self) {
        if self.keep_files {
            info!("Keeping fixtures in {:?} (keep_files set)", self.generator.working_dir());
            return;
        }
        if std::thread::panicking() {
            warn!(
                "Test failed, leaving fixtures in {:?} for debugging",
                self.generator.working_dir()
            );
            return;
        }
        self.generator.cleanup();
    }
}
