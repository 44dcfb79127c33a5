use crate::errors::AppError;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Scratch directory that exists for the lifetime of the value and is
/// deleted recursively on drop.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn create(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        log::debug!("Scratch directory ready at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_dir_all(&self.path) {
                log::warn!(
                    "Failed to remove scratch directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Runs `body` with a fresh scratch directory at `path`.
///
/// The directory is removed once `body` finishes, whether it succeeded or
/// failed, and also when `interrupt` resolves first. In that case `body` is
/// dropped mid-flight and `AppError::Interrupted` is returned.
pub async fn with_scratch_dir<T, F, Fut, I>(
    path: impl Into<PathBuf>,
    interrupt: I,
    body: F,
) -> Result<T, AppError>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
    I: Future<Output = ()>,
{
    let scratch = ScratchDir::create(path)?;
    let body = body(scratch.path().to_path_buf());
    tokio::select! {
        result = body => result,
        _ = interrupt => {
            log::info!("Interrupted, removing {}", scratch.path().display());
            Err(AppError::Interrupted)
        }
    }
}
