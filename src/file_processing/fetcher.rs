use crate::errors::AppError;
use crate::models::RepositorySnapshot;
use std::path::Path;
use tokio::fs;
use tokio::process::Command;

/// Clones `source_url` into `target_dir`, deleting whatever was there first.
///
/// On failure the partial clone is removed and `target_dir` is left empty.
pub async fn fetch(
    source_url: &str,
    target_dir: &Path,
    shallow: bool,
) -> Result<RepositorySnapshot, AppError> {
    let source_url = source_url.trim();
    if source_url.is_empty() {
        return Err(AppError::FetchFailed {
            url: String::new(),
            cause: "repository URL is empty".to_string(),
        });
    }

    reset_directory(target_dir)
        .await
        .map_err(|e| fetch_failed(source_url, format!("cannot prepare {}: {}", target_dir.display(), e)))?;

    log::info!("Cloning {} into {}", source_url, target_dir.display());

    let mut cmd = Command::new("git");
    cmd.arg("clone");
    if shallow {
        cmd.args(["--depth", "1"]);
    }
    cmd.arg("--").arg(source_url).arg(target_dir);
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    // An interrupted ingest must not leave git writing into the scratch dir.
    cmd.kill_on_drop(true);

    let output = cmd.output().await.map_err(|e| {
        fetch_failed(
            source_url,
            format!("failed to execute 'git clone'. Is git installed? ({})", e),
        )
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if let Err(e) = reset_directory(target_dir).await {
            log::warn!("Could not clean up partial clone in {}: {}", target_dir.display(), e);
        }
        return Err(fetch_failed(source_url, stderr.trim().to_string()));
    }

    Ok(RepositorySnapshot::new(target_dir))
}

/// Deletes `dir` with all its contents, then recreates it empty.
async fn reset_directory(dir: &Path) -> std::io::Result<()> {
    if fs::try_exists(dir).await? {
        fs::remove_dir_all(dir).await?;
    }
    fs::create_dir_all(dir).await
}

fn fetch_failed(url: &str, cause: String) -> AppError {
    AppError::FetchFailed {
        url: url.to_string(),
        cause,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command as StdCommand;
    use tempfile::TempDir;

    fn git_available() -> bool {
        StdCommand::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = StdCommand::new("git")
            .args(["-c", "user.name=Tutor", "-c", "user.email=tutor@example.com"])
            .args(args)
            .current_dir(dir)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    #[tokio::test]
    async fn reset_directory_removes_previous_contents() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("repo");
        std::fs::create_dir_all(target.join("nested")).unwrap();
        std::fs::write(target.join("nested/old.txt"), "old").unwrap();

        reset_directory(&target).await.unwrap();

        assert!(target.is_dir());
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn empty_url_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = fetch("  ", &tmp.path().join("repo"), true).await.unwrap_err();
        assert!(matches!(err, AppError::FetchFailed { .. }));
        assert!(!tmp.path().join("repo").exists());
    }

    #[tokio::test]
    async fn unreachable_source_fails_and_leaves_empty_target() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("repo");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("stale.txt"), "stale").unwrap();
        let missing = tmp.path().join("does-not-exist");

        let err = fetch(missing.to_str().unwrap(), &target, false).await.unwrap_err();

        match err {
            AppError::FetchFailed { url, .. } => assert_eq!(url, missing.to_str().unwrap()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(target.is_dir());
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn refetch_replaces_previous_clone() {
        if !git_available() {
            eprintln!("git not available, skipping");
            return;
        }
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        std::fs::create_dir_all(&source).unwrap();
        git(&source, &["init", "-q"]);
        std::fs::write(source.join("README.md"), "Hello").unwrap();
        git(&source, &["add", "README.md"]);
        git(&source, &["commit", "-q", "-m", "initial"]);

        let target = tmp.path().join("clone");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("leftover.rs"), "fn old() {}").unwrap();

        let snapshot = fetch(source.to_str().unwrap(), &target, false).await.unwrap();

        assert_eq!(snapshot.root(), target.as_path());
        assert!(!target.join("leftover.rs").exists());
        assert_eq!(std::fs::read_to_string(target.join("README.md")).unwrap(), "Hello");
    }
}
