use crate::errors::AppError;
use crate::file_processing::classifier;
use crate::models::{CodeCorpus, CodeIndex, FileKind, RepositorySnapshot};
use std::path::Path;
use tokio::fs;
use walkdir::WalkDir;

/// Directory holding version-control metadata inside a clone.
const VCS_METADATA_DIR: &str = ".git";

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Leave `.git` directories out of the walk entirely.
    pub skip_vcs_metadata: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            skip_vcs_metadata: false,
        }
    }
}

/// Walks a snapshot and builds the file index plus the corpus of textual files.
///
/// Every file lands in the index, including symbolic links that resolve to a
/// file. Only regular files the classifier accepts, and that read back as
/// UTF-8 in full, land in the corpus. Linked directories are not descended
/// into and linked files never reach the corpus.
pub async fn extract(
    snapshot: &RepositorySnapshot,
    options: &ExtractOptions,
) -> Result<(CodeIndex, CodeCorpus), AppError> {
    let root = snapshot.root();
    if !root.is_dir() {
        return Err(AppError::InvalidInput(format!(
            "Repository directory does not exist: {}",
            root.display()
        )));
    }

    let mut code_index = CodeIndex::default();
    let mut code_corpus = CodeCorpus::default();

    let skip_vcs = options.skip_vcs_metadata;
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            !(skip_vcs
                && entry.depth() > 0
                && entry.file_type().is_dir()
                && entry.file_name() == VCS_METADATA_DIR)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(AppError::InvalidInput(format!(
                    "Cannot walk {}: {}",
                    root.display(),
                    e
                )));
            }
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if entry.path_is_symlink() {
            if fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false) {
                let relative_path = relative_path(root, path);
                log::debug!("Indexing linked file {} without its content", relative_path);
                code_index.push(relative_path);
            }
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let relative_path = relative_path(root, path);
        code_index.push(relative_path.clone());

        if classifier::classify(path).await != FileKind::Textual {
            log::debug!("Excluding non-text file {}", relative_path);
            continue;
        }

        match fs::read_to_string(path).await {
            Ok(content) => code_corpus.push_file(&relative_path, &content),
            Err(source) => {
                let err = AppError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                };
                log::warn!("{}", err);
            }
        }
    }

    log::info!(
        "Indexed {} files, {} bytes of text",
        code_index.len(),
        code_corpus.len()
    );
    Ok((code_index, code_corpus))
}

/// `path` relative to `root`, joined with `/` on every platform.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n', 0, 0, 0, 0x0d];

    fn write(root: &Path, relative: &str, contents: &[u8]) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    async fn extract_dir(root: &Path) -> (CodeIndex, CodeCorpus) {
        extract(&RepositorySnapshot::new(root), &ExtractOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn readme_and_logo() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "README.md", b"Hello");
        write(tmp.path(), "logo.png", PNG_HEADER);

        let (index, corpus) = extract_dir(tmp.path()).await;

        assert_eq!(index.paths(), ["README.md", "logo.png"]);
        assert_eq!(
            corpus.as_str(),
            "----- File: README.md -----\nHello\n-------------------------\n"
        );
    }

    #[tokio::test]
    async fn empty_repository() {
        let tmp = TempDir::new().unwrap();
        let (index, corpus) = extract_dir(tmp.path()).await;
        assert!(index.is_empty());
        assert_eq!(corpus.as_str(), "");
    }

    #[tokio::test]
    async fn index_counts_every_file_and_corpus_follows_index_order() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "src/main.rs", b"fn main() {}\n");
        write(tmp.path(), "src/lib/mod.rs", b"pub mod x;\n");
        write(tmp.path(), "assets/icon.png", PNG_HEADER);
        write(tmp.path(), "Makefile", b"all:\n\tcargo build\n");
        write(tmp.path(), "data/blob", &[0u8, 1, 2, 3]);
        std::fs::create_dir_all(tmp.path().join("empty/dir")).unwrap();

        let (index, corpus) = extract_dir(tmp.path()).await;

        assert_eq!(index.len(), 5);
        assert_eq!(
            index.paths(),
            ["Makefile", "assets/icon.png", "data/blob", "src/lib/mod.rs", "src/main.rs"]
        );
        let textual: Vec<&str> = index
            .iter()
            .map(String::as_str)
            .filter(|p| !p.ends_with(".png") && *p != "data/blob")
            .collect();
        assert_eq!(corpus.file_paths(), textual);
        assert!(!corpus.as_str().contains("PNG"));
    }

    #[tokio::test]
    async fn classification_ignores_extension() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "script", b"#!/bin/sh\necho hi\n");
        write(tmp.path(), "fake.txt", PNG_HEADER);

        let (index, corpus) = extract_dir(tmp.path()).await;

        assert_eq!(index.len(), 2);
        assert_eq!(corpus.file_paths(), vec!["script"]);
    }

    #[tokio::test]
    async fn unreadable_text_keeps_index_entry_only() {
        let tmp = TempDir::new().unwrap();
        // Clean ASCII inside the sniff window, invalid UTF-8 after it.
        let mut bytes = vec![b'a'; 9 * 1024];
        bytes.push(0xff);
        write(tmp.path(), "big.txt", &bytes);
        write(tmp.path(), "small.txt", b"ok");

        let (index, corpus) = extract_dir(tmp.path()).await;

        assert_eq!(index.paths(), ["big.txt", "small.txt"]);
        assert_eq!(corpus.file_paths(), vec!["small.txt"]);
        assert!(!corpus.as_str().contains("aaaa"));
    }

    #[tokio::test]
    async fn git_metadata_indexed_by_default() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), ".git/HEAD", b"ref: refs/heads/main\n");
        write(tmp.path(), ".git/objects/ab/cdef", &[0x78, 0x01, 0, 0]);
        write(tmp.path(), ".gitignore", b"target\n");
        write(tmp.path(), "lib.rs", b"");

        let (index, corpus) = extract_dir(tmp.path()).await;
        assert_eq!(
            index.paths(),
            [".git/HEAD", ".git/objects/ab/cdef", ".gitignore", "lib.rs"]
        );
        assert_eq!(corpus.file_paths(), vec![".git/HEAD", ".gitignore", "lib.rs"]);

        let options = ExtractOptions {
            skip_vcs_metadata: true,
        };
        let (index, _) = extract(&RepositorySnapshot::new(tmp.path()), &options)
            .await
            .unwrap();
        assert_eq!(index.paths(), [".gitignore", "lib.rs"]);
    }

    #[tokio::test]
    async fn index_matches_file_count_on_disk() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), ".git/config", b"[core]\n");
        write(tmp.path(), ".git/refs/heads/main", b"0123abcd\n");
        write(tmp.path(), "src/main.rs", b"fn main() {}\n");
        write(tmp.path(), "logo.png", PNG_HEADER);

        let on_disk = WalkDir::new(tmp.path())
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .count();
        let (index, _) = extract_dir(tmp.path()).await;
        assert_eq!(index.len(), on_disk);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn linked_files_are_indexed_but_linked_dirs_not_followed() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "real/file.txt", b"content");
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("real/loop")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real/file.txt"), tmp.path().join("alias.txt"))
            .unwrap();
        std::os::unix::fs::symlink(tmp.path().join("missing"), tmp.path().join("dangling"))
            .unwrap();

        let (index, corpus) = extract_dir(tmp.path()).await;

        assert_eq!(index.paths(), ["alias.txt", "real/file.txt"]);
        assert_eq!(corpus.file_paths(), vec!["real/file.txt"]);
    }

    #[tokio::test]
    async fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = extract(
            &RepositorySnapshot::new(tmp.path().join("nope")),
            &ExtractOptions::default(),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/repo");
        assert_eq!(relative_path(root, &root.join("a").join("b.rs")), "a/b.rs");
    }
}
