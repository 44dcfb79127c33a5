use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const FILE_HEADER_PREFIX: &str = "----- File: ";
pub const FILE_HEADER_SUFFIX: &str = " -----";
pub const FILE_FOOTER: &str = "-------------------------";

/// Answer-generation backend used by a session.
#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Anthropic Messages API, one request per question.
    Claude,
    /// Vertex AI Gemini chat, answers streamed back in fragments.
    #[default]
    Gemini,
}

impl Backend {
    pub fn display_name(&self) -> &'static str {
        match self {
            Backend::Claude => "Anthropic Claude AI",
            Backend::Gemini => "Gemini AI",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Claude => write!(f, "claude"),
            Backend::Gemini => write!(f, "gemini"),
        }
    }
}

/// Outcome of content sniffing for a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Textual,
    Other,
}

/// A working copy cloned onto local storage.
#[derive(Debug, Clone)]
pub struct RepositorySnapshot {
    root: PathBuf,
}

impl RepositorySnapshot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Relative paths of every file found under a snapshot, in walk order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeIndex(Vec<String>);

impl CodeIndex {
    pub fn push(&mut self, relative_path: String) {
        self.0.push(relative_path);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn paths(&self) -> &[String] {
        &self.0
    }
}

/// Concatenated contents of the textual files of a snapshot.
///
/// Each file is framed as
/// `----- File: <path> -----\n<content>\n-------------------------\n`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeCorpus(String);

impl CodeCorpus {
    /// Appends one framed file block.
    pub fn push_file(&mut self, relative_path: &str, content: &str) {
        self.0.reserve(
            FILE_HEADER_PREFIX.len()
                + relative_path.len()
                + FILE_HEADER_SUFFIX.len()
                + content.len()
                + FILE_FOOTER.len()
                + 3,
        );
        self.0.push_str(FILE_HEADER_PREFIX);
        self.0.push_str(relative_path);
        self.0.push_str(FILE_HEADER_SUFFIX);
        self.0.push('\n');
        self.0.push_str(content);
        self.0.push('\n');
        self.0.push_str(FILE_FOOTER);
        self.0.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Paths named by the header lines, in the order they appear.
    pub fn file_paths(&self) -> Vec<&str> {
        self.0
            .lines()
            .filter_map(|line| {
                line.strip_prefix(FILE_HEADER_PREFIX)?
                    .strip_suffix(FILE_HEADER_SUFFIX)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_file_frames_content() {
        let mut corpus = CodeCorpus::default();
        corpus.push_file("README.md", "Hello");
        assert_eq!(
            corpus.as_str(),
            "----- File: README.md -----\nHello\n-------------------------\n"
        );
    }

    #[test]
    fn file_paths_follow_insertion_order() {
        let mut corpus = CodeCorpus::default();
        corpus.push_file("src/main.rs", "fn main() {}\n");
        corpus.push_file("Cargo.toml", "[package]");
        corpus.push_file("a/b/c.txt", "");
        assert_eq!(corpus.file_paths(), vec!["src/main.rs", "Cargo.toml", "a/b/c.txt"]);
    }

    #[test]
    fn empty_corpus_has_no_paths() {
        let corpus = CodeCorpus::default();
        assert!(corpus.is_empty());
        assert!(corpus.file_paths().is_empty());
    }

    #[test]
    fn backend_names() {
        assert_eq!(Backend::Claude.to_string(), "claude");
        assert_eq!(Backend::Gemini.display_name(), "Gemini AI");
        assert_eq!(Backend::default(), Backend::Gemini);
        assert_eq!(Backend::from_str("CLAUDE", true), Ok(Backend::Claude));
    }
}
