use crate::models::Backend;
use clap::{Parser, Subcommand};

/// CLI arguments for the Repo Tutor application.
#[derive(Parser, Debug, PartialEq, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// URL of the repository to analyze.
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Question to ask about the repository. Repeat to ask several; without
    /// any, questions are read interactively.
    #[arg(short, long)]
    pub question: Vec<String>,

    /// AI model backend to use for this run.
    #[arg(short, long, value_enum)]
    pub backend: Option<Backend>,

    /// Temporary folder to store repository files.
    #[arg(long)]
    pub temp_folder: Option<String>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for the Repo Tutor application.
#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum Commands {
    /// Manage configuration options.
    Config {
        /// Set the log level (off, error, warn, info, debug, trace).
        #[arg(long)]
        set_log_level: Option<String>,

        /// Set the temporary folder used for cloning.
        #[arg(long)]
        set_temp_folder: Option<String>,

        /// Set the default AI model backend.
        #[arg(long, value_enum)]
        set_backend: Option<Backend>,

        /// Set the maximum prompt size in bytes (0 removes the limit).
        #[arg(long)]
        set_max_prompt_bytes: Option<usize>,

        /// Clone only the latest commit.
        #[arg(long)]
        set_shallow_clone: Option<bool>,

        /// Leave `.git` out of the file index.
        #[arg(long)]
        set_skip_vcs_metadata: Option<bool>,
    },

    /// Manage model configuration options.
    ModelConfig {
        /// Set the API key for Anthropic.
        #[arg(long)]
        set_anthropic_api_key: Option<String>,

        /// Set the Anthropic model id.
        #[arg(long)]
        set_anthropic_model: Option<String>,

        /// Set the maximum number of tokens in an Anthropic answer.
        #[arg(long)]
        set_max_tokens: Option<u32>,

        /// Set the Google Cloud project for Vertex AI.
        #[arg(long)]
        set_vertex_project: Option<String>,

        /// Set the Vertex AI location.
        #[arg(long)]
        set_vertex_location: Option<String>,

        /// Set the Vertex AI model id.
        #[arg(long)]
        set_vertex_model: Option<String>,

        /// Set a Vertex AI access token.
        #[arg(long)]
        set_vertex_access_token: Option<String>,
    },
}
