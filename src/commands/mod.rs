use crate::cli::args::Commands;
use crate::errors::AppError;
use crate::models::Backend;
use crate::utils::config::{read_config_from, validate_config, write_config_to};
use std::path::Path;

/// Runs a configuration subcommand against the config file at `config_path`.
pub fn handle_subcommand(command: Commands, config_path: &Path) -> Result<(), AppError> {
    match command {
        Commands::Config {
            set_log_level,
            set_temp_folder,
            set_backend,
            set_max_prompt_bytes,
            set_shallow_clone,
            set_skip_vcs_metadata,
        } => handle_config_subcommand(
            config_path,
            set_log_level,
            set_temp_folder,
            set_backend,
            set_max_prompt_bytes,
            set_shallow_clone,
            set_skip_vcs_metadata,
        ),
        Commands::ModelConfig {
            set_anthropic_api_key,
            set_anthropic_model,
            set_max_tokens,
            set_vertex_project,
            set_vertex_location,
            set_vertex_model,
            set_vertex_access_token,
        } => handle_model_config_subcommand(
            config_path,
            ModelSettings {
                anthropic_api_key: set_anthropic_api_key,
                anthropic_model: set_anthropic_model,
                max_tokens: set_max_tokens,
                vertex_project: set_vertex_project,
                vertex_location: set_vertex_location,
                vertex_model: set_vertex_model,
                vertex_access_token: set_vertex_access_token,
            },
        ),
    }
}

/// Handles the config subcommand
fn handle_config_subcommand(
    config_path: &Path,
    set_log_level: Option<String>,
    set_temp_folder: Option<String>,
    set_backend: Option<Backend>,
    set_max_prompt_bytes: Option<usize>,
    set_shallow_clone: Option<bool>,
    set_skip_vcs_metadata: Option<bool>,
) -> Result<(), AppError> {
    let mut config = read_config_from(config_path)?;

    if let Some(log_level) = set_log_level {
        config.log_level = log_level.clone();
        println!("Log level set to {}", log_level);
    }

    if let Some(temp_folder) = set_temp_folder {
        config.temp_folder = temp_folder.clone();
        println!("Temp folder set to {}", temp_folder);
    }

    if let Some(backend) = set_backend {
        config.backend = backend;
        println!("Backend set to {}", backend.display_name());
    }

    if let Some(max_prompt_bytes) = set_max_prompt_bytes {
        if max_prompt_bytes == 0 {
            config.max_prompt_bytes = None;
            println!("Prompt size limit removed");
        } else {
            config.max_prompt_bytes = Some(max_prompt_bytes);
            println!("Prompt size limit set to {} bytes", max_prompt_bytes);
        }
    }

    if let Some(shallow_clone) = set_shallow_clone {
        config.shallow_clone = shallow_clone;
        println!("Shallow clone set to {}", shallow_clone);
    }

    if let Some(skip_vcs_metadata) = set_skip_vcs_metadata {
        config.skip_vcs_metadata = skip_vcs_metadata;
        println!("Skip .git metadata set to {}", skip_vcs_metadata);
    }

    validate_config(&config)?;
    write_config_to(config_path, &config)
}

/// Model settings given on the command line; `None` leaves a value unchanged.
#[derive(Debug)]
struct ModelSettings {
    anthropic_api_key: Option<String>,
    anthropic_model: Option<String>,
    max_tokens: Option<u32>,
    vertex_project: Option<String>,
    vertex_location: Option<String>,
    vertex_model: Option<String>,
    vertex_access_token: Option<String>,
}

/// Handles the model-config subcommand
fn handle_model_config_subcommand(
    config_path: &Path,
    settings: ModelSettings,
) -> Result<(), AppError> {
    let mut config = read_config_from(config_path)?;

    if let Some(api_key) = settings.anthropic_api_key {
        config.anthropic_api_key = Some(api_key);
        println!("Anthropic API key set");
    }

    if let Some(model) = settings.anthropic_model {
        config.anthropic_model = model.clone();
        println!("Anthropic model set to {}", model);
    }

    if let Some(max_tokens) = settings.max_tokens {
        config.max_tokens = max_tokens;
        println!("Max tokens set to {}", max_tokens);
    }

    if let Some(project) = settings.vertex_project {
        config.vertex_project = Some(project.clone());
        println!("Vertex project set to {}", project);
    }

    if let Some(location) = settings.vertex_location {
        config.vertex_location = location.clone();
        println!("Vertex location set to {}", location);
    }

    if let Some(model) = settings.vertex_model {
        config.vertex_model = model.clone();
        println!("Vertex model set to {}", model);
    }

    if let Some(token) = settings.vertex_access_token {
        config.vertex_access_token = Some(token);
        println!("Vertex access token set");
    }

    validate_config(&config)?;
    write_config_to(config_path, &config)
}
