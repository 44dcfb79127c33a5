mod api;
mod cli;
mod commands;
mod errors;
mod file_processing;
mod models;
mod prompt;
mod session;
mod utils;

use crate::utils::logger;
use clap::Parser;
use cli::args::Args;
use cli::display::CliDisplayManager;
use cli::input::{parse_input, Input};
use colored::*;
use errors::AppError;
use session::Session;
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use utils::config::{get_config_path, read_config};
use utils::scratch::with_scratch_dir;

/// Directory inside the scratch folder that receives the clone.
const REPOSITORY_DIR: &str = "repository";

/// The main entry point of the application
#[tokio::main]
async fn main() {
    match run().await {
        Ok(()) => {}
        Err(AppError::Interrupted) => {
            eprintln!("\n{}", "Interrupted, scratch directory removed".bright_yellow());
            std::process::exit(130);
        }
        Err(e) => {
            eprintln!("{} {}", "error:".bright_red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<(), AppError> {
    let args = Args::parse();
    let start_time = Instant::now();

    // Handle subcommands
    if let Some(command) = args.command {
        return commands::handle_subcommand(command, &get_config_path()?);
    }

    let config = read_config()?;
    logger::setup_logger(&config);

    let backend = args.backend.unwrap_or(config.backend);
    let temp_folder = args
        .temp_folder
        .clone()
        .unwrap_or_else(|| config.temp_folder.clone());

    let mut display_manager = CliDisplayManager::new();
    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();

    display_manager.print_header();

    let repo_url = match args.repo {
        Some(url) => url,
        None => {
            print!("Enter GitHub Repository URL: ");
            std::io::Write::flush(&mut std::io::stdout())?;
            stdin_lines
                .next_line()
                .await?
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .ok_or_else(|| AppError::InvalidInput("Repository URL is required".to_string()))?
        }
    };

    // Every exit path below, Ctrl-C included, removes the scratch directory.
    let questions = &args.question;
    let display = &mut display_manager;
    let answered = with_scratch_dir(temp_folder, ctrl_c(), move |scratch| {
        run_session(
            questions,
            Session::new(backend, config),
            repo_url,
            scratch,
            display,
            stdin_lines,
        )
    })
    .await;
    display_manager.stop_spinner();

    display_manager.print_footer(answered?, start_time.elapsed());
    Ok(())
}

/// Resolves on the first Ctrl-C. Never resolves if no handler can be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Clones and extracts the repository into `scratch`, then answers questions.
async fn run_session(
    questions: &[String],
    mut session: Session,
    repo_url: String,
    scratch: PathBuf,
    display_manager: &mut CliDisplayManager,
    mut stdin_lines: Lines<BufReader<Stdin>>,
) -> Result<usize, AppError> {
    display_manager.print_fetch_start(&repo_url);
    display_manager.start_spinner("Extracting code");
    let ingested = session
        .ingest(&repo_url, &scratch.join(REPOSITORY_DIR))
        .await;
    display_manager.stop_spinner();
    ingested?;

    if let (Some(index), Some(corpus)) = (session.code_index(), session.code_corpus()) {
        display_manager.print_extraction_summary(index.len(), corpus.file_paths().len());
        if index.is_empty() || corpus.is_empty() {
            display_manager.print_error("No text or code files found; answers will lack context");
        }
    }
    display_manager.print_ready(session.backend());

    if questions.is_empty() {
        display_manager.print_interactive_help();
        return interactive_loop(&mut session, display_manager, &mut stdin_lines).await;
    }

    let mut answered = 0;
    for question in questions {
        display_manager.print_question(question);
        if answer_question(&mut session, display_manager, question).await {
            answered += 1;
        }
    }
    Ok(answered)
}

/// Reads questions until `:quit` or end of input.
async fn interactive_loop(
    session: &mut Session,
    display_manager: &mut CliDisplayManager,
    stdin_lines: &mut Lines<BufReader<Stdin>>,
) -> Result<usize, AppError> {
    let mut answered = 0;
    loop {
        display_manager.print_prompt();
        let Some(line) = stdin_lines.next_line().await? else {
            println!();
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::ShowIndex => {
                if let Some(index) = session.code_index() {
                    display_manager.print_index(index);
                }
            }
            Input::SwitchBackend(backend) => {
                session.switch_backend(backend);
                display_manager.print_backend_switch(backend);
            }
            Input::Invalid(message) => display_manager.print_error(&message),
            Input::Question(question) => {
                if answer_question(session, display_manager, &question).await {
                    answered += 1;
                }
            }
        }
    }
    Ok(answered)
}

/// Asks one question and shows either the answer or the error.
async fn answer_question(
    session: &mut Session,
    display_manager: &mut CliDisplayManager,
    question: &str,
) -> bool {
    display_manager.start_spinner("Generating response");
    let result = session.ask(question).await;
    display_manager.stop_spinner();

    match result {
        Ok(answer) => {
            display_manager.print_answer(&answer);
            true
        }
        Err(e) => {
            log::error!("Question failed: {}", e);
            display_manager.print_error(&format!("An error occurred: {}", e));
            false
        }
    }
}
