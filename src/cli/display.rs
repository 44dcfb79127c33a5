use crate::models::{Backend, CodeIndex};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Manages CLI display and output formatting.
pub struct CliDisplayManager {
    spinner: Option<ProgressBar>,
}

impl CliDisplayManager {
    /// Creates a new `CliDisplayManager`.
    pub fn new() -> Self {
        CliDisplayManager { spinner: None }
    }

    /// Prints the application header.
    pub fn print_header(&self) {
        let title = format!("│  📚 Repo Tutor v{:<8}│", env!("CARGO_PKG_VERSION"));
        println!("\n{}", "╭──────────────────────────╮".bright_magenta());
        println!("{}", title.bright_magenta().bold());
        println!("{}\n", "╰──────────────────────────╯".bright_magenta());
    }

    /// Prints the start of the repository clone.
    pub fn print_fetch_start(&self, url: &str) {
        self.print_section("📁", "[1/2] Cloning Repository", url);
    }

    /// Prints how much of the repository made it into the corpus.
    pub fn print_extraction_summary(&self, indexed: usize, included: usize) {
        self.print_info(&format!(
            "Indexed {} file(s), {} included as text",
            indexed, included
        ));
    }

    /// Prints that questions can now be asked.
    pub fn print_ready(&self, backend: Backend) {
        println!();
        self.print_section(
            "💬",
            "[2/2] Ask Questions",
            &format!("Using {}", backend.display_name()),
        );
    }

    pub fn print_interactive_help(&self) {
        self.print_info("Type a question, or :backend <claude|gemini>, :index, :quit");
    }

    pub fn print_backend_switch(&self, backend: Backend) {
        self.print_info(&format!("Switched to {}", backend.display_name()));
    }

    /// Prints the input marker for the next question.
    pub fn print_prompt(&self) {
        print!("\n{} ", "?".bright_yellow().bold());
        let _ = std::io::stdout().flush();
    }

    /// Prints the question being answered in non-interactive mode.
    pub fn print_question(&self, question: &str) {
        println!("\n{} {}", "?".bright_yellow().bold(), question.bright_white());
    }

    /// Prints the model answer.
    pub fn print_answer(&self, answer: &str) {
        println!("\n{}", "### Response:".bright_cyan().bold());
        println!("{}", answer);
    }

    pub fn print_index(&self, index: &CodeIndex) {
        for path in index.paths() {
            println!("   {} {}", "·".bright_white(), path);
        }
        self.print_info(&format!("{} file(s)", index.len()));
    }

    /// Prints an error without stopping the session.
    pub fn print_error(&self, message: &str) {
        println!("   {} {}", "✗".bright_red(), message.bright_red());
    }

    /// Prints the application footer.
    pub fn print_footer(&self, answered: usize, duration: Duration) {
        println!();
        println!(
            "{}",
            format!("⚡ Answered {} question(s)", answered)
                .bright_white()
                .dimmed(),
        );
        println!(
            "{}",
            format!("⚡ Completed in {:.2?}", duration)
                .bright_white()
                .dimmed(),
        );
        println!();
    }

    /// Starts a spinner for ongoing operations.
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template(&format!(
            "   {} {{spinner}} {}",
            "→".bright_white(),
            message.italic().bright_white()
        ))
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Stops the spinner.
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Helper function to print a section header.
    fn print_section(&self, icon: &str, title: &str, description: &str) {
        println!("{} {}", icon.bright_yellow(), title.bright_cyan().bold());
        if !description.is_empty() {
            println!(
                "   {} {}",
                "→".bright_white(),
                description.italic().bright_white()
            );
        }
    }

    /// Helper function to print an informational message.
    fn print_info(&self, message: &str) {
        println!(
            "   {} {}",
            "→".bright_white(),
            message.italic().bright_white()
        );
    }
}
