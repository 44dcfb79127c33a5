use crate::models::Backend;
use clap::ValueEnum;

/// One line typed at the interactive prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Empty,
    Quit,
    ShowIndex,
    SwitchBackend(Backend),
    Invalid(String),
    Question(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix(':') else {
        return Input::Question(line.to_string());
    };

    let mut words = command.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("quit" | "q" | "exit"), None, _) => Input::Quit,
        (Some("index"), None, _) => Input::ShowIndex,
        (Some("backend"), Some(name), None) => match Backend::from_str(name, true) {
            Ok(backend) => Input::SwitchBackend(backend),
            Err(_) => Input::Invalid(format!(
                "Unknown backend '{}', expected claude or gemini",
                name
            )),
        },
        _ => Input::Invalid(format!(
            "Unknown command ':{}'. Try :backend <claude|gemini>, :index or :quit",
            command
        )),
    }
}
