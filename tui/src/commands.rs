//! Input Commands
//!
//! What a submitted input line means. Anything that is not a recognised
//! slash command is chat text and goes to the session unchanged.
//!
//! - `/nome <novo nome>` or `/name <new name>`: change display name
//! - `/sair` or `/quit`: leave

/// Meaning of one submitted input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputCommand {
    /// Send the input buffer as a chat message
    Chat,
    /// Change display name; `None` when no name was given
    Rename(Option<String>),
    /// Leave the chat
    Quit,
}

const RENAME_COMMANDS: &[&str] = &["/nome", "/name"];
const QUIT_COMMANDS: &[&str] = &["/sair", "/quit"];

/// Parse a submitted line
pub fn parse(input: &str) -> InputCommand {
    let trimmed = input.trim_start();
    if !trimmed.starts_with('/') {
        return InputCommand::Chat;
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed.trim_end(), ""),
    };

    if RENAME_COMMANDS.contains(&command) {
        let name = (!rest.is_empty()).then(|| rest.to_string());
        InputCommand::Rename(name)
    } else if QUIT_COMMANDS.contains(&command) && rest.is_empty() {
        InputCommand::Quit
    } else {
        // Unknown commands are just text
        InputCommand::Chat
    }
}
