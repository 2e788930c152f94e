//! Composer slash commands.

use thiserror::Error;

/// A parsed composer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Stage a local file for the next message.
    Attach(String),
    /// Drop the staged file.
    Detach,
    /// Open the preview modal for message `n` (1-based).
    Preview(usize),
    /// Play the audio attachment of message `n` (1-based).
    Play(usize),
    /// Pause the audio attachment of message `n` (1-based).
    Pause(usize),
    /// Leave the application.
    Quit,
}

/// Command parse errors. The message is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Not a known command.
    #[error("unknown command: /{0}")]
    Unknown(String),

    /// Known command with bad arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Command {
    /// Parse a composer line.
    ///
    /// Returns `None` if the line is not a command (does not start with `/`).
    pub fn parse(line: &str) -> Option<Result<Self, CommandError>> {
        let body = line.trim().strip_prefix('/')?;
        let (name, args) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
        let args = args.trim();

        Some(match name {
            "attach" if args.is_empty() => Err(CommandError::Usage("/attach <path>")),
            "attach" => Ok(Self::Attach(args.to_string())),
            "detach" => Ok(Self::Detach),
            "preview" => parse_index(args).map(Self::Preview).ok_or(CommandError::Usage("/preview <n>")),
            "play" => parse_index(args).map(Self::Play).ok_or(CommandError::Usage("/play <n>")),
            "pause" => parse_index(args).map(Self::Pause).ok_or(CommandError::Usage("/pause <n>")),
            "quit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        })
    }
}

fn parse_index(args: &str) -> Option<usize> {
    args.trim_start_matches('#').parse::<usize>().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(Command::parse("hello /attach"), None);
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/attach ~/a b.png"), Some(Ok(Command::Attach("~/a b.png".into()))));
        assert_eq!(Command::parse("/detach"), Some(Ok(Command::Detach)));
        assert_eq!(Command::parse("/preview 3"), Some(Ok(Command::Preview(3))));
        assert_eq!(Command::parse("/play #2"), Some(Ok(Command::Play(2))));
        assert_eq!(Command::parse("  /pause 2 "), Some(Ok(Command::Pause(2))));
        assert_eq!(Command::parse("/quit"), Some(Ok(Command::Quit)));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(Command::parse("/attach"), Some(Err(CommandError::Usage("/attach <path>"))));
        assert_eq!(Command::parse("/preview"), Some(Err(CommandError::Usage("/preview <n>"))));
        assert_eq!(Command::parse("/play 0"), Some(Err(CommandError::Usage("/play <n>"))));
        assert_eq!(Command::parse("/pause x"), Some(Err(CommandError::Usage("/pause <n>"))));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(Command::parse("/dance"), Some(Err(CommandError::Unknown("dance".into()))));
    }
}
