use std::error::Error;
use std::fmt::{Display, Formatter};

/// One unit of instruction flowing from the producer to the display loop.
///
/// Commands are consumed exactly once each, in the order they were sent.
#[derive(Debug)]
pub enum Command {
    /// Draw the title, the static progress frame, and the initial window.
    Init,
    /// Append a time-stamped status message to the window.
    Message(String),
    /// Advance the progress bar by one step.
    Progress,
    /// Render a final `Aborting...` line, then surface the payload to the
    /// loop's caller unchanged.
    Kill(Box<dyn Error + Send + Sync>),
    /// Terminate the loop normally.
    End,
}

impl Command {
    /// Parse one line of the textual wire protocol.
    ///
    /// Producers that are not in-process (shell scripts piping into the
    /// `marquee` binary, for instance) speak a line protocol of tagged
    /// commands: `INIT`, `MSG <text>`, `PROG`, `KILL <reason>`, `END`.
    /// An unrecognized tag is a protocol violation and is fatal to the
    /// producer; it is never retried.
    pub fn parse(line: &str) -> Result<Self, CommandParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (tag, payload) = match line.split_once(' ') {
            Some((tag, payload)) => (tag, Some(payload)),
            None => (line, None),
        };
        match tag {
            "INIT" => Ok(Command::Init),
            "MSG" => {
                let Some(text) = payload else {
                    return Err(CommandParseError::MissingPayload { tag: "MSG" });
                };
                Ok(Command::Message(text.to_owned()))
            }
            "PROG" => Ok(Command::Progress),
            "KILL" => {
                let reason = payload.unwrap_or("killed by producer");
                Ok(Command::Kill(Box::new(AbortReason(reason.to_owned()))))
            }
            "END" => Ok(Command::End),
            other => Err(CommandParseError::UnknownTag(other.to_owned())),
        }
    }
}

/// Failure payload carried by a `KILL` parsed from the wire protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbortReason(pub String);

impl Display for AbortReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for AbortReason {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    UnknownTag(String),
    MissingPayload { tag: &'static str },
}

impl Display for CommandParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandParseError::UnknownTag(tag) => {
                write!(f, "unrecognized command tag: {tag}")
            }
            CommandParseError::MissingPayload { tag } => {
                write!(f, "{tag} requires a payload")
            }
        }
    }
}

impl Error for CommandParseError {}
