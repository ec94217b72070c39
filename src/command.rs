use std::fmt;

/// STOMP frame commands.
///
/// Frames carry their command as a closed set of variants; the textual token
/// only exists at the codec boundary. Tokens that are not recognized are kept
/// in `Unknown` so that parsing never fails, and the session drops such
/// frames instead of guessing at them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    // client frames
    Connect,
    Send,
    Subscribe,
    Unsubscribe,
    Begin,
    Commit,
    Abort,
    Ack,
    Disconnect,
    // server frames
    Connected,
    Message,
    Receipt,
    Error,
    /// Any other token, preserved verbatim.
    Unknown(String),
}

impl Command {
    /// The wire token for this command.
    pub fn as_str(&self) -> &str {
        match self {
            Command::Connect => "CONNECT",
            Command::Send => "SEND",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Begin => "BEGIN",
            Command::Commit => "COMMIT",
            Command::Abort => "ABORT",
            Command::Ack => "ACK",
            Command::Disconnect => "DISCONNECT",
            Command::Connected => "CONNECTED",
            Command::Message => "MESSAGE",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
            Command::Unknown(token) => token,
        }
    }

    /// Returns `true` for commands a server sends to a client.
    pub fn is_server_command(&self) -> bool {
        matches!(
            self,
            Command::Connected | Command::Message | Command::Receipt | Command::Error
        )
    }
}

impl From<&str> for Command {
    /// Map a wire token to a command. Matching is exact (STOMP commands are
    /// case-sensitive); anything else becomes `Command::Unknown`.
    fn from(token: &str) -> Self {
        match token {
            "CONNECT" => Command::Connect,
            "SEND" => Command::Send,
            "SUBSCRIBE" => Command::Subscribe,
            "UNSUBSCRIBE" => Command::Unsubscribe,
            "BEGIN" => Command::Begin,
            "COMMIT" => Command::Commit,
            "ABORT" => Command::Abort,
            "ACK" => Command::Ack,
            "DISCONNECT" => Command::Disconnect,
            "CONNECTED" => Command::Connected,
            "MESSAGE" => Command::Message,
            "RECEIPT" => Command::Receipt,
            "ERROR" => Command::Error,
            other => Command::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Command {
    fn from(token: String) -> Self {
        Command::from(token.as_str())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
