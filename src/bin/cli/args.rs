use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// WebSocket, one frame per message
    Ws,
    /// Raw TCP, NUL-delimited frames
    Tcp,
}

#[derive(Parser, Debug)]
#[command(name = "stomp-ws")]
#[command(version)]
#[command(about = "Interactive STOMP client over WebSocket or TCP")]
pub struct Cli {
    /// Broker URL (ws://host:port/path for WebSocket, host:port for TCP)
    #[arg(short, long, env = "STOMP_URL", default_value = "ws://127.0.0.1:15674/ws")]
    pub url: String,

    /// Login username
    #[arg(short, long, env = "STOMP_LOGIN", default_value = "guest")]
    pub login: String,

    /// Passcode
    #[arg(short, long, env = "STOMP_PASSCODE", default_value = "guest")]
    pub passcode: String,

    /// Transport to use
    #[arg(short, long, value_enum, default_value_t = TransportKind::Ws)]
    pub transport: TransportKind,

    /// WebSocket subprotocols to offer (e.g. "v10.stomp, v11.stomp")
    #[arg(long)]
    pub protocols: Option<String>,

    /// Destinations to subscribe to once connected (can be specified multiple times)
    #[arg(short, long)]
    pub subscribe: Vec<String>,

    /// Print every wire frame sent and received
    #[arg(short, long)]
    pub debug: bool,
}
