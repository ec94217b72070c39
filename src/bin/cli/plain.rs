use stomp_ws::{
    Frame, Session, SessionOptions, SessionState, TcpTransport, Transport, TransportEvents,
    WebSocketTransport,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use super::args::{Cli, TransportKind};
use super::commands::{CommandResult, execute_command, print_help, prompt, subscribe_destination};
use super::exit_codes;

/// Things session callbacks hand back to the event loop.
enum Notice {
    Connected,
    BrokerError(Frame),
    Lost(String),
}

/// Run the CLI in plain line mode
pub async fn run(cli: &Cli) -> Result<(), (String, u8)> {
    match cli.transport {
        TransportKind::Ws => {
            let (transport, events) = WebSocketTransport::new();
            let transport = match &cli.protocols {
                Some(protocols) => transport.with_protocols(protocols.clone()),
                None => transport,
            };
            drive(cli, transport, events).await
        }
        TransportKind::Tcp => {
            let (transport, events) = TcpTransport::new();
            drive(cli, transport, events).await
        }
    }
}

async fn drive<T: Transport>(
    cli: &Cli,
    transport: T,
    mut events: TransportEvents,
) -> Result<(), (String, u8)> {
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel::<Notice>();

    let error_tx = notice_tx.clone();
    let mut options = SessionOptions::new()
        .on_error(move |frame: &Frame| {
            let _ = error_tx.send(Notice::BrokerError(frame.clone()));
        })
        .on_receipt(|frame: &Frame| {
            println!("\n[RECEIPT] {}", frame.get_header("receipt-id").unwrap_or("?"));
            prompt();
        });
    if cli.debug {
        options = options.debug(|line| eprintln!("{}", line));
    }
    let mut session = Session::with_options(cli.url.as_str(), transport, options);

    println!("Connecting to {}...", cli.url);
    let connected_tx = notice_tx.clone();
    let lost_tx = notice_tx.clone();
    session
        .connect(
            cli.login.as_str(),
            cli.passcode.as_str(),
            move |_: &Frame| {
                let _ = connected_tx.send(Notice::Connected);
            },
            move |msg: &str| {
                let _ = lost_tx.send(Notice::Lost(msg.to_string()));
            },
        )
        .map_err(|e| (format!("Connection failed: {}", e), exit_codes::NETWORK_ERROR))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(event) => session.handle_event(event),
                    None => {
                        return Err((
                            "transport stopped reporting events".to_string(),
                            exit_codes::NETWORK_ERROR,
                        ));
                    }
                }
            }
            Some(notice) = notice_rx.recv() => {
                match notice {
                    Notice::Connected => {
                        println!("Connected.");
                        for dest in &cli.subscribe {
                            match subscribe_destination(&mut session, dest) {
                                Ok(()) => println!("Subscribed to: {}", dest),
                                Err(msg) => eprintln!("{}", msg),
                            }
                        }
                        println!();
                        print_help();
                        println!();
                        prompt();
                    }
                    Notice::BrokerError(frame) => {
                        let message = frame.get_header("message").unwrap_or("unknown error").to_string();
                        let detail = match &frame.body {
                            Some(body) => format!("{}: {}", message, body.trim_end()),
                            None => message,
                        };
                        if session.state() == SessionState::Connecting {
                            let _ = session.disconnect(|| {});
                            return Err((
                                format!("Authentication failed: {}", detail),
                                exit_codes::AUTH_ERROR,
                            ));
                        }
                        eprintln!("\n[BROKER ERROR] {}", detail);
                        prompt();
                    }
                    Notice::Lost(msg) => return Err((msg, exit_codes::NETWORK_ERROR)),
                }
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) | Err(_) => {
                        debug!("stdin closed");
                        return finish(&mut session).await;
                    }
                };
                match execute_command(&line, &mut session) {
                    CommandResult::Ok => prompt(),
                    CommandResult::Quit => return finish(&mut session).await,
                    CommandResult::Info(msg) => {
                        println!("{}", msg);
                        prompt();
                    }
                    CommandResult::Error(msg) => {
                        eprintln!("{}", msg);
                        prompt();
                    }
                }
            }
        }
    }
}

async fn finish<T: Transport>(session: &mut Session<T>) -> Result<(), (String, u8)> {
    println!("Disconnecting...");
    if session.state() != SessionState::Disconnected {
        let _ = session.disconnect(|| println!("Disconnected."));
        // let the socket task flush DISCONNECT before the runtime shuts down
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    Ok(())
}
