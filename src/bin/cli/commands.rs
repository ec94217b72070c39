use std::io::Write;

use stomp_ws::{Frame, Headers, Session, Transport};

/// Result of executing a command
pub enum CommandResult {
    /// Command executed successfully
    Ok,
    /// Command requests exit
    Quit,
    /// Informational output
    Info(String),
    /// Error executing command
    Error(String),
}

/// Parse and execute a command line against the session.
pub fn execute_command<T: Transport>(line: &str, session: &mut Session<T>) -> CommandResult {
    let parts: Vec<&str> = line.trim().splitn(3, ' ').collect();
    if parts.is_empty() || parts[0].is_empty() {
        return CommandResult::Ok;
    }

    match parts[0] {
        "quit" | "exit" | "q" => CommandResult::Quit,

        "send" => {
            if parts.len() < 3 {
                return CommandResult::Error("Usage: send <destination> <message>".to_string());
            }
            let headers = Headers::from(vec![("content-type", "text/plain")]);
            match session.send(parts[1], Some(headers), Some(parts[2].to_string())) {
                Ok(()) => CommandResult::Ok,
                Err(e) => CommandResult::Error(format!("Send error: {}", e)),
            }
        }

        "sub" | "subscribe" => {
            if parts.len() < 2 {
                return CommandResult::Error("Usage: sub <destination>".to_string());
            }
            match subscribe_destination(session, parts[1]) {
                Ok(()) => CommandResult::Info(format!("Subscribed to: {}", parts[1])),
                Err(msg) => CommandResult::Error(msg),
            }
        }

        "unsub" | "unsubscribe" => {
            if parts.len() < 2 {
                return CommandResult::Error("Usage: unsub <destination>".to_string());
            }
            match session.unsubscribe(parts[1], None) {
                Ok(()) => CommandResult::Info(format!("Unsubscribed from: {}", parts[1])),
                Err(e) => CommandResult::Error(format!("Unsubscribe error: {}", e)),
            }
        }

        cmd @ ("begin" | "commit" | "abort") => {
            if parts.len() < 2 {
                return CommandResult::Error(format!("Usage: {} <transaction>", cmd));
            }
            let result = match cmd {
                "begin" => session.begin(parts[1], None),
                "commit" => session.commit(parts[1], None),
                _ => session.abort(parts[1], None),
            };
            match result {
                Ok(()) => CommandResult::Ok,
                Err(e) => CommandResult::Error(format!("{} error: {}", cmd, e)),
            }
        }

        "ack" => {
            if parts.len() < 2 {
                return CommandResult::Error("Usage: ack <message-id>".to_string());
            }
            match session.ack(parts[1], None) {
                Ok(()) => CommandResult::Ok,
                Err(e) => CommandResult::Error(format!("Ack error: {}", e)),
            }
        }

        "subs" => {
            let mut subs = session.subscriptions();
            subs.sort();
            if subs.is_empty() {
                CommandResult::Info("No subscriptions".to_string())
            } else {
                CommandResult::Info(subs.join("\n"))
            }
        }

        "help" | "?" => {
            print_help();
            CommandResult::Ok
        }

        _ => CommandResult::Error(format!(
            "Unknown command: {}. Type 'help' for commands.",
            parts[0]
        )),
    }
}

/// Subscribe to `destination`, printing each message as it arrives.
pub fn subscribe_destination<T: Transport>(
    session: &mut Session<T>,
    destination: &str,
) -> Result<(), String> {
    let dest = destination.to_string();
    session
        .subscribe(destination, None, move |frame: &Frame| print_message(&dest, frame))
        .map_err(|e| format!("Failed to subscribe to '{}': {}", destination, e))
}

fn print_message(destination: &str, frame: &Frame) {
    println!("\n[{}] MESSAGE received:", destination);
    for (k, v) in frame.headers.iter() {
        println!("  {}: {}", k, v);
    }
    if let Some(body) = &frame.body {
        println!("  Body: {}", body);
    }
    prompt();
}

pub fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Print help text
pub fn print_help() {
    println!("Commands:");
    println!("  send <destination> <message>  - Send a message");
    println!("  sub <destination>             - Subscribe to a destination");
    println!("  unsub <destination>           - Unsubscribe from a destination");
    println!("  subs                          - List subscriptions");
    println!("  begin|commit|abort <tx>       - Transaction control");
    println!("  ack <message-id>              - Acknowledge a message");
    println!("  quit                          - Disconnect and exit");
}
