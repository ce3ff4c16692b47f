//! CodeMaster terminal chat
//!
//! Line-oriented front end for the relay. The chat stays inert until a
//! non-empty Gemini API key is available, either from `GEMINI_API_KEY` or
//! typed at the prompt.
//!
//! Commands: `/reset` starts a new session, `/quit` exits.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use codemaster::{
    client::{ChatView, ClientError, ConversationStore, Message, RelayClient, Role},
    types::Credential,
    ClientConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Prints the conversation to stdout
struct TerminalView;

impl ChatView for TerminalView {
    fn show_message(&mut self, message: &Message) {
        match message.role {
            Role::User => println!("\nyou> {}", message.content),
            Role::Assistant => println!("\ncodemaster>\n{}\n", message.content),
        }
    }

    fn show_error(&mut self, error: &ClientError) {
        eprintln!("\n[error] {}\n", error);
    }
}

fn prompt(label: &str) -> Result<()> {
    print!("{}", label);
    std::io::stdout().flush().context("Failed to flush stdout")
}

async fn read_credential(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<Credential>> {
    loop {
        prompt("Enter your Gemini API Key: ")?;
        match lines.next_line().await? {
            Some(line) if !line.trim().is_empty() => {
                return Ok(Some(Credential::new(line.trim())));
            }
            Some(_) => eprintln!("{}", ClientError::MissingCredential),
            None => return Ok(None),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codemaster=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    let relay = RelayClient::new(&config).context("Failed to build relay client")?;

    println!("CodeMaster Chatbot - your expert AI programming assistant");
    println!("Relay: {}", relay.url());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let credential = match config.api_key.clone() {
        Some(key) => Credential::new(key),
        None => match read_credential(&mut lines).await? {
            Some(credential) => credential,
            None => return Ok(()),
        },
    };

    let mut store = ConversationStore::new(Arc::new(relay), TerminalView, credential)?;
    println!("Ask me anything about coding. /reset clears the chat, /quit exits.");

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/reset" => {
                store.reset();
                println!("Session cleared.");
            }
            // Errors are rendered by the view and leave the session usable
            input => {
                println!("CodeMaster is thinking...");
                let _ = store.submit(input).await;
            }
        }
    }

    Ok(())
}
