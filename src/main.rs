use std::path::PathBuf;
use std::process::ExitCode;

use chatroom_client::config::normalize_path;
use chatroom_client::storage::FileTokenStore;
use chatroom_client::terminal::TerminalSurface;
use chatroom_client::{ClientConfig, ClientError, Controller};
use clap::{Parser, Subcommand};
use time::UtcOffset;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chatroom", about = "Terminal client for the chatroom server")]
struct Cli {
    /// Server host; overrides CHATROOM_HOST.
    #[arg(long)]
    host: Option<String>,

    /// Server port; overrides CHATROOM_PORT.
    #[arg(long)]
    port: Option<u16>,

    /// Use https/wss.
    #[arg(long)]
    tls: bool,

    /// Login endpoint path; overrides CHATROOM_LOGIN_PATH.
    #[arg(long)]
    login_path: Option<String>,

    /// Send input exactly as typed instead of trimming it.
    #[arg(long)]
    no_trim: bool,

    /// Token storage file; overrides CHATROOM_STORAGE_PATH.
    #[arg(long)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in (or register) and enter the chat view.
    Login {
        #[arg(long, short = 'n')]
        username: String,

        #[arg(long, env = "CHATROOM_PASSWORD", hide_env_values = true)]
        password: String,

        /// Store the token and exit without connecting.
        #[arg(long)]
        no_chat: bool,
    },
    /// Enter the chat view with the stored token.
    Chat,
    /// Forget the stored token.
    Logout,
}

// Single-threaded runtime: one event loop serializes input and transport
// events, and the local UTC offset can only be read safely without
// other threads.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(kind = ?error.kind(), %error, "exiting with failure");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("[!] {error}");
            return Err(error);
        }
    };
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let store = FileTokenStore::new(config.storage_path.clone());
    let mut controller = Controller::new(config, store, TerminalSurface::default())?.with_offset(offset);

    match cli.command {
        Command::Login { username, password, no_chat } => {
            controller.login(&username, &password).await?;
            if no_chat {
                println!("Login succeeded; token stored.");
                return Ok(());
            }
            println!("Hello, {}! Welcome to the chatroom!", username.trim());
            run_chat(&mut controller).await
        }
        Command::Chat => run_chat(&mut controller).await,
        Command::Logout => {
            controller.logout()?;
            println!("Logged out.");
            Ok(())
        }
    }
}

async fn run_chat(controller: &mut Controller<FileTokenStore, TerminalSurface>) -> Result<(), ClientError> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    controller.run_chat(stdin).await
}

fn build_config(cli: &Cli) -> Result<ClientConfig, ClientError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(host) = &cli.host {
        config.host.clone_from(host);
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.tls {
        config.tls = true;
    }
    if let Some(path) = &cli.login_path {
        config.login_path = normalize_path(path);
    }
    if cli.no_trim {
        config.trim_input = false;
    }
    if let Some(storage) = &cli.storage {
        config.storage_path.clone_from(storage);
    }
    Ok(config)
}
