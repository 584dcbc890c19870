//! Webhook Sender - CLI Entry Point
//!
//! Thin shell over the command layer: every subcommand is one user action.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use webhook_sender::commands::{self, SaveWebhookRequest, SendMessageRequest};
use webhook_sender::models::response::CommandResponse;
use webhook_sender::models::settings::SettingsUpdate;
use webhook_sender::state::{AppState, StateOptions};
use webhook_sender_core::{ProxyConfig, ProxyProtocol};

/// Webhook Sender CLI.
#[derive(Parser)]
#[command(name = "webhook-sender")]
#[command(about = "Save chat-webhook endpoints and send text messages to them")]
#[command(version)]
struct Cli {
    /// Directory holding webhooks.json
    #[arg(short, long, default_value = ".", global = true)]
    data_dir: PathBuf,

    /// Configuration file path (default: ~/.webhook-sender/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds for this run
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Proxy password (kept out of config.json)
    #[arg(long, env = "WEBHOOK_SENDER_PROXY_PASSWORD", hide_env_values = true, global = true)]
    proxy_password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved webhooks
    List {
        /// Print JSON instead of selection labels
        #[arg(long)]
        json: bool,
    },

    /// Save a webhook under an alias (overwrites an existing alias)
    Save {
        #[arg(short, long)]
        alias: String,

        #[arg(short, long)]
        url: String,
    },

    /// Send a text message
    Send {
        /// Selection label "<alias> (<url>)" or a raw webhook URL
        #[arg(short, long)]
        to: String,

        /// Message text; read from stdin when omitted
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Settings management commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current settings
    Show,

    /// Change settings
    Set {
        /// Request timeout in seconds
        #[arg(long)]
        request_timeout: Option<u64>,

        /// Proxy protocol
        #[arg(long, value_enum, default_value_t = ProxyProtocolArg::Http, requires = "proxy_host")]
        proxy_protocol: ProxyProtocolArg,

        /// Proxy host
        #[arg(long, requires = "proxy_port")]
        proxy_host: Option<String>,

        /// Proxy port
        #[arg(long, requires = "proxy_host")]
        proxy_port: Option<u16>,

        /// Proxy username
        #[arg(long, requires = "proxy_host")]
        proxy_user: Option<String>,

        /// Remove the configured proxy
        #[arg(long, conflicts_with = "proxy_host")]
        clear_proxy: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProxyProtocolArg {
    Http,
    Https,
    Socks5,
}

impl From<ProxyProtocolArg> for ProxyProtocol {
    fn from(arg: ProxyProtocolArg) -> Self {
        match arg {
            ProxyProtocolArg::Http => ProxyProtocol::Http,
            ProxyProtocolArg::Https => ProxyProtocol::Https,
            ProxyProtocolArg::Socks5 => ProxyProtocol::Socks5,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();

    let mut state = match AppState::initialize(StateOptions {
        data_dir: cli.data_dir,
        config_path: cli.config,
        timeout_override: cli.timeout,
        proxy_password: cli.proxy_password,
    }) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &mut state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging to stderr; stdout is reserved for command output.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

async fn run(command: Commands, state: &mut AppState) -> Result<(), String> {
    match command {
        Commands::List { json } => {
            let listings = commands::list_webhooks(state).into_result()?;
            if json {
                print_json(&listings)?;
            } else if listings.is_empty() {
                println!("No webhooks saved yet.");
            } else {
                for listing in listings {
                    println!("{}", listing.label);
                }
            }
        }
        Commands::Save { alias, url } => {
            let saved = commands::save_webhook(state, SaveWebhookRequest { alias, url })
                .into_result()?;
            println!("Webhook saved: {}", saved.label);
        }
        Commands::Send { to, message } => {
            let content = match message {
                Some(message) => message,
                None => read_stdin()?,
            };
            let report = commands::send_message(
                state,
                SendMessageRequest {
                    target: to,
                    content,
                },
            )
            .await
            .into_result()?;
            println!(
                "Message sent successfully to {} ({} ms)",
                report.destination, report.latency_ms
            );
        }
        Commands::Config { action } => run_config(action, state)?,
    }
    Ok(())
}

fn run_config(action: ConfigAction, state: &mut AppState) -> Result<(), String> {
    let response: CommandResponse<_> = match action {
        ConfigAction::Show => commands::get_settings(state),
        ConfigAction::Set {
            request_timeout,
            proxy_protocol,
            proxy_host,
            proxy_port,
            proxy_user,
            clear_proxy,
        } => {
            let proxy = match (proxy_host, proxy_port) {
                (Some(host), Some(port)) => Some(ProxyConfig {
                    protocol: proxy_protocol.into(),
                    host,
                    port,
                    username: proxy_user,
                    password: None,
                }),
                _ => None,
            };
            commands::update_settings(
                state,
                SettingsUpdate {
                    request_timeout_secs: request_timeout,
                    proxy,
                    clear_proxy,
                },
            )
        }
    };
    print_json(&response.into_result()?)
}

fn read_stdin() -> Result<String, String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read message from stdin: {}", e))?;
    Ok(buf)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}
