//! # printbridge CLI
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP relay on the default port (8888, or $HTTP_PORT)
//! printbridge serve
//!
//! # Choose the printer and paper width
//! printbridge printers
//! printbridge settings set --printer-name POS_PRINTER --paper-width 48
//!
//! # Print locally without the relay
//! printbridge print --text "Hello" --item "Item 1: \$10" --item "Total: \$10"
//!
//! # Talk to a running relay
//! printbridge client --url http://localhost:8888 print --text "Hello"
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use printbridge::{
    PrintBridgeError, Settings, SettingsStore,
    backend::{self, BackendConfig, BackendKind},
    client::RelayClient,
    config,
    document::PrintRequest,
    printer::PrinterDescriptor,
    server::{self, AppState, Controller, DEFAULT_PORT, ServerConfig},
};

/// printbridge - Local HTTP relay for receipt printers
#[derive(Parser, Debug)]
#[command(name = "printbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that touches a printer or the settings.
#[derive(Args, Debug, Clone)]
struct PrinterOpts {
    /// Print strategy (defaults to the OS spooler for this platform)
    #[arg(long, env = "PRINTBRIDGE_BACKEND", value_enum)]
    backend: Option<BackendKind>,

    /// Device used by the direct backend when no printer name is set
    #[arg(long, env = "PRINTBRIDGE_DEVICE")]
    device: Option<PathBuf>,

    /// Directory scanned for printer devices by the direct backend
    #[arg(long, default_value = "/dev")]
    dev_root: PathBuf,

    /// Directory holding settings.json
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

impl PrinterOpts {
    fn settings_store(&self) -> SettingsStore {
        SettingsStore::in_dir(config::config_dir(self.config_dir.clone()))
    }

    fn backend(&self) -> Arc<dyn backend::PrintBackend> {
        let mut backend_config = BackendConfig {
            device_root: self.dev_root.clone(),
            ..BackendConfig::default()
        };
        if let Some(device) = &self.device {
            backend_config.default_device = device.clone();
        }
        backend::build(self.backend.unwrap_or_else(BackendKind::detect), &backend_config)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP print relay until Ctrl-C
    Serve {
        /// Interface to listen on
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "HTTP_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        #[command(flatten)]
        printer: PrinterOpts,
    },

    /// Print text and items with the saved settings
    Print {
        /// Free text printed first
        #[arg(long)]
        text: Option<String>,

        /// Line item (repeatable, printed in order)
        #[arg(long = "item", value_name = "ITEM")]
        items: Vec<String>,

        #[command(flatten)]
        printer: PrinterOpts,
    },

    /// List available printers
    Printers {
        #[command(flatten)]
        printer: PrinterOpts,
    },

    /// Show or change the saved settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,

        /// Directory holding settings.json
        #[arg(long, value_name = "DIR", global = true)]
        config_dir: Option<PathBuf>,
    },

    /// Call a running relay over HTTP
    Client {
        /// Relay base URL
        #[arg(long, default_value = "http://localhost:8888")]
        url: String,

        #[command(subcommand)]
        action: ClientAction,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print the current settings as JSON
    Show,
    /// Update one or both settings
    Set {
        #[arg(long)]
        printer_name: Option<String>,
        #[arg(long)]
        paper_width: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
enum ClientAction {
    /// POST /print
    Print {
        #[arg(long)]
        text: Option<String>,
        #[arg(long = "item", value_name = "ITEM")]
        items: Vec<String>,
    },
    /// GET /printers
    Printers,
    /// GET /settings
    Settings,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,printbridge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<(), PrintBridgeError> {
    match cli.command {
        Commands::Serve {
            host,
            port,
            printer,
        } => {
            let state = AppState::new(Arc::new(printer.settings_store()), printer.backend());
            let controller = Controller::new(Arc::new(state), ServerConfig { host, port });
            server::serve(&controller).await
        }

        Commands::Print {
            text,
            items,
            printer,
        } => {
            let request = request_from_args(text, items);
            let settings = printer.settings_store().load();
            let backend = printer.backend();
            tokio::task::spawn_blocking(move || {
                backend::print_request(backend.as_ref(), &settings, &request)
            })
            .await
            .map_err(|e| PrintBridgeError::Server(format!("Task error: {}", e)))??;
            println!("Printed successfully!");
            Ok(())
        }

        Commands::Printers { printer } => {
            let backend = printer.backend();
            let printers = tokio::task::spawn_blocking(move || backend.list_printers())
                .await
                .map_err(|e| PrintBridgeError::Server(format!("Task error: {}", e)))??;
            print_printers(&printers);
            Ok(())
        }

        Commands::Settings { action, config_dir } => {
            let store = SettingsStore::in_dir(config::config_dir(config_dir));
            match action {
                SettingsAction::Show => print_json(&store.load()),
                SettingsAction::Set {
                    printer_name,
                    paper_width,
                } => {
                    let current = store.load();
                    let updated = Settings {
                        printer_name: printer_name.unwrap_or(current.printer_name),
                        paper_width: paper_width.unwrap_or(current.paper_width),
                    };
                    store.save(&updated)?;
                    print_json(&updated)
                }
            }
        }

        Commands::Client { url, action } => {
            let client = RelayClient::new(url);
            match action {
                ClientAction::Print { text, items } => {
                    let response = client.print(&request_from_args(text, items)).await?;
                    print_json(&response)
                }
                ClientAction::Printers => {
                    print_printers(&client.printers().await?);
                    Ok(())
                }
                ClientAction::Settings => print_json(&client.settings().await?),
            }
        }
    }
}

fn request_from_args(text: Option<String>, items: Vec<String>) -> PrintRequest {
    PrintRequest {
        text,
        items: (!items.is_empty()).then_some(items),
    }
}

fn print_printers(printers: &[PrinterDescriptor]) {
    if printers.is_empty() {
        println!("No printers found.");
        return;
    }
    println!("Available printers:");
    for printer in printers {
        println!("  {}", printer.name);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), PrintBridgeError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| PrintBridgeError::InvalidInput(format!("cannot encode output: {}", e)))?;
    println!("{}", json);
    Ok(())
}
