//! RIMAC Admin CLI
//!
//! Command-line console for the appointments administration backend:
//! - Log in and out
//! - Show the dashboard, appointments and medics
//! - Dump raw resources as JSON

use anyhow::Context;
use clap::{Parser, Subcommand};
use rimac_admin::config::{generate_default_config, Config, LoggingConfig};
use rimac_admin::session::SessionClient;
use rimac_admin::views::{Screen, View, ViewController, ViewState};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "rimac-admin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Administration console for RIMAC appointments")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,
        /// Password (prompted without echo when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Drop the stored session
    Logout,

    /// Show session status
    Status,

    /// Show the statistics dashboard
    Stats,

    /// List appointments
    Appointments,

    /// List medics by country
    Medics,

    /// List medical centers
    Centers,

    /// List specialties
    Specialties,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let config = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &config)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", config),
        }
        return Ok(());
    }

    let mut config = Config::load_from(cli.config.as_deref())?;
    if let Some(url) = cli.api_url.clone() {
        config.api.url = url;
    }
    init_logging(&config.logging);

    let store = Arc::new(config.token_store());
    let client = Arc::new(
        SessionClient::new(config.client_config(), store)
            .await
            .context("Failed to initialize session client")?,
    );
    let controller = ViewController::start(Arc::clone(&client)).await;

    match cli.command {
        Commands::Login { username, password } => {
            let username = match username {
                Some(u) => u,
                None => prompt("Usuario: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Contraseña: ")?,
            };

            match controller.submit_login(&username, &password).await {
                Ok(()) => println!("Sesión iniciada como {}", username),
                Err(message) => {
                    eprintln!("{}", message);
                    std::process::exit(1);
                }
            }
        }

        Commands::Logout => {
            controller.logout().await?;
            println!("Sesión cerrada");
        }

        Commands::Status => {
            println!("RIMAC Admin v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Backend:  {}", config.api.url);
            println!("Token:    {}", config.session.token_path);
            println!(
                "Session:  {}",
                if client.is_authenticated().await {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
        }

        Commands::Stats => show(&controller, View::Dashboard, &cli.format).await?,
        Commands::Appointments => show(&controller, View::Appointments, &cli.format).await?,
        Commands::Medics => show(&controller, View::Medics, &cli.format).await?,
        Commands::Centers => show(&controller, View::Centers, &cli.format).await?,
        Commands::Specialties => show(&controller, View::Specialties, &cli.format).await?,

        // Handled before the client is built
        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Display one view, or its raw payload with `--format json`
async fn show(controller: &ViewController, view: View, format: &str) -> anyhow::Result<()> {
    if controller.screen() == Screen::Login {
        eprintln!("Not logged in. Run:");
        eprintln!("  rimac-admin login");
        std::process::exit(1);
    }

    controller.navigate(view);

    if format == "json" {
        let result = if view.fetches() {
            match controller.load(view).await {
                ViewState::Data(payload) => Ok(payload),
                ViewState::Error(message) => Err(message),
                ViewState::Loading => Err(view.fallback_error().to_string()),
            }
        } else {
            let client = controller.client();
            let result = match view {
                View::Centers => client.get_centers().await,
                _ => client.get_specialties().await,
            };
            result.map_err(|e| rimac_admin::views::resource_error_message(view, &e))
        };

        match result {
            Ok(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
            Err(message) => {
                eprintln!("Error: {}", message);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let output = controller.show_current().await.unwrap_or_default();
    print!("{}", output);

    if controller.screen() == Screen::Login {
        eprintln!("Session expired. Run:");
        eprintln!("  rimac-admin login");
        std::process::exit(1);
    }
    if controller.state(view).is_some_and(|s| s.error().is_some()) {
        std::process::exit(1);
    }
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rimac_admin={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
