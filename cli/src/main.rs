//! credential-gate CLI server
//!
//! ```sh
//! # Run with default config (~/.config/credential-gate/config.toml)
//! credential-gate
//!
//! # Custom config path and port
//! credential-gate --config /etc/credential-gate/config.toml --port 8080
//!
//! # Validate config without starting
//! credential-gate --check
//!
//! # Produce a bcrypt hash for the usuarios.password_hash column
//! echo -n 'secret' | credential-gate --hash-password
//! ```

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use credential_gate::config::AppConfig;
use credential_gate::infrastructure::crypto::password::hash_password;
use credential_gate::infrastructure::database::redact_url;
use credential_gate::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "credential-gate",
    version,
    about = "Login API: checks usuario/password against the usuarios table",
    long_about = "credential-gate: HTTP login service backed by bcrypt password hashes.\n\n\
                  Default config: ~/.config/credential-gate/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CREDENTIAL_GATE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the HTTP listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Read a password from stdin, print its bcrypt hash and exit.
    #[arg(long)]
    hash_password: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.hash_password {
        let mut password = String::new();
        std::io::stdin().read_to_string(&mut password)?;
        let password = password.trim_end_matches(['\r', '\n']);
        if password.is_empty() {
            return Err("empty password on stdin".into());
        }
        println!("{}", hash_password(password)?);
        return Ok(());
    }

    let config_path = cli
        .config
        .unwrap_or_else(credential_gate::default_config_path);

    let mut config = match AppConfig::load_with_env(&config_path) {
        Ok(cfg) => cfg,
        Err(e) if cli.check => {
            eprintln!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            let message = format!("failed to load config from {}: {}", config_path.display(), e);
            return Err(message.into());
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Listen      : {}", config.listen_address());
        println!("   Database    : {}", redact_url(config.database.connection_url()));
        println!("   Origins     : {}", config.cors.allowed_origins().join(", "));
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
