use std::process;

mod cli;
mod client;
mod commands;
mod config;
mod connection;
mod error;
mod responses;
mod session;
mod terminal;
mod timer;
mod transfer;

use cli::{Cli, CliAction, USAGE};
use client::FtpConnector;
use config::ClientConfig;
use session::Session;
use terminal::Repl;

fn main() {
    // Initialize logging
    env_logger::init();

    let cli = match Cli::parse_from_args(std::env::args_os()) {
        CliAction::Run(cli) => cli,
        CliAction::ShowHelp(help) => {
            println!("{}", help);
            process::exit(0);
        }
        CliAction::Usage(message) => {
            log::debug!("Argument error: {}", message);
            println!("{}", USAGE);
            process::exit(1);
        }
    };

    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            print_usage();
            process::exit(1);
        }
    };
    log::info!("Loaded {}", config);

    let (user, password) = match cli::resolve_credentials(&cli) {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("Failed to read credentials: {}", e);
            process::exit(1);
        }
    };

    let mut session = Session::new(
        FtpConnector::new(config.clone()),
        &cli.host,
        &user,
        &password,
        &config,
    );

    if let Err(e) = Repl::stdio().run(&mut session) {
        eprintln!("Terminal error: {}", e);
        process::exit(1);
    }
}

fn print_usage() {
    println!("{}", USAGE);
    println!("Environment Variables:");
    println!("  FTPS_CONFIG=./ftps.toml");
    println!("  FTPS_PORT=21");
    println!("  FTPS_CONNECT_TIMEOUT=10");
    println!("  FTPS_IDLE_TIMEOUT=60");
    println!("  FTPS_LOCAL_DIRECTORY=\"./downloads\"");
    println!("  RUST_LOG=info");
}
