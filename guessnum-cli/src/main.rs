// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use guessnum::config::{write_keypair, ClientConfig, Cluster};
use guessnum::mock::MockGameProgram;
use guessnum::{ClientError, GameProgram, RpcGameClient, Shell};
use solana_sdk::commitment_config::CommitmentLevel;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

mod app;
mod ui;

#[derive(Parser)]
#[command(name = "guessnum")]
#[command(about = "Create, list and play number guessing games on Solana.", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArguments,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Debug, Default)]
struct ConnectionArguments {
    /// JSON config file. Options given on the command line take precedence.
    #[arg(long, global = true, env = "GUESSNUM_CONFIG")]
    config: Option<PathBuf>,

    /// Cluster moniker (devnet, testnet, mainnet-beta, localnet) or RPC URL.
    #[arg(short, long, global = true, env = "GUESSNUM_URL")]
    url: Option<Cluster>,

    /// Address of the game program.
    #[arg(long, global = true, env = "GUESSNUM_PROGRAM_ID")]
    program_id: Option<String>,

    /// Wallet keypair file. Defaults to the Solana CLI keypair.
    #[arg(short, long, global = true, env = "GUESSNUM_KEYPAIR")]
    keypair: Option<PathBuf>,

    /// Commitment level used for reads and confirmations.
    #[arg(long, global = true)]
    commitment: Option<CommitmentLevel>,
}

impl ConnectionArguments {
    fn resolve(&self) -> Result<ClientConfig, ClientError> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        if let Some(url) = &self.url {
            config.cluster = url.clone();
        }
        if let Some(program_id) = &self.program_id {
            config.program_id = program_id.clone();
        }
        if let Some(keypair) = &self.keypair {
            config.keypair_path = keypair.clone();
        }
        if let Some(commitment) = self.commitment {
            config.commitment = commitment;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Command {
    /// List the open games.
    List,

    /// Create a game around a target number.
    Create {
        /// The number to guess, 0 to 255.
        target: u8,
    },

    /// Submit a guess for a game.
    Guess {
        /// Address of the game.
        game: Pubkey,

        /// The guessed number, 0 to 255.
        number: u8,
    },

    /// End a game owned by the wallet.
    End {
        /// Address of the game.
        game: Pubkey,
    },

    /// Generate a wallet keypair file.
    Keygen(KeygenArguments),

    /// Open the interactive game screen.
    Play(PlayArguments),
}

#[derive(Parser, Clone)]
struct KeygenArguments {
    /// Where to write the keypair.
    #[clap(short, long)]
    outfile: PathBuf,

    /// Overwrite an existing file.
    #[clap(long)]
    force: bool,
}

#[derive(Parser, Clone)]
struct PlayArguments {
    /// Play against an in-memory program instead of the cluster.
    #[clap(long)]
    offline: bool,

    /// Log file for the session; the screen itself is not available for logs.
    #[clap(long, default_value = "guessnum.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let log_file = match &cli.command {
        Command::Play(arguments) => Some(arguments.log_file.clone()),
        _ => None,
    };
    if let Err(e) = init_logging(log_file.as_deref()) {
        println!("Error: {:#}", e);
        std::process::exit(exitcode::CANTCREAT);
    }

    match execute(cli).await {
        Ok(res) => {
            if !res.is_empty() {
                println!("{}", res);
            }
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            println!("Error: {:#}", e);
            std::process::exit(exit_code(&e));
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn exit_code(e: &anyhow::Error) -> exitcode::ExitCode {
    match e.downcast_ref::<ClientError>() {
        Some(ClientError::Rpc(_)) => exitcode::UNAVAILABLE,
        Some(ClientError::Io(_)) => exitcode::IOERR,
        _ => exitcode::DATAERR,
    }
}

async fn execute(cli: Cli) -> Result<String> {
    match cli.command {
        Command::List => {
            let client = RpcGameClient::from_config(&cli.connection.resolve()?)?;
            let games = client.list_games().await?;
            let mut lines = Vec::new();
            for (index, game) in games.iter().filter(|g| g.is_active()).enumerate() {
                lines.push(format!(
                    "ROOM: {}  {}  owner {}",
                    index + 1,
                    game.id,
                    game.account.owner
                ));
            }
            if lines.is_empty() {
                return Ok("No open games.".to_string());
            }
            Ok(lines.join("\n"))
        }

        Command::Create { target } => {
            let client = RpcGameClient::from_config(&cli.connection.resolve()?)?;
            let game = client.create_game(target).await?;
            Ok(format!("Game initialized successfully!\nGame: {}", game))
        }

        Command::Guess { game, number } => {
            let client = RpcGameClient::from_config(&cli.connection.resolve()?)?;
            client.submit_guess(&game, number).await?;
            Ok(format!("Guess {} submitted for game {}", number, game))
        }

        Command::End { game } => {
            let client = RpcGameClient::from_config(&cli.connection.resolve()?)?;
            client.end_game(&game).await?;
            Ok("Game ended successfully!".to_string())
        }

        Command::Keygen(arguments) => {
            if arguments.outfile.exists() && !arguments.force {
                bail!(
                    "Refusing to overwrite {} without --force",
                    arguments.outfile.display()
                );
            }
            let keypair = Keypair::new();
            write_keypair(&keypair, &arguments.outfile)?;

            let mut result = "Wrote new keypair to ".to_string();
            result.push_str(&arguments.outfile.display().to_string());
            result.push_str("\nPublic key: ");
            result.push_str(&keypair.pubkey().to_string());
            Ok(result)
        }

        Command::Play(arguments) => {
            if arguments.offline {
                let program = MockGameProgram::new(Keypair::new().pubkey());
                app::run(Shell::new(None), move || Ok(program.clone())).await?;
            } else {
                let config = cli.connection.resolve()?;
                app::run(Shell::new(None), move || RpcGameClient::from_config(&config)).await?;
            }
            Ok(String::new())
        }
    }
}
