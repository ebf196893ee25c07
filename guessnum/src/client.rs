// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use {
    crate::{
        config::{read_keypair, ClientConfig},
        error::ClientError,
        instruction,
        state::{GameRecord, GAME_DISCRIMINATOR},
    },
    solana_account_decoder::UiAccountEncoding,
    solana_client::{
        nonblocking::rpc_client::RpcClient,
        rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
        rpc_filter::{Memcmp, RpcFilterType},
    },
    solana_program::{instruction::Instruction, pubkey::Pubkey},
    solana_sdk::{
        account::Account,
        signature::{Keypair, Signature, Signer},
        transaction::Transaction,
    },
    tracing::{debug, error, info, warn},
};

/// The remote game program, as seen by a connected wallet.
///
/// Outcomes are decided by the program; a successful `submit_guess` only
/// means the guess was recorded.
#[allow(async_fn_in_trait)]
pub trait GameProgram {
    /// Identity that signs and pays for every transaction.
    fn wallet(&self) -> Pubkey;

    /// Every game account owned by the program, active or not.
    async fn list_games(&self) -> Result<Vec<GameRecord>, ClientError>;

    /// Creates a game owned by the wallet and returns its address.
    async fn create_game(&self, target_number: u8) -> Result<Pubkey, ClientError>;

    async fn submit_guess(&self, game: &Pubkey, guessed_number: u8) -> Result<(), ClientError>;

    async fn end_game(&self, game: &Pubkey) -> Result<(), ClientError>;
}

/// Lists the open games. Failures are logged and read as an empty list, so an
/// empty result does not prove there are no games.
pub async fn fetch_open_games<C: GameProgram>(client: &C) -> Vec<GameRecord> {
    match client.list_games().await {
        Ok(games) => games.into_iter().filter(GameRecord::is_active).collect(),
        Err(err) => {
            error!(%err, "Error fetching games");
            Vec::new()
        }
    }
}

/// Logs a failed transaction, naming the program error when there is one.
pub(crate) fn log_failure(operation: &str, err: &ClientError) {
    match err.program_error() {
        Some(program_error) => error!(
            code = program_error.code(),
            %program_error,
            "{} rejected by program", operation
        ),
        None => error!(%err, "{} failed", operation),
    }
}

/// Decodes fetched program accounts, skipping the ones that are not games.
pub fn decode_game_accounts(
    program_id: &Pubkey,
    accounts: Vec<(Pubkey, Account)>,
) -> Vec<GameRecord> {
    accounts
        .into_iter()
        .filter_map(|(id, account)| match GameRecord::from_account(program_id, id, &account) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(%err, "Skipping account");
                None
            }
        })
        .collect()
}

/// [`GameProgram`] over Solana JSON RPC.
pub struct RpcGameClient {
    rpc: RpcClient,
    program_id: Pubkey,
    wallet: Keypair,
}

impl RpcGameClient {
    pub fn new(rpc: RpcClient, program_id: Pubkey, wallet: Keypair) -> Self {
        RpcGameClient {
            rpc,
            program_id,
            wallet,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let program_id = config.program_id()?;
        let wallet = read_keypair(&config.keypair_path)?;
        let rpc = RpcClient::new_with_commitment(
            config.cluster.url().to_string(),
            config.commitment_config(),
        );
        Ok(RpcGameClient::new(rpc, program_id, wallet))
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Balance of the wallet in lamports.
    pub async fn balance(&self) -> Result<u64, ClientError> {
        Ok(self.rpc.get_balance(&self.wallet.pubkey()).await?)
    }

    /// Signs with the wallet as fee payer plus `account` when a new account is created.
    async fn send(
        &self,
        instruction: Instruction,
        account: Option<&Keypair>,
    ) -> Result<Signature, ClientError> {
        let recent_blockhash = self.rpc.get_latest_blockhash().await?;

        let mut signers: Vec<&dyn Signer> = vec![&self.wallet];
        if let Some(account) = account {
            signers.push(account);
        }
        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&self.wallet.pubkey()),
            &signers,
            recent_blockhash,
        );

        debug!(signature = %transaction.signatures[0], "Sending transaction");
        Ok(self.rpc.send_and_confirm_transaction(&transaction).await?)
    }
}

impl GameProgram for RpcGameClient {
    fn wallet(&self) -> Pubkey {
        self.wallet.pubkey()
    }

    async fn list_games(&self) -> Result<Vec<GameRecord>, ClientError> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                0,
                &GAME_DISCRIMINATOR,
            ))]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };
        let accounts = self
            .rpc
            .get_program_accounts_with_config(&self.program_id, config)
            .await?;
        debug!(count = accounts.len(), "Fetched game accounts");
        Ok(decode_game_accounts(&self.program_id, accounts))
    }

    async fn create_game(&self, target_number: u8) -> Result<Pubkey, ClientError> {
        // The game account key only signs its own creation and is dropped afterwards.
        let game = Keypair::new();
        let ix = instruction::initialize_game(
            &self.program_id,
            &game.pubkey(),
            &self.wallet.pubkey(),
            target_number,
        );
        let signature = self.send(ix, Some(&game)).await?;
        info!(%signature, game = %game.pubkey(), "Game initialized");
        Ok(game.pubkey())
    }

    async fn submit_guess(&self, game: &Pubkey, guessed_number: u8) -> Result<(), ClientError> {
        let player = Keypair::new();
        let ix = instruction::guess_number(
            &self.program_id,
            game,
            &player.pubkey(),
            &self.wallet.pubkey(),
            guessed_number,
        );
        let signature = self.send(ix, Some(&player)).await?;
        info!(%signature, %game, player = %player.pubkey(), "Guess submitted");
        Ok(())
    }

    async fn end_game(&self, game: &Pubkey) -> Result<(), ClientError> {
        let ix = instruction::end_game(&self.program_id, game, &self.wallet.pubkey());
        let signature = self.send(ix, None).await?;
        info!(%signature, %game, "Game ended");
        Ok(())
    }
}
