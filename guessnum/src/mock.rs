// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory stand-in for the game program.
//!
//! Enforces the same rules the deployed program does (only the owner may end a
//! game, guesses need an active game) and reports violations with the
//! program's custom error codes.

use {
    crate::{
        client::GameProgram,
        error::{ClientError, GameProgramError},
        state::{GameAccount, GameRecord, PlayerAccount, PlayerRecord, Record},
    },
    solana_client::client_error::ClientError as RpcError,
    solana_program::{instruction::InstructionError, pubkey::Pubkey},
    solana_sdk::{
        signature::{Keypair, Signer},
        transaction::TransactionError,
    },
    std::{
        io,
        sync::{Arc, Mutex, MutexGuard},
    },
};

#[derive(Debug, Default)]
struct Ledger {
    games: Vec<GameRecord>,
    pending: Vec<GameRecord>,
    players: Vec<PlayerRecord>,
    next_game_id: Option<Pubkey>,
    hold_finalization: bool,
    fail_list: bool,
    fail_transactions: bool,
}

/// A wallet's view of an in-memory game program. Clones made with
/// [`MockGameProgram::with_wallet`] share the same ledger.
#[derive(Debug, Clone)]
pub struct MockGameProgram {
    wallet: Pubkey,
    ledger: Arc<Mutex<Ledger>>,
}

impl MockGameProgram {
    pub fn new(wallet: Pubkey) -> Self {
        MockGameProgram {
            wallet,
            ledger: Arc::default(),
        }
    }

    /// Another wallet connected to the same program.
    pub fn with_wallet(&self, wallet: Pubkey) -> Self {
        MockGameProgram {
            wallet,
            ledger: self.ledger.clone(),
        }
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        // A test that panicked while holding the lock leaves the ledger usable.
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Address used for the next created game instead of a fresh one.
    pub fn set_next_game_id(&self, id: Pubkey) {
        self.ledger().next_game_id = Some(id);
    }

    /// While held, created games stay unfinalized and are not listed.
    pub fn hold_finalization(&self, hold: bool) {
        self.ledger().hold_finalization = hold;
    }

    /// Finalizes every held game.
    pub fn finalize_pending(&self) {
        let mut ledger = self.ledger();
        let pending = std::mem::take(&mut ledger.pending);
        ledger.games.extend(pending);
    }

    pub fn fail_list(&self, fail: bool) {
        self.ledger().fail_list = fail;
    }

    pub fn fail_transactions(&self, fail: bool) {
        self.ledger().fail_transactions = fail;
    }

    pub fn insert_game(&self, record: GameRecord) {
        self.ledger().games.push(record);
    }

    pub fn game(&self, id: &Pubkey) -> Option<GameRecord> {
        self.ledger().games.iter().find(|g| g.id == *id).copied()
    }

    pub fn players(&self) -> Vec<PlayerRecord> {
        self.ledger().players.clone()
    }

    fn check_transactions(ledger: &Ledger) -> Result<(), ClientError> {
        if ledger.fail_transactions {
            return Err(RpcError::from(TransactionError::InsufficientFundsForFee).into());
        }
        Ok(())
    }
}

fn program_error(e: GameProgramError) -> ClientError {
    RpcError::from(TransactionError::InstructionError(
        0,
        InstructionError::Custom(e.code()),
    ))
    .into()
}

impl GameProgram for MockGameProgram {
    fn wallet(&self) -> Pubkey {
        self.wallet
    }

    async fn list_games(&self) -> Result<Vec<GameRecord>, ClientError> {
        let ledger = self.ledger();
        if ledger.fail_list {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "rpc unreachable").into());
        }
        Ok(ledger.games.clone())
    }

    async fn create_game(&self, target_number: u8) -> Result<Pubkey, ClientError> {
        let mut ledger = self.ledger();
        Self::check_transactions(&ledger)?;
        let id = ledger
            .next_game_id
            .take()
            .unwrap_or_else(|| Keypair::new().pubkey());
        let record = Record {
            id,
            account: GameAccount {
                owner: self.wallet,
                target_number,
                is_active: true,
            },
        };
        if ledger.hold_finalization {
            ledger.pending.push(record);
        } else {
            ledger.games.push(record);
        }
        Ok(id)
    }

    async fn submit_guess(&self, game: &Pubkey, guessed_number: u8) -> Result<(), ClientError> {
        let mut ledger = self.ledger();
        Self::check_transactions(&ledger)?;
        let active = ledger
            .games
            .iter()
            .any(|g| g.id == *game && g.account.is_active);
        if !active {
            return Err(program_error(GameProgramError::GameNotActive));
        }
        ledger.players.push(Record {
            id: Keypair::new().pubkey(),
            account: PlayerAccount {
                player: self.wallet,
                guess: guessed_number,
            },
        });
        Ok(())
    }

    async fn end_game(&self, game: &Pubkey) -> Result<(), ClientError> {
        let mut ledger = self.ledger();
        Self::check_transactions(&ledger)?;
        let wallet = self.wallet;
        let record = ledger
            .games
            .iter_mut()
            .find(|g| g.id == *game)
            .ok_or_else(|| program_error(GameProgramError::GameNotActive))?;
        if record.account.owner != wallet {
            return Err(program_error(GameProgramError::Unauthorized));
        }
        record.account.is_active = false;
        Ok(())
    }
}
