// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use {
    crate::error::ClientError,
    borsh::{BorshDeserialize, BorshSerialize},
    solana_program::pubkey::Pubkey,
    solana_sdk::account::Account,
};

/// Length of the account discriminator prefix.
pub const DISCRIMINATOR_LEN: usize = 8;

/// Account discriminator of a game record, `sha256("account:Game")[..8]`.
pub const GAME_DISCRIMINATOR: [u8; 8] = [27, 90, 166, 125, 74, 100, 121, 18];

/// Account discriminator of a player record, `sha256("account:Player")[..8]`.
pub const PLAYER_DISCRIMINATOR: [u8; 8] = [205, 222, 112, 7, 165, 155, 206, 218];

/// Serialized size of a game account, discriminator included.
pub const GAME_ACCOUNT_LEN: usize = DISCRIMINATOR_LEN + 32 + 1 + 1;

/// Serialized size of a player account, discriminator included.
pub const PLAYER_ACCOUNT_LEN: usize = DISCRIMINATOR_LEN + 32 + 1;

/// A program account type with a fixed discriminator.
pub trait ProgramAccount: BorshDeserialize + BorshSerialize + Sized {
    const DISCRIMINATOR: [u8; 8];
    const LEN: usize;

    /// Checks the discriminator and decodes the fields that follow it.
    /// Trailing bytes past the fields are ignored.
    fn try_deserialize(address: &Pubkey, data: &[u8]) -> Result<Self, ClientError> {
        if data.len() < Self::LEN {
            return Err(ClientError::invalid_account(
                *address,
                format!("expected at least {} bytes, got {}", Self::LEN, data.len()),
            ));
        }
        if data[..DISCRIMINATOR_LEN] != Self::DISCRIMINATOR {
            return Err(ClientError::invalid_account(*address, "invalid discriminator"));
        }
        let mut fields = &data[DISCRIMINATOR_LEN..];
        Self::deserialize(&mut fields)
            .map_err(|e| ClientError::invalid_account(*address, e.to_string()))
    }

    /// Discriminator followed by the Borsh encoded fields.
    fn to_account_data(&self) -> std::io::Result<Vec<u8>> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(&Self::DISCRIMINATOR);
        self.serialize(&mut data)?;
        Ok(data)
    }
}

/// On-chain state of a game.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameAccount {
    /// The wallet that created the game
    pub owner: Pubkey,
    /// The number to guess
    pub target_number: u8,
    /// Cleared once the owner ends the game
    pub is_active: bool,
}

impl ProgramAccount for GameAccount {
    const DISCRIMINATOR: [u8; 8] = GAME_DISCRIMINATOR;
    const LEN: usize = GAME_ACCOUNT_LEN;
}

/// On-chain record of a single guess.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAccount {
    pub player: Pubkey,
    pub guess: u8,
}

impl ProgramAccount for PlayerAccount {
    const DISCRIMINATOR: [u8; 8] = PLAYER_DISCRIMINATOR;
    const LEN: usize = PLAYER_ACCOUNT_LEN;
}

/// A program account together with its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<T> {
    pub id: Pubkey,
    pub account: T,
}

pub type GameRecord = Record<GameAccount>;
pub type PlayerRecord = Record<PlayerAccount>;

impl<T: ProgramAccount> Record<T> {
    /// Validates a fetched account: it must be owned by `program_id` and hold a `T`.
    pub fn from_account(
        program_id: &Pubkey,
        id: Pubkey,
        account: &Account,
    ) -> Result<Self, ClientError> {
        if account.owner != *program_id {
            return Err(ClientError::invalid_account(
                id,
                format!("owned by {}, expected {}", account.owner, program_id),
            ));
        }
        Ok(Record {
            id,
            account: T::try_deserialize(&id, &account.data)?,
        })
    }
}

impl GameRecord {
    pub fn is_active(&self) -> bool {
        self.account.is_active
    }
}
