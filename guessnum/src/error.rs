// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use {
    solana_client::client_error::ClientError as RpcError,
    solana_program::{instruction::InstructionError, pubkey::Pubkey},
    solana_sdk::transaction::TransactionError,
    thiserror::Error,
};

/// Errors surfaced by the game client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("No wallet connected")]
    WalletNotConnected,

    #[error("No game selected")]
    NoGameSelected,

    #[error("Invalid number {0:?}: expected an integer between 0 and 255")]
    InvalidNumber(String),

    #[error("Invalid account {address}: {reason}")]
    InvalidAccount { address: Pubkey, reason: String },

    #[error("Invalid keypair: {0}")]
    Keypair(String),

    #[error("Invalid program id {0:?}")]
    InvalidProgramId(String),

    #[error(transparent)]
    Rpc(#[from] Box<RpcError>),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<RpcError> for ClientError {
    fn from(e: RpcError) -> Self {
        ClientError::Rpc(Box::new(e))
    }
}

impl ClientError {
    pub fn invalid_account(address: Pubkey, reason: impl Into<String>) -> Self {
        ClientError::InvalidAccount {
            address,
            reason: reason.into(),
        }
    }

    /// The game program's own error, if the remote rejected the transaction with one.
    pub fn program_error(&self) -> Option<GameProgramError> {
        let ClientError::Rpc(rpc) = self else {
            return None;
        };
        match rpc.get_transaction_error()? {
            TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
                GameProgramError::from_code(code)
            }
            _ => None,
        }
    }
}

/// Custom error codes declared by the game program.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameProgramError {
    #[error("The game is not active.")]
    GameNotActive = 6000,

    #[error("Unauthorized action.")]
    Unauthorized = 6001,
}

impl GameProgramError {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            6000 => Some(GameProgramError::GameNotActive),
            6001 => Some(GameProgramError::Unauthorized),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}
