// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use {
    borsh::BorshDeserialize,
    solana_program::{
        instruction::{AccountMeta, Instruction},
        pubkey::Pubkey,
        system_program,
    },
    std::io::{Error, ErrorKind},
};

/// `sha256("global:initialize_game")[..8]`
pub const INITIALIZE_GAME_DISCRIMINATOR: [u8; 8] = [44, 62, 102, 247, 126, 208, 130, 215];
/// `sha256("global:guess_number")[..8]`
pub const GUESS_NUMBER_DISCRIMINATOR: [u8; 8] = [216, 75, 58, 76, 109, 159, 185, 16];
/// `sha256("global:end_game")[..8]`
pub const END_GAME_DISCRIMINATOR: [u8; 8] = [224, 135, 245, 99, 67, 175, 121, 252];

/// Instructions of the number guessing game program.
///
/// Encoded as an 8-byte discriminator followed by the Borsh encoded arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInstruction {
    /// Create a new game
    /// Accounts expected:
    /// 0. `[writable, signer]` Game account (fresh keypair)
    /// 1. `[writable, signer]` Creator
    /// 2. `[]` System program
    InitializeGame { target_number: u8 },

    /// Record a guess against an active game
    /// Accounts expected:
    /// 0. `[writable]` Game account
    /// 1. `[writable, signer]` Player account (fresh keypair)
    /// 2. `[writable, signer]` Guesser
    /// 3. `[]` System program
    GuessNumber { guessed_number: u8 },

    /// Deactivate a game
    /// Accounts expected:
    /// 0. `[writable]` Game account
    /// 1. `[signer]` Game owner
    EndGame,
}

impl GameInstruction {
    pub fn discriminator(&self) -> [u8; 8] {
        match self {
            GameInstruction::InitializeGame { .. } => INITIALIZE_GAME_DISCRIMINATOR,
            GameInstruction::GuessNumber { .. } => GUESS_NUMBER_DISCRIMINATOR,
            GameInstruction::EndGame => END_GAME_DISCRIMINATOR,
        }
    }

    /// Packs the instruction into program input data.
    pub fn pack(&self) -> Vec<u8> {
        let mut data = self.discriminator().to_vec();
        match self {
            GameInstruction::InitializeGame { target_number } => data.push(*target_number),
            GameInstruction::GuessNumber { guessed_number } => data.push(*guessed_number),
            GameInstruction::EndGame => {}
        }
        data
    }

    /// Unpacks program input data into a GameInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, Error> {
        if input.len() < 8 {
            return Err(Error::new(ErrorKind::InvalidData, "missing discriminator"));
        }
        let (discriminator, args) = input.split_at(8);
        let instruction = match discriminator {
            d if d == INITIALIZE_GAME_DISCRIMINATOR => GameInstruction::InitializeGame {
                target_number: u8::try_from_slice(args)?,
            },
            d if d == GUESS_NUMBER_DISCRIMINATOR => GameInstruction::GuessNumber {
                guessed_number: u8::try_from_slice(args)?,
            },
            d if d == END_GAME_DISCRIMINATOR => {
                if !args.is_empty() {
                    return Err(Error::new(ErrorKind::InvalidData, "unexpected arguments"));
                }
                GameInstruction::EndGame
            }
            _ => return Err(Error::new(ErrorKind::InvalidData, "unknown discriminator")),
        };
        Ok(instruction)
    }
}

pub fn initialize_game(
    program_id: &Pubkey,
    game: &Pubkey,
    creator: &Pubkey,
    target_number: u8,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*game, true),
            AccountMeta::new(*creator, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: GameInstruction::InitializeGame { target_number }.pack(),
    }
}

pub fn guess_number(
    program_id: &Pubkey,
    game: &Pubkey,
    player: &Pubkey,
    guesser: &Pubkey,
    guessed_number: u8,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*game, false),
            AccountMeta::new(*player, true),
            AccountMeta::new(*guesser, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: GameInstruction::GuessNumber { guessed_number }.pack(),
    }
}

pub fn end_game(program_id: &Pubkey, game: &Pubkey, owner: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*game, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data: GameInstruction::EndGame.pack(),
    }
}
