// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use {crate::error::ClientError, solana_program::pubkey::Pubkey};

/// Longest accepted number input, in characters.
pub const MAX_INPUT_LEN: usize = 3;

/// Which dialog is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialog {
    #[default]
    Idle,
    CreateGame,
    GuessGame,
}

/// Result of a guess as judged locally. Advisory only: the program keeps the
/// authoritative outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Outcome {
    #[default]
    Pending,
    Win,
    Lose,
}

impl Outcome {
    /// A guess wins only against a known, equal target.
    pub fn judge(guess: u8, target: Option<u8>) -> Self {
        match target {
            Some(target) if target == guess => Outcome::Win,
            _ => Outcome::Lose,
        }
    }

    pub fn is_win(self) -> bool {
        self == Outcome::Win
    }

    pub fn is_lose(self) -> bool {
        self == Outcome::Lose
    }

    pub fn is_resolved(self) -> bool {
        self != Outcome::Pending
    }
}

/// Parses a number input in `0..=255`.
pub fn parse_number(text: &str) -> Result<u8, ClientError> {
    text.trim()
        .parse::<u8>()
        .map_err(|_| ClientError::InvalidNumber(text.to_string()))
}

/// Local state of the game being created or played. Lives as long as the
/// screen and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    target_text: String,
    guess_text: String,
    selected_game: Option<Pubkey>,
    /// The game `target_text` belongs to
    created_game: Option<Pubkey>,
    outcome: Outcome,
    status: String,
    dialog: Dialog,
}

impl Session {
    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    pub fn guess_text(&self) -> &str {
        &self.guess_text
    }

    /// The target of the selected game, known only if this session created it.
    pub fn target(&self) -> Option<u8> {
        match (self.created_game, self.selected_game) {
            (Some(created), Some(selected)) if created == selected => {
                parse_number(&self.target_text).ok()
            }
            _ => None,
        }
    }

    pub fn created_game(&self) -> Option<Pubkey> {
        self.created_game
    }

    pub fn selected_game(&self) -> Option<Pubkey> {
        self.selected_game
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn dialog(&self) -> Dialog {
        self.dialog
    }

    pub fn is_create_open(&self) -> bool {
        self.dialog == Dialog::CreateGame
    }

    pub fn is_guess_open(&self) -> bool {
        self.dialog == Dialog::GuessGame
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Appends a digit to the input of the open dialog.
    pub fn push_digit(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        if let Some(input) = self.input_mut() {
            if input.len() < MAX_INPUT_LEN {
                input.push(c);
            }
        }
    }

    pub fn pop_digit(&mut self) {
        if let Some(input) = self.input_mut() {
            input.pop();
        }
    }

    fn input_mut(&mut self) -> Option<&mut String> {
        match self.dialog {
            Dialog::CreateGame => Some(&mut self.target_text),
            Dialog::GuessGame if !self.outcome.is_resolved() => Some(&mut self.guess_text),
            _ => None,
        }
    }

    pub fn open_create_dialog(&mut self) {
        if self.dialog == Dialog::Idle {
            self.dialog = Dialog::CreateGame;
        }
    }

    pub fn close_create_dialog(&mut self) {
        if self.dialog == Dialog::CreateGame {
            self.dialog = Dialog::Idle;
        }
    }

    /// Records a created game and closes the create dialog. The target text is
    /// kept so the creator can judge guesses on it.
    pub fn game_created(&mut self, game: Pubkey) {
        self.selected_game = Some(game);
        self.created_game = Some(game);
        self.status = "Game initialized successfully!".to_string();
        self.close_create_dialog();
    }

    /// Opens the guess dialog on `game` with a fresh outcome and empty guess.
    pub fn select_game(&mut self, game: Pubkey) {
        self.selected_game = Some(game);
        self.outcome = Outcome::Pending;
        self.guess_text.clear();
        self.dialog = Dialog::GuessGame;
    }

    /// Judges a guess the program accepted.
    pub fn resolve_guess(&mut self, guess: u8) -> Outcome {
        if self.dialog != Dialog::GuessGame || self.outcome.is_resolved() {
            return self.outcome;
        }
        self.outcome = Outcome::judge(guess, self.target());
        self.status = match self.outcome {
            Outcome::Win => "You win!",
            _ => "You lose! Incorrect guess.",
        }
        .to_string();
        self.outcome
    }

    /// Closes the guess dialog. The selection stays so the game can still be ended.
    pub fn close_guess_dialog(&mut self) {
        if self.dialog == Dialog::GuessGame {
            self.dialog = Dialog::Idle;
            self.outcome = Outcome::Pending;
        }
    }

    /// Clears everything tied to the ended game.
    pub fn game_ended(&mut self) {
        self.selected_game = None;
        self.created_game = None;
        self.outcome = Outcome::Pending;
        self.target_text.clear();
        self.guess_text.clear();
        if self.dialog == Dialog::GuessGame {
            self.dialog = Dialog::Idle;
        }
        self.status = "Game ended successfully!".to_string();
    }
}
