// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The game screen's controller: dispatches user intents to the program and
//! keeps the session and room list in step with the results.

use {
    crate::{
        client::{fetch_open_games, log_failure, GameProgram},
        session::{parse_number, Dialog, Outcome, Session},
        store::{OpenGameList, RoomCard},
    },
    solana_program::pubkey::Pubkey,
    tracing::warn,
};

pub const INVALID_NUMBER: &str = "Enter a number between 0 and 255.";
pub const CREATE_FAILED: &str = "Failed to initialize game.";
pub const GUESS_FAILED: &str = "Error during guess.";
pub const END_FAILED: &str = "Failed to end game.";

/// Everything needed to draw the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    pub wallet: Option<Pubkey>,
    pub rooms: Vec<RoomCard>,
    pub dialog: Dialog,
    pub outcome: Outcome,
    pub target_text: String,
    pub guess_text: String,
    pub status: String,
}

pub struct Shell<C> {
    client: Option<C>,
    session: Session,
    games: OpenGameList,
}

impl<C: GameProgram> Shell<C> {
    /// A shell without a client stays disconnected until [`Shell::connect`].
    pub fn new(client: Option<C>) -> Self {
        Shell {
            client,
            session: Session::default(),
            games: OpenGameList::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn games(&self) -> &OpenGameList {
        &self.games
    }

    pub fn client(&self) -> Option<&C> {
        self.client.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub async fn connect(&mut self, client: C) {
        self.client = Some(client);
        self.refresh().await;
    }

    pub fn disconnect(&mut self) {
        self.client = None;
        self.games.clear();
    }

    /// Replaces the room list with a fresh fetch. No-op without a wallet.
    pub async fn refresh(&mut self) {
        let Some(client) = &self.client else {
            return;
        };
        let games = fetch_open_games(client).await;
        self.games.replace(games);
    }

    pub fn open_create_dialog(&mut self) {
        self.session.open_create_dialog();
    }

    pub fn close_create_dialog(&mut self) {
        self.session.close_create_dialog();
    }

    pub async fn create_game(&mut self) {
        let Some(client) = &self.client else {
            return;
        };
        let target = match parse_number(self.session.target_text()) {
            Ok(target) => target,
            Err(err) => {
                warn!(%err, "Rejected target number");
                self.session.set_status(INVALID_NUMBER);
                return;
            }
        };
        match client.create_game(target).await {
            Ok(game) => {
                self.session.game_created(game);
                self.refresh().await;
            }
            Err(err) => {
                log_failure("Initialize game", &err);
                self.session.set_status(CREATE_FAILED);
            }
        }
    }

    /// Opens the guess dialog on the room at `index`. Returns false if there is no such room.
    pub fn select_room(&mut self, index: usize) -> bool {
        let Some(record) = self.games.get(index) else {
            return false;
        };
        let game = record.id;
        self.session.select_game(game);
        true
    }

    pub async fn submit_guess(&mut self) {
        let Some(client) = &self.client else {
            return;
        };
        let Some(game) = self.session.selected_game() else {
            warn!("Missing game selection");
            return;
        };
        if !self.session.is_guess_open() || self.session.outcome().is_resolved() {
            return;
        }
        let guess = match parse_number(self.session.guess_text()) {
            Ok(guess) => guess,
            Err(err) => {
                warn!(%err, "Rejected guess");
                self.session.set_status(INVALID_NUMBER);
                return;
            }
        };
        match client.submit_guess(&game, guess).await {
            Ok(()) => {
                self.session.resolve_guess(guess);
                self.refresh().await;
            }
            Err(err) => {
                log_failure("Guess", &err);
                self.session.set_status(GUESS_FAILED);
            }
        }
    }

    /// Closing a resolved guess ends the game; closing an open one only refreshes.
    pub async fn close_guess_dialog(&mut self) {
        if !self.session.is_guess_open() {
            return;
        }
        let resolved = self.session.outcome().is_resolved();
        self.session.close_guess_dialog();
        if resolved {
            self.end_game().await;
        } else {
            self.refresh().await;
        }
    }

    pub async fn end_game(&mut self) {
        let Some(client) = &self.client else {
            return;
        };
        let Some(game) = self.session.selected_game() else {
            warn!("No game selected to end");
            return;
        };
        match client.end_game(&game).await {
            Ok(()) => self.session.game_ended(),
            Err(err) => {
                log_failure("End game", &err);
                self.session.set_status(END_FAILED);
            }
        }
        self.refresh().await;
    }

    pub fn view(&self) -> ShellView {
        ShellView {
            wallet: self.client.as_ref().map(GameProgram::wallet),
            rooms: self.games.room_cards(),
            dialog: self.session.dialog(),
            outcome: self.session.outcome(),
            target_text: self.session.target_text().to_string(),
            guess_text: self.session.guess_text().to_string(),
            status: self.session.status().to_string(),
        }
    }
}
