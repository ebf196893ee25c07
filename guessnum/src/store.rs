// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use {crate::state::GameRecord, solana_program::pubkey::Pubkey};

/// A room as listed on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCard {
    /// 1-based position in the list
    pub number: usize,
    pub game: Pubkey,
}

impl RoomCard {
    pub fn label(&self) -> String {
        format!("ROOM: {}", self.number)
    }
}

/// The most recently fetched active games, in the order the program returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenGameList {
    games: Vec<GameRecord>,
}

impl OpenGameList {
    /// Replaces the whole list. Inactive records are dropped.
    pub fn replace(&mut self, games: Vec<GameRecord>) {
        self.games = games.into_iter().filter(GameRecord::is_active).collect();
    }

    pub fn clear(&mut self) {
        self.games.clear();
    }

    pub fn get(&self, index: usize) -> Option<&GameRecord> {
        self.games.get(index)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.games.iter()
    }

    pub fn room_cards(&self) -> Vec<RoomCard> {
        self.games
            .iter()
            .enumerate()
            .map(|(index, record)| RoomCard {
                number: index + 1,
                game: record.id,
            })
            .collect()
    }
}
