// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Client for the on-chain number guessing game.
//!
//! [`client::GameProgram`] is the typed binding to the program, [`shell::Shell`]
//! drives a game screen on top of it.

pub mod client;
pub mod config;
pub mod error;
pub mod instruction;
pub mod session;
pub mod shell;
pub mod state;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use {
    client::{fetch_open_games, GameProgram, RpcGameClient},
    config::{ClientConfig, Cluster},
    error::{ClientError, GameProgramError},
    shell::{Shell, ShellView},
    state::GameRecord,
};
