// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::ui::{self, UserEvent};
use anyhow::Result;
use guessnum::{ClientError, GameProgram, Shell};
use tracing::{error, info};

pub const CONNECT_FAILED: &str = "Failed to connect wallet.";
pub const DISCONNECTED: &str = "Wallet disconnected.";

/// Runs the game screen until the user quits. `connect` is called every time
/// the user connects the wallet.
pub async fn run<C, F>(mut shell: Shell<C>, connect: F) -> Result<()>
where
    C: GameProgram,
    F: Fn() -> Result<C, ClientError>,
{
    let mut ui_state: ui::UiState = ui::UiState::default();

    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(&mut shell, &mut ui_state, &connect).await;
    ui::terminal_exit()?;
    res
}

async fn run_loop<C, F>(shell: &mut Shell<C>, ui_state: &mut ui::UiState, connect: &F) -> Result<()>
where
    C: GameProgram,
    F: Fn() -> Result<C, ClientError>,
{
    let mut events = ui::input_event_stream();
    ui::draw(ui_state, &shell.view())?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            ev = ui::next_raw_event(&mut events) => {
                let view = shell.view();
                let Some(user_event) = ui::interpret_event(ui_state, &view, ev?) else {
                    continue;
                };
                if !dispatch(shell, user_event, connect).await {
                    break;
                }
                ui::draw(ui_state, &shell.view())?;
            }
        }
    }
    Ok(())
}

/// Applies one user event to the shell. Returns false when the user quits.
pub async fn dispatch<C, F>(shell: &mut Shell<C>, event: UserEvent, connect: &F) -> bool
where
    C: GameProgram,
    F: Fn() -> Result<C, ClientError>,
{
    match event {
        UserEvent::Quit => return false,
        UserEvent::ToggleWallet => {
            if shell.is_connected() {
                shell.disconnect();
                shell.session_mut().set_status(DISCONNECTED);
            } else {
                match connect() {
                    Ok(client) => {
                        info!(wallet = %client.wallet(), "Wallet connected");
                        shell.connect(client).await;
                        shell.session_mut().set_status("");
                    }
                    Err(err) => {
                        error!(%err, "Wallet connection failed");
                        shell.session_mut().set_status(CONNECT_FAILED);
                    }
                }
            }
        }
        UserEvent::Refresh => shell.refresh().await,
        UserEvent::OpenCreate => shell.open_create_dialog(),
        UserEvent::CloseCreate => shell.close_create_dialog(),
        UserEvent::ConfirmCreate => shell.create_game().await,
        UserEvent::SelectRoom(index) => {
            shell.select_room(index);
        }
        UserEvent::Digit(c) => shell.session_mut().push_digit(c),
        UserEvent::Backspace => shell.session_mut().pop_digit(),
        UserEvent::SubmitGuess => shell.submit_guess().await,
        UserEvent::CloseGuess => shell.close_guess_dialog().await,
        UserEvent::Redraw => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use guessnum::mock::MockGameProgram;
    use guessnum::session::{Dialog, Outcome};
    use solana_sdk::pubkey::Pubkey;

    async fn send<F>(shell: &mut Shell<MockGameProgram>, connect: &F, events: &[UserEvent])
    where
        F: Fn() -> Result<MockGameProgram, ClientError>,
    {
        for event in events {
            assert!(dispatch(shell, *event, connect).await);
        }
    }

    #[tokio::test]
    async fn test_full_round() {
        let program = MockGameProgram::new(Pubkey::new_unique());
        let connect = || -> Result<MockGameProgram, ClientError> { Ok(program.clone()) };
        let mut shell = Shell::new(None);

        send(
            &mut shell,
            &connect,
            &[
                UserEvent::ToggleWallet,
                UserEvent::OpenCreate,
                UserEvent::Digit('4'),
                UserEvent::Digit('2'),
                UserEvent::ConfirmCreate,
            ],
        )
        .await;
        assert_eq!(shell.view().status, "Game initialized successfully!");
        assert_eq!(shell.view().rooms.len(), 1);

        send(
            &mut shell,
            &connect,
            &[
                UserEvent::SelectRoom(0),
                UserEvent::Digit('4'),
                UserEvent::Digit('3'),
                UserEvent::Backspace,
                UserEvent::Digit('2'),
                UserEvent::SubmitGuess,
            ],
        )
        .await;
        assert_eq!(shell.view().outcome, Outcome::Win);

        send(&mut shell, &connect, &[UserEvent::CloseGuess]).await;
        let view = shell.view();
        assert_eq!(view.status, "Game ended successfully!");
        assert_eq!(view.dialog, Dialog::Idle);
        assert!(view.rooms.is_empty());

        assert!(!dispatch(&mut shell, UserEvent::Quit, &connect).await);
    }

    #[tokio::test]
    async fn test_wallet_toggle() {
        let program = MockGameProgram::new(Pubkey::new_unique());
        program.create_game(8).await.unwrap();
        let connect = || -> Result<MockGameProgram, ClientError> { Ok(program.clone()) };
        let mut shell = Shell::new(None);

        send(&mut shell, &connect, &[UserEvent::ToggleWallet]).await;
        assert_eq!(shell.view().wallet, Some(program.wallet()));
        assert_eq!(shell.view().rooms.len(), 1);

        send(&mut shell, &connect, &[UserEvent::ToggleWallet]).await;
        assert_eq!(shell.view().wallet, None);
        assert_eq!(shell.view().status, DISCONNECTED);
        assert!(shell.view().rooms.is_empty());
    }

    #[tokio::test]
    async fn test_failed_connect() {
        let connect = || -> Result<MockGameProgram, ClientError> {
            Err(ClientError::Keypair("missing.json: not found".to_string()))
        };
        let mut shell = Shell::new(None);
        send(&mut shell, &connect, &[UserEvent::ToggleWallet]).await;
        assert!(!shell.is_connected());
        assert_eq!(shell.view().status, CONNECT_FAILED);
    }
}
