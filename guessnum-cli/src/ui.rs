// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use guessnum::session::{Dialog, Outcome};
use guessnum::ShellView;
use ratatui::{prelude::*, widgets::*};
use std::{io::stdout, thread};
use tokio::sync::mpsc;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    Quit,
    ToggleWallet,
    Refresh,
    OpenCreate,
    CloseCreate,
    ConfirmCreate,
    SelectRoom(usize),
    Digit(char),
    Backspace,
    SubmitGuess,
    CloseGuess,
    Redraw,
}

pub struct UiState<B: Backend = CrosstermBackend<std::io::Stdout>> {
    cursor: usize,
    terminal: Option<Terminal<B>>,
}

impl<B: Backend> Default for UiState<B> {
    fn default() -> Self {
        UiState {
            cursor: 0,
            terminal: None,
        }
    }
}

impl<B: Backend> UiState<B> {
    fn clamp_cursor(&mut self, rooms: usize) {
        self.cursor = self.cursor.min(rooms.saturating_sub(1));
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

/// Redraws the screen. The terminal stays installed even when drawing fails.
pub fn draw<B: Backend>(state: &mut UiState<B>, view: &ShellView) -> Result<()> {
    state.clamp_cursor(view.rooms.len());
    let cursor = state.cursor;
    if let Some(term) = state.terminal.as_mut() {
        term.draw(|f| ui(f, cursor, view))?;
    }
    Ok(())
}

pub type InputEventReceiver = mpsc::UnboundedReceiver<Event>;

pub fn input_event_stream() -> InputEventReceiver {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(err) => {
                error!(?err, "terminal input read failed");
                break;
            }
        }
    });
    rx
}

pub async fn next_raw_event(events: &mut InputEventReceiver) -> Result<Event> {
    events
        .recv()
        .await
        .ok_or_else(|| anyhow!("terminal input channel closed"))
}

pub fn interpret_event<B: Backend>(
    state: &mut UiState<B>,
    view: &ShellView,
    event: Event,
) -> Option<UserEvent> {
    let Event::Key(k) = event else {
        return None;
    };
    if k.kind != KeyEventKind::Press {
        return None;
    }
    if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(UserEvent::Quit);
    }

    match view.dialog {
        Dialog::CreateGame => match k.code {
            KeyCode::Esc => Some(UserEvent::CloseCreate),
            KeyCode::Enter => Some(UserEvent::ConfirmCreate),
            KeyCode::Backspace => Some(UserEvent::Backspace),
            KeyCode::Char(c) if c.is_ascii_digit() => Some(UserEvent::Digit(c)),
            _ => None,
        },
        Dialog::GuessGame if view.outcome.is_resolved() => match k.code {
            KeyCode::Esc | KeyCode::Enter => Some(UserEvent::CloseGuess),
            _ => None,
        },
        Dialog::GuessGame => match k.code {
            KeyCode::Esc => Some(UserEvent::CloseGuess),
            KeyCode::Enter => Some(UserEvent::SubmitGuess),
            KeyCode::Backspace => Some(UserEvent::Backspace),
            KeyCode::Char(c) if c.is_ascii_digit() => Some(UserEvent::Digit(c)),
            _ => None,
        },
        Dialog::Idle => match k.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(UserEvent::Quit),
            KeyCode::Char('w') => Some(UserEvent::ToggleWallet),
            KeyCode::Char('r') => Some(UserEvent::Refresh),
            // Creating needs a wallet.
            KeyCode::Char('c') if view.wallet.is_some() => Some(UserEvent::OpenCreate),
            KeyCode::Up | KeyCode::Char('k') => {
                state.cursor = state.cursor.saturating_sub(1);
                Some(UserEvent::Redraw)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                state.cursor += 1;
                state.clamp_cursor(view.rooms.len());
                Some(UserEvent::Redraw)
            }
            KeyCode::Enter if state.cursor < view.rooms.len() => {
                Some(UserEvent::SelectRoom(state.cursor))
            }
            _ => None,
        },
    }
}

fn ui(f: &mut Frame, cursor: usize, view: &ShellView) {
    let area = f.area();
    f.render_widget(Clear, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_wallet(f, chunks[0], view);
    draw_rooms(f, chunks[1], cursor, view);
    draw_status(f, chunks[2], view);
    draw_help(f, chunks[3], view);

    match view.dialog {
        Dialog::Idle => {}
        Dialog::CreateGame => draw_create_modal(f, area, view),
        Dialog::GuessGame => draw_guess_modal(f, area, view),
    }
}

fn draw_wallet(f: &mut Frame, area: Rect, view: &ShellView) {
    let line = match view.wallet {
        Some(wallet) => Line::from(vec![
            Span::raw("Wallet: "),
            Span::styled(wallet.to_string(), Style::default().fg(Color::Green)),
        ]),
        None => Line::from(Span::styled(
            "Wallet not connected (press w)",
            Style::default().fg(Color::Yellow),
        )),
    };
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Number Guessing Game"),
    );
    f.render_widget(header, area);
}

fn draw_rooms(f: &mut Frame, area: Rect, cursor: usize, view: &ShellView) {
    let block = Block::default().borders(Borders::ALL).title("Open Rooms");
    if view.rooms.is_empty() {
        let empty = Paragraph::new("No open rooms.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = view
        .rooms
        .iter()
        .map(|card| {
            ListItem::new(Line::from(vec![
                Span::styled(card.label(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(card.game.to_string(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status(f: &mut Frame, area: Rect, view: &ShellView) {
    let status = Paragraph::new(view.status.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_help(f: &mut Frame, area: Rect, view: &ShellView) {
    let help = match view.dialog {
        Dialog::Idle if view.wallet.is_some() => {
            "w disconnect | c create | up/down move | enter join | r refresh | q quit"
        }
        Dialog::Idle => "w connect wallet | q quit",
        Dialog::CreateGame => "0-9 type | enter create | esc close",
        Dialog::GuessGame if view.outcome.is_resolved() => "enter/esc close and end the game",
        Dialog::GuessGame => "0-9 type | enter guess | esc close",
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_create_modal(f: &mut Frame, area: Rect, view: &ShellView) {
    let popup = centered_rect(50, 30, area);
    f.render_widget(Clear, popup);
    let text = vec![
        Line::from(""),
        Line::from(format!("Target Number: {}_", view.target_text)),
        Line::from(""),
        Line::from(Span::styled(
            "A number between 0 and 255",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let modal = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Create Room"),
    );
    f.render_widget(modal, popup);
}

fn draw_guess_modal(f: &mut Frame, area: Rect, view: &ShellView) {
    let popup = centered_rect(50, 30, area);
    f.render_widget(Clear, popup);
    let (title, color, body) = match view.outcome {
        Outcome::Win => ("You Win!", Color::Green, "Your guess was correct.".to_string()),
        Outcome::Lose => ("You Lose!", Color::Red, "Incorrect guess.".to_string()),
        Outcome::Pending => (
            "Guess the Number",
            Color::Reset,
            format!("Your Guess: {}_", view.guess_text),
        ),
    };
    let modal = Paragraph::new(vec![Line::from(""), Line::from(body)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title),
    );
    f.render_widget(modal, popup);
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use guessnum::store::RoomCard;
    use ratatui::backend::TestBackend;
    use solana_sdk::pubkey::Pubkey;

    fn view(rooms: usize) -> ShellView {
        ShellView {
            wallet: Some(Pubkey::new_unique()),
            rooms: (0..rooms)
                .map(|i| RoomCard {
                    number: i + 1,
                    game: Pubkey::new_unique(),
                })
                .collect(),
            dialog: Dialog::Idle,
            outcome: Outcome::Pending,
            target_text: String::new(),
            guess_text: String::new(),
            status: String::new(),
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn render(view: &ShellView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui(f, 0, view)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_single_room_rendered_once() {
        let mut v = view(1);
        v.status = "Game initialized successfully!".to_string();
        let screen = render(&v);
        assert_eq!(screen.matches("ROOM: 1").count(), 1);
        assert!(!screen.contains("ROOM: 2"));
        assert!(screen.contains("Game initialized successfully!"));
        assert!(screen.contains(&v.rooms[0].game.to_string()));
    }

    #[test]
    fn test_guess_modal_titles() {
        let mut v = view(1);
        v.dialog = Dialog::GuessGame;
        v.guess_text = "12".to_string();
        let screen = render(&v);
        assert!(screen.contains("Guess the Number"));
        assert!(screen.contains("Your Guess: 12_"));
        assert!(!screen.contains("You Win!"));

        v.outcome = Outcome::Win;
        assert!(render(&v).contains("You Win!"));
        v.outcome = Outcome::Lose;
        let screen = render(&v);
        assert!(screen.contains("You Lose!"));
        assert!(!screen.contains("Guess the Number"));
    }

    #[test]
    fn test_disconnected_header() {
        let mut v = view(0);
        v.wallet = None;
        let screen = render(&v);
        assert!(screen.contains("Wallet not connected"));
        assert!(screen.contains("No open rooms."));
    }

    fn screen_of(state: &UiState<TestBackend>) -> String {
        state
            .terminal
            .as_ref()
            .unwrap()
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_keeps_terminal_installed() {
        let mut state = UiState {
            cursor: 5,
            terminal: Some(Terminal::new(TestBackend::new(100, 30)).unwrap()),
        };
        let mut v = view(2);
        draw(&mut state, &v).unwrap();
        assert_eq!(state.cursor, 1);
        assert!(screen_of(&state).contains("ROOM: 2"));

        v.rooms.truncate(1);
        v.status = "Game ended successfully!".to_string();
        draw(&mut state, &v).unwrap();
        assert!(state.terminal.is_some());
        let screen = screen_of(&state);
        assert!(screen.contains("Game ended successfully!"));
        assert!(!screen.contains("ROOM: 2"));
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_idle_keys() {
        let mut state: UiState = UiState::default();
        let v = view(2);
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Enter)), Some(UserEvent::SelectRoom(0)));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Down)), Some(UserEvent::Redraw));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Down)), Some(UserEvent::Redraw));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Enter)), Some(UserEvent::SelectRoom(1)));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Char('k'))), Some(UserEvent::Redraw));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Enter)), Some(UserEvent::SelectRoom(0)));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Char('c'))), Some(UserEvent::OpenCreate));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Char('q'))), Some(UserEvent::Quit));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Char('5'))), None);

        let empty = view(0);
        assert_eq!(interpret_event(&mut state, &empty, key(KeyCode::Enter)), None);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(interpret_event(&mut state, &empty, ctrl_c), Some(UserEvent::Quit));
    }

    #[test]
    fn test_dialog_keys() {
        let mut state: UiState = UiState::default();
        let mut v = view(1);
        v.dialog = Dialog::CreateGame;
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Char('7'))), Some(UserEvent::Digit('7')));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Char('x'))), None);
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Char('q'))), None);
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Enter)), Some(UserEvent::ConfirmCreate));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Esc)), Some(UserEvent::CloseCreate));

        v.dialog = Dialog::GuessGame;
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Backspace)), Some(UserEvent::Backspace));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Enter)), Some(UserEvent::SubmitGuess));
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Esc)), Some(UserEvent::CloseGuess));

        v.outcome = Outcome::Lose;
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Char('3'))), None);
        assert_eq!(interpret_event(&mut state, &v, key(KeyCode::Enter)), Some(UserEvent::CloseGuess));
    }
}
