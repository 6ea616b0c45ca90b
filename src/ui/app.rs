use anyhow::Result;
use crossterm::event::KeyCode;
use log::{info, warn};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{fetch_coins, toggle_collected};
use crate::importer::SeedOutcome;
use crate::models::Coin;

use super::helpers::{centered_rect, coin_row_line, surface_error};
use super::screens::CoinListScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Header space for the title, progress and filter lines.
const HEADER_HEIGHT: u16 = 4;
/// Rows skipped by PgUp/PgDn.
const PAGE_STEP: isize = 10;

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    conn: Connection,
    screen: CoinListScreen,
    status: Option<StatusMessage>,
    show_help: bool,
}

impl App {
    pub fn new(conn: Connection, coins: Vec<Coin>) -> Self {
        Self {
            conn,
            screen: CoinListScreen::new(coins),
            status: None,
            show_help: false,
        }
    }

    /// Put the outcome of the startup import into the footer.
    pub fn report_seed(&mut self, outcome: &SeedOutcome) {
        match outcome {
            SeedOutcome::AlreadyPopulated => {}
            SeedOutcome::Seeded(report) => {
                let failed: Vec<&str> = report
                    .failures()
                    .map(|outcome| outcome.name.as_str())
                    .collect();
                if !report.committed {
                    self.set_status("Could not save the reference coins.", StatusKind::Error);
                } else if failed.is_empty() {
                    self.set_status(
                        format!("Loaded {} reference coins.", report.inserted()),
                        StatusKind::Info,
                    );
                } else {
                    self.set_status(
                        format!(
                            "Loaded {} reference coins; skipped {}.",
                            report.inserted(),
                            failed.join(", ")
                        ),
                        StatusKind::Error,
                    );
                }
            }
            SeedOutcome::ProbeFailed(err) => self.set_status(
                format!("Could not check the collection: {}", surface_error(err)),
                StatusKind::Error,
            ),
        }
    }

    /// Process one key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if self.show_help {
            if matches!(code, KeyCode::Char('q')) {
                return Ok(true);
            }
            self.show_help = false;
            return Ok(false);
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up | KeyCode::Char('k') => self.screen.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.screen.move_selection(1),
            KeyCode::PageUp => self.screen.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.screen.move_selection(PAGE_STEP),
            KeyCode::Home | KeyCode::Char('g') => self.screen.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.screen.select_last(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current(),
            KeyCode::Char('m') => {
                let active = self.screen.toggle_missing_only();
                let message = if active {
                    "Showing missing coins only."
                } else {
                    "Showing all coins."
                };
                self.set_status(message, StatusKind::Info);
            }
            KeyCode::Char('r') => {
                let focus = self.screen.current_coin().map(|coin| coin.id);
                if self.refresh(focus) {
                    self.set_status("Reloaded collection.", StatusKind::Info);
                }
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }

        Ok(false)
    }

    /// Flip the selected coin in the store, then pull a fresh snapshot so the
    /// list reflects what was written.
    fn toggle_current(&mut self) {
        let Some(coin) = self.screen.current_coin().cloned() else {
            self.set_status("No coin selected.", StatusKind::Error);
            return;
        };

        match toggle_collected(&self.conn, coin.id) {
            Ok(collected) => {
                info!(
                    "event=coin_toggle status=ok id={} collected={}",
                    coin.id, collected
                );
                if self.refresh(Some(coin.id)) {
                    let verb = if collected { "Collected" } else { "Unmarked" };
                    self.set_status(
                        format!("{verb} {}.", coin.display_title()),
                        StatusKind::Info,
                    );
                }
            }
            Err(err) => {
                warn!(
                    "event=coin_toggle status=error id={} error={err:#}",
                    coin.id
                );
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    /// Reload the sorted snapshot. Errors land in the footer and the previous
    /// snapshot stays on screen.
    fn refresh(&mut self, focus: Option<Uuid>) -> bool {
        match fetch_coins(&self.conn) {
            Ok(coins) => {
                self.screen.set_coins(coins, focus);
                true
            }
            Err(err) => {
                self.set_status(surface_error(&err), StatusKind::Error);
                false
            }
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_coin_list(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if self.show_help {
            self.draw_help(frame, area);
        }
    }

    fn draw_coin_list(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(1)])
            .split(area);

        let total = self.screen.coins.len();
        let collected = self.screen.collected_count();
        let filter_line = if self.screen.missing_only {
            Line::from(vec![
                Span::styled(
                    "Missing-only filter active",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    " - showing {} coins still to find",
                    self.screen.visible.len()
                )),
            ])
        } else {
            Line::from(Span::raw(format!("Showing all {total} coins")))
        };

        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Collected ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("{collected} of {total}"),
                    Style::default().fg(Color::Green),
                ),
            ]),
            filter_line,
        ])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("CoinMark"));
        frame.render_widget(header, chunks[0]);

        if self.screen.visible.is_empty() {
            let message_text = if total == 0 {
                "No coins yet."
            } else if self.screen.missing_only {
                "Every coin is collected."
            } else {
                "No coins to display."
            };
            let message = Paragraph::new(message_text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Coins"));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = self
            .screen
            .visible
            .iter()
            .map(|coin| ListItem::new(coin_row_line(coin)))
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Coins"))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.screen.selected));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup_area);

        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let row = |keys: &'static str, action: &'static str| {
            Line::from(vec![
                Span::styled(format!("{keys:<14}"), key_style),
                Span::raw(action),
            ])
        };
        let lines = vec![
            row("↑/↓  k/j", "Move selection"),
            row("PgUp/PgDn", "Move a page"),
            row("Home/End", "First / last coin"),
            row("Space/Enter", "Toggle collected"),
            row("m", "Toggle missing-only filter"),
            row("r", "Reload from disk"),
            row("q/Esc", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to close.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Keys"))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }
}

fn footer_instructions() -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled("[↑↓]", key_style),
        Span::raw(" Select   "),
        Span::styled("[Space]", key_style),
        Span::raw(" Toggle   "),
        Span::styled("[m]", key_style),
        Span::raw(" Missing Only   "),
        Span::styled("[?]", key_style),
        Span::raw(" Help   "),
        Span::styled("[q]", key_style),
        Span::raw(" Quit"),
    ])
}
