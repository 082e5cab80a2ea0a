use super::events::poll_input;
use super::menu::{MenuState, Screen};
use super::TerminalManager;
use crate::audio::song::format_duration;
use crate::audio::PlaybackState;
use crate::controller::MenuController;
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

const INPUT_POLL: Duration = Duration::from_millis(50);
const FRAME_DELAY: Duration = Duration::from_millis(50);

pub struct App {
    terminal: TerminalManager,
    controller: MenuController,
    menu: MenuState,
}

impl App {
    pub fn new(controller: MenuController) -> Result<Self> {
        Ok(Self {
            terminal: TerminalManager::new()?,
            controller,
            menu: MenuState::new(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Input, player events and drawing all happen on this one task
        while !self.menu.should_quit {
            if let Some(input) = poll_input(INPUT_POLL)? {
                self.menu.handle_input(input, &mut self.controller);
            }

            self.controller.pump_events();
            self.render()?;

            sleep(FRAME_DELAY).await;
        }

        info!("Quitting");
        self.controller.stop();
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let menu = &self.menu;
        let controller = &self.controller;
        self.terminal.draw(|f| draw(f, menu, controller))
    }
}

fn draw(f: &mut Frame, menu: &MenuState, controller: &MenuController) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Current screen
            Constraint::Length(3), // Now playing
            Constraint::Length(3), // Status
        ])
        .split(f.area());

    let title = Paragraph::new("SoundTurner")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    if menu.screen == Screen::SearchPrompt {
        render_prompt(f, chunks[1], menu);
    } else {
        render_list(f, chunks[1], menu, controller);
    }

    render_now_playing(f, chunks[2], controller);

    let status = Paragraph::new(controller.status().unwrap_or(""))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[3]);
}

fn render_prompt(f: &mut Frame, area: Rect, menu: &MenuState) {
    let prompt = Paragraph::new(format!("> {}_", menu.query))
        .block(Block::default().borders(Borders::ALL).title(menu.screen.title()));
    f.render_widget(prompt, area);
}

fn render_list(f: &mut Frame, area: Rect, menu: &MenuState, controller: &MenuController) {
    let lines = menu.items(controller);
    let block = Block::default().borders(Borders::ALL).title(menu.screen.title());

    if lines.is_empty() {
        let empty = match menu.screen {
            Screen::Queue | Screen::RemoveFromQueue => "The queue is empty.",
            Screen::SearchResults => "No matches.",
            _ => "No music found.",
        };
        f.render_widget(Paragraph::new(empty).block(block), area);
        return;
    }

    let items: Vec<ListItem> = lines.into_iter().map(ListItem::new).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(menu.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_now_playing(f: &mut Frame, area: Rect, controller: &MenuController) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60), // Song + progress
            Constraint::Percentage(20), // Volume
            Constraint::Percentage(20), // Autoplay
        ])
        .split(area);

    let engine = controller.engine();
    let state_text = match engine.state() {
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
        PlaybackState::Stopped => "Stopped",
    };

    let label = match engine.current_song() {
        Some(song) => format!(
            "{} {} / {}",
            song.display_name(),
            format_duration(engine.position()),
            format_duration(engine.total_duration())
        ),
        None => "Nothing playing".to_string(),
    };

    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(state_text))
        .gauge_style(Style::default().fg(Color::Yellow))
        .ratio((engine.percentage() / 100.0).clamp(0.0, 1.0))
        .label(label);
    f.render_widget(progress, chunks[0]);

    let volume = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Volume"))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(engine.volume() as f64);
    f.render_widget(volume, chunks[1]);

    let autoplay = Paragraph::new(if controller.autoplay() { "On" } else { "Off" })
        .block(Block::default().borders(Borders::ALL).title("Autoplay"));
    f.render_widget(autoplay, chunks[2]);
}
