// Which screen we're on and where the cursor is
// Rendering lives in app.rs; everything here can be driven without a terminal

use super::events::MenuInput;
use crate::audio::Song;
use crate::controller::{MenuController, VOLUME_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    PlayNext,
    TogglePause,
    Stop,
    AddFromLibrary,
    SearchLibrary,
    RemoveFromQueue,
    ClearQueue,
    ViewQueue,
    VolumeUp,
    VolumeDown,
    ToggleAutoplay,
    Quit,
}

pub const MAIN_MENU: [MenuAction; 12] = [
    MenuAction::PlayNext,
    MenuAction::TogglePause,
    MenuAction::Stop,
    MenuAction::AddFromLibrary,
    MenuAction::SearchLibrary,
    MenuAction::RemoveFromQueue,
    MenuAction::ClearQueue,
    MenuAction::ViewQueue,
    MenuAction::VolumeUp,
    MenuAction::VolumeDown,
    MenuAction::ToggleAutoplay,
    MenuAction::Quit,
];

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::PlayNext => "Play next in queue",
            MenuAction::TogglePause => "Pause / Resume",
            MenuAction::Stop => "Stop",
            MenuAction::AddFromLibrary => "Add song from library",
            MenuAction::SearchLibrary => "Search library",
            MenuAction::RemoveFromQueue => "Remove song from queue",
            MenuAction::ClearQueue => "Clear the queue",
            MenuAction::ViewQueue => "View the current queue",
            MenuAction::VolumeUp => "Volume up",
            MenuAction::VolumeDown => "Volume down",
            MenuAction::ToggleAutoplay => "Toggle autoplay",
            MenuAction::Quit => "Quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Library,
    SearchPrompt,
    SearchResults,
    Queue,
    RemoveFromQueue,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::MainMenu => "Menu",
            Screen::Library => "Library - Enter adds to queue, r rescans, Esc goes back",
            Screen::SearchPrompt => "Search - type, Enter to search, Esc goes back",
            Screen::SearchResults => "Results - Enter adds to queue, Esc edits the search",
            Screen::Queue => "Current queue - Esc goes back",
            Screen::RemoveFromQueue => "Remove - Enter removes, Esc goes back",
        }
    }
}

#[derive(Debug)]
pub struct MenuState {
    pub screen: Screen,
    pub selected: usize,
    pub query: String,
    pub results: Vec<Song>,
    pub should_quit: bool,
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            screen: Screen::MainMenu,
            selected: 0,
            query: String::new(),
            results: Vec::new(),
            should_quit: false,
        }
    }

    /// Lines shown for the current screen's list
    pub fn items(&self, controller: &MenuController) -> Vec<String> {
        match self.screen {
            Screen::MainMenu => MAIN_MENU.iter().map(|a| a.label().to_string()).collect(),
            Screen::Library => song_lines(controller.library()),
            Screen::SearchPrompt => Vec::new(),
            Screen::SearchResults => song_lines(&self.results),
            Screen::Queue | Screen::RemoveFromQueue => song_lines(&controller.queue().snapshot())
                .into_iter()
                .enumerate()
                .map(|(i, line)| format!("{:>3}. {}", i + 1, line))
                .collect(),
        }
    }

    pub fn handle_input(&mut self, input: MenuInput, controller: &mut MenuController) {
        if input == MenuInput::Quit {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::MainMenu => match input {
                MenuInput::Enter => {
                    if let Some(action) = MAIN_MENU.get(self.selected).copied() {
                        self.run(action, controller);
                    }
                }
                MenuInput::Char('q') => self.should_quit = true,
                other => self.navigate(other, MAIN_MENU.len()),
            },
            Screen::Library => match input {
                MenuInput::Enter => {
                    if let Some(song) = controller.library().get(self.selected).cloned() {
                        controller.enqueue(song);
                    }
                }
                MenuInput::Char('r') => {
                    let len = controller.refresh_library().len();
                    self.clamp(len);
                }
                MenuInput::Back => self.go(Screen::MainMenu),
                other => self.navigate(other, controller.library().len()),
            },
            Screen::SearchPrompt => match input {
                MenuInput::Char(c) => self.query.push(c),
                MenuInput::Backspace => {
                    self.query.pop();
                }
                MenuInput::Enter => {
                    self.results = controller.search(self.query.trim());
                    self.go(Screen::SearchResults);
                }
                MenuInput::Back => self.go(Screen::MainMenu),
                _ => {}
            },
            Screen::SearchResults => match input {
                MenuInput::Enter => {
                    if let Some(song) = self.results.get(self.selected).cloned() {
                        controller.enqueue(song);
                    }
                }
                MenuInput::Back => self.go(Screen::SearchPrompt),
                other => self.navigate(other, self.results.len()),
            },
            Screen::Queue => match input {
                MenuInput::Back | MenuInput::Enter => self.go(Screen::MainMenu),
                other => self.navigate(other, controller.queue().len()),
            },
            Screen::RemoveFromQueue => match input {
                MenuInput::Enter => {
                    controller.remove_at(self.selected);
                    self.clamp(controller.queue().len());
                }
                MenuInput::Back => self.go(Screen::MainMenu),
                other => self.navigate(other, controller.queue().len()),
            },
        }
    }

    fn run(&mut self, action: MenuAction, controller: &mut MenuController) {
        match action {
            MenuAction::PlayNext => {
                controller.play_next();
            }
            MenuAction::TogglePause => controller.toggle_pause(),
            MenuAction::Stop => controller.stop(),
            MenuAction::AddFromLibrary => {
                if controller.library().is_empty() {
                    controller.refresh_library();
                }
                self.go(Screen::Library);
            }
            MenuAction::SearchLibrary => {
                if controller.library().is_empty() {
                    controller.refresh_library();
                }
                self.query.clear();
                self.go(Screen::SearchPrompt);
            }
            MenuAction::RemoveFromQueue => self.go(Screen::RemoveFromQueue),
            MenuAction::ClearQueue => controller.clear_queue(),
            MenuAction::ViewQueue => self.go(Screen::Queue),
            MenuAction::VolumeUp => controller.adjust_volume(VOLUME_STEP),
            MenuAction::VolumeDown => controller.adjust_volume(-VOLUME_STEP),
            MenuAction::ToggleAutoplay => {
                controller.toggle_autoplay();
            }
            MenuAction::Quit => self.should_quit = true,
        }
    }

    fn go(&mut self, screen: Screen) {
        self.screen = screen;
        self.selected = 0;
    }

    fn navigate(&mut self, input: MenuInput, len: usize) {
        match input {
            MenuInput::Up => self.selected = self.selected.saturating_sub(1),
            MenuInput::Down => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            _ => {}
        }
    }

    fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

fn song_lines(songs: &[Song]) -> Vec<String> {
    songs
        .iter()
        .map(|song| format!("{}  [{}]", song.display_name(), song.display_duration()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{LibraryScanner, PlaybackEngine};
    use std::path::Path;
    use tempfile::TempDir;

    fn controller(dir: &Path) -> MenuController {
        for name in ["Alpha.mp3", "Beta.wav", "Gamma.m4a"] {
            std::fs::write(dir.join(name), b"x").unwrap();
        }
        MenuController::new(PlaybackEngine::without_output(), LibraryScanner::new(dir), true)
    }

    fn select(menu: &mut MenuState, controller: &mut MenuController, action: MenuAction) {
        let index = MAIN_MENU.iter().position(|a| *a == action).unwrap();
        menu.go(Screen::MainMenu);
        for _ in 0..index {
            menu.handle_input(MenuInput::Down, controller);
        }
        menu.handle_input(MenuInput::Enter, controller);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let dir = TempDir::new().unwrap();
        let mut controller = controller(dir.path());
        let mut menu = MenuState::new();

        menu.handle_input(MenuInput::Up, &mut controller);
        assert_eq!(menu.selected, 0);
        for _ in 0..50 {
            menu.handle_input(MenuInput::Down, &mut controller);
        }
        assert_eq!(menu.selected, MAIN_MENU.len() - 1);
    }

    #[test]
    fn test_add_from_library_then_remove() {
        let dir = TempDir::new().unwrap();
        let mut controller = controller(dir.path());
        let mut menu = MenuState::new();

        select(&mut menu, &mut controller, MenuAction::AddFromLibrary);
        assert_eq!(menu.screen, Screen::Library);
        assert_eq!(controller.library().len(), 3);

        menu.handle_input(MenuInput::Enter, &mut controller);
        menu.handle_input(MenuInput::Down, &mut controller);
        menu.handle_input(MenuInput::Enter, &mut controller);
        assert_eq!(controller.queue().len(), 2);

        menu.handle_input(MenuInput::Back, &mut controller);
        select(&mut menu, &mut controller, MenuAction::RemoveFromQueue);
        assert_eq!(menu.items(&controller).len(), 2);

        menu.handle_input(MenuInput::Down, &mut controller);
        menu.handle_input(MenuInput::Enter, &mut controller);
        assert_eq!(controller.queue().len(), 1);
        assert_eq!(menu.selected, 0);

        // Cursor on a now-missing row removes nothing
        menu.selected = 4;
        menu.handle_input(MenuInput::Enter, &mut controller);
        assert_eq!(controller.queue().len(), 1);
    }

    #[test]
    fn test_search_flow() {
        let dir = TempDir::new().unwrap();
        let mut controller = controller(dir.path());
        let mut menu = MenuState::new();

        select(&mut menu, &mut controller, MenuAction::SearchLibrary);
        assert_eq!(menu.screen, Screen::SearchPrompt);

        for c in "GAMX".chars() {
            menu.handle_input(MenuInput::Char(c), &mut controller);
        }
        menu.handle_input(MenuInput::Backspace, &mut controller);
        menu.handle_input(MenuInput::Enter, &mut controller);

        assert_eq!(menu.screen, Screen::SearchResults);
        assert_eq!(menu.results.len(), 1);
        assert_eq!(menu.results[0].title(), "Gamma");

        menu.handle_input(MenuInput::Enter, &mut controller);
        assert_eq!(controller.queue().snapshot()[0].title(), "Gamma");
    }

    #[test]
    fn test_play_without_device_reports_status() {
        let dir = TempDir::new().unwrap();
        let mut controller = controller(dir.path());
        let mut menu = MenuState::new();

        select(&mut menu, &mut controller, MenuAction::PlayNext);
        assert_eq!(controller.status(), Some("The queue is empty!"));

        select(&mut menu, &mut controller, MenuAction::AddFromLibrary);
        menu.handle_input(MenuInput::Enter, &mut controller);
        select(&mut menu, &mut controller, MenuAction::PlayNext);

        assert!(controller.status().unwrap().contains("No audio output device"));
        assert!(controller.queue().is_empty());
        assert!(!controller.engine().is_playing());
    }

    #[test]
    fn test_clear_queue_empties_it() {
        let dir = TempDir::new().unwrap();
        let mut controller = controller(dir.path());
        let mut menu = MenuState::new();

        select(&mut menu, &mut controller, MenuAction::AddFromLibrary);
        menu.handle_input(MenuInput::Enter, &mut controller);
        menu.handle_input(MenuInput::Enter, &mut controller);
        assert_eq!(controller.queue().len(), 2);

        menu.handle_input(MenuInput::Back, &mut controller);
        select(&mut menu, &mut controller, MenuAction::ClearQueue);

        assert_eq!(menu.screen, Screen::MainMenu);
        assert!(controller.queue().is_empty());
        assert_eq!(controller.status(), Some("Cleared 2 songs from the queue"));
    }

    #[test]
    fn test_quit() {
        let dir = TempDir::new().unwrap();
        let mut controller = controller(dir.path());

        let mut menu = MenuState::new();
        menu.handle_input(MenuInput::Char('q'), &mut controller);
        assert!(menu.should_quit);

        let mut menu = MenuState::new();
        select(&mut menu, &mut controller, MenuAction::Quit);
        assert!(menu.should_quit);

        // Typing q into the search box is just a letter
        let mut menu = MenuState::new();
        menu.screen = Screen::SearchPrompt;
        menu.handle_input(MenuInput::Char('q'), &mut controller);
        assert!(!menu.should_quit);
        assert_eq!(menu.query, "q");
    }
}
