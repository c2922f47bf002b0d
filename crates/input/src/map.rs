//! Key mapping from terminal events to session commands.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::types::GameAction;

/// Configurable key bindings.
///
/// Arrow keys always move left/right and soft-drop; the up arrow rotates in
/// the direction picked by `up_turns_right`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub rotate_left: char,
    pub rotate_right: char,
    pub hard_drop: char,
    pub play_toggle: char,
    pub new_game: char,
    pub up_turns_right: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            rotate_left: 'd',
            rotate_right: 'f',
            hard_drop: ' ',
            play_toggle: 'p',
            new_game: 'n',
            up_turns_right: false,
        }
    }
}

/// What a key press asks the runner to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCommand {
    /// Queue an action on the session
    Game(GameAction),
    /// Start, pause or resume
    TogglePlay,
    /// Reset and start over
    NewGame,
}

/// Translates key events according to [`Controls`]
#[derive(Debug, Clone)]
pub struct KeyMap {
    controls: Controls,
    slide_fast: bool,
}

impl KeyMap {
    /// `slide_fast` lets a held soft-drop key keep dropping on key repeat.
    pub fn new(controls: Controls, slide_fast: bool) -> Self {
        Self {
            controls,
            slide_fast,
        }
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Map a key event to a command.
    ///
    /// Releases are ignored. Repeats only move sideways, plus soft drop when
    /// `slide_fast` is set.
    pub fn map(&self, key: KeyEvent) -> Option<InputCommand> {
        let command = self.command_for(key.code)?;
        match key.kind {
            KeyEventKind::Press => Some(command),
            KeyEventKind::Release => None,
            KeyEventKind::Repeat => match command {
                InputCommand::Game(GameAction::MoveLeft | GameAction::MoveRight) => Some(command),
                InputCommand::Game(GameAction::SoftDrop) if self.slide_fast => Some(command),
                _ => None,
            },
        }
    }

    fn command_for(&self, code: KeyCode) -> Option<InputCommand> {
        let game = |action| Some(InputCommand::Game(action));
        match code {
            KeyCode::Left => game(GameAction::MoveLeft),
            KeyCode::Right => game(GameAction::MoveRight),
            KeyCode::Down => game(GameAction::SoftDrop),
            KeyCode::Up if self.controls.up_turns_right => game(GameAction::RotateCw),
            KeyCode::Up => game(GameAction::RotateCcw),
            KeyCode::Char(c) => {
                let c = c.to_ascii_lowercase();
                let bound = |b: char| b.to_ascii_lowercase() == c;
                if bound(self.controls.rotate_left) {
                    game(GameAction::RotateCcw)
                } else if bound(self.controls.rotate_right) {
                    game(GameAction::RotateCw)
                } else if bound(self.controls.hard_drop) {
                    game(GameAction::HardDrop)
                } else if bound(self.controls.play_toggle) {
                    Some(InputCommand::TogglePlay)
                } else if bound(self.controls.new_game) {
                    Some(InputCommand::NewGame)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new(Controls::default(), false)
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
