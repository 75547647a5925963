// Copyright (c) 2026 rezky_nightky

use crossterm::event::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    Fullscreen,
    Windowed,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Fullscreen => DisplayMode::Windowed,
            DisplayMode::Windowed => DisplayMode::Fullscreen,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneKind {
    /// Rain only
    #[value(name = "downpour")]
    Downpour,
    /// Rain, two shelters and a walker that gets wet
    #[value(name = "shelter")]
    Shelter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Walk,
    Run,
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleDisplay,
    Pause,
    Scene(Command),
}

impl KeyAction {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        let code = match code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        match code {
            KeyCode::Esc | KeyCode::Char('q') => Some(KeyAction::Quit),
            KeyCode::F(11) => Some(KeyAction::ToggleDisplay),
            KeyCode::Char('p') => Some(KeyAction::Pause),
            KeyCode::Char('w') => Some(KeyAction::Scene(Command::Walk)),
            KeyCode::Char('r') => Some(KeyAction::Scene(Command::Run)),
            KeyCode::Char(' ') => Some(KeyAction::Scene(Command::Reset)),
            _ => None,
        }
    }
}
