use std::fmt;

use gloom::render::{ALPHA_DIMMED, ALPHA_OPAQUE};

/// Top-level view the client is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Loading,
    Waiting,
    Game,
    Pause,
    Over {
        dead: bool,
    },
    Error,
}

impl Screen {
    /// Alpha mask for the 3D view: only live play is drawn opaque.
    pub fn alpha(self) -> u8 {
        match self {
            Self::Game => ALPHA_OPAQUE,
            Self::Loading | Self::Waiting | Self::Pause | Self::Over { .. } | Self::Error => {
                ALPHA_DIMMED
            }
        }
    }

    /// Screens that label the corner with the game id for sharing.
    pub fn shows_game_id(self) -> bool {
        matches!(self, Self::Loading | Self::Waiting | Self::Pause)
    }

    pub fn is_over(self) -> bool {
        matches!(self, Self::Over { .. })
    }

    /// Whether the session is finished from the player's point of view.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Over { .. } | Self::Error)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Waiting => "waiting",
            Self::Game => "game",
            Self::Pause => "pause",
            Self::Over { dead: true } => "defeat",
            Self::Over { dead: false } => "victory",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
