use gloom::HeldKeys;

/// Keys the client reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    Menu,
}

impl Key {
    /// Maps a keyboard character, case-insensitively: `WASD` move, `P` opens the menu.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'w' => Some(Self::Forward),
            's' => Some(Self::Backward),
            'a' => Some(Self::Left),
            'd' => Some(Self::Right),
            'p' => Some(Self::Menu),
            _ => None,
        }
    }

    /// Movement flag for this key, `None` for non-movement keys.
    pub fn held_flag(self) -> Option<HeldKeys> {
        match self {
            Self::Forward => Some(HeldKeys::FORWARD),
            Self::Backward => Some(HeldKeys::BACKWARD),
            Self::Left => Some(HeldKeys::LEFT),
            Self::Right => Some(HeldKeys::RIGHT),
            Self::Menu => None,
        }
    }
}

/// Sets or clears the flag for `key`. Returns `true` if the held set changed.
pub fn apply_key(keys: &mut HeldKeys, key: Key, pressed: bool) -> bool {
    let Some(flag) = key.held_flag() else {
        return false;
    };
    let before = *keys;
    keys.set(flag, pressed);
    *keys != before
}
