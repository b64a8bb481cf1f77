use core::fmt;
use serde::{Deserialize, Serialize};

pub const PLAYER_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerPosition {
    First = 0,
    Second = 1,
    Third = 2,
}

impl PlayerPosition {
    pub const LOOP: [PlayerPosition; PLAYER_COUNT] = [
        PlayerPosition::First,
        PlayerPosition::Second,
        PlayerPosition::Third,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerPosition::First),
            1 => Some(PlayerPosition::Second),
            2 => Some(PlayerPosition::Third),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> PlayerPosition {
        match self {
            PlayerPosition::First => PlayerPosition::Second,
            PlayerPosition::Second => PlayerPosition::Third,
            PlayerPosition::Third => PlayerPosition::First,
        }
    }

    pub const fn previous(self) -> PlayerPosition {
        match self {
            PlayerPosition::First => PlayerPosition::Third,
            PlayerPosition::Second => PlayerPosition::First,
            PlayerPosition::Third => PlayerPosition::Second,
        }
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.index())
    }
}
