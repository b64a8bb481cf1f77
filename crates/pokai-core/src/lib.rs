//! Rules of the three-seat shedding game: cards, hand categorization, plays
//! and the round state machine.

pub mod model;

use model::card::ParseCardError;
use model::hand::InsufficientCards;
use model::play::InvalidPlay;
use model::round::MoveError;
use thiserror::Error;

/// Any failure raised by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseCardError),
    #[error(transparent)]
    InvalidPlay(#[from] InvalidPlay),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Hand(#[from] InsufficientCards),
}

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "pokai"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
