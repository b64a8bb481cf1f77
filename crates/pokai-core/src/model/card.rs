use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A single card. Ordered by rank first; suit only breaks ties.
///
/// The text token (`3h`, `0d`, `Qs`, `Z0`, `Z1`) is the only serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub const SMALL_JOKER: Card = Card::new(Rank::SmallJoker, Suit::Joker);
    pub const BIG_JOKER: Card = Card::new(Rank::BigJoker, Suit::Joker);

    /// Builds a card from trusted parts. Joker ranks must carry [`Suit::Joker`]
    /// and standard ranks a standard suit; callers outside the crate go
    /// through [`Card::try_new`] or a token.
    pub(crate) const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn try_new(rank: Rank, suit: Suit) -> Result<Self, ParseCardError> {
        let card = Self::new(rank, suit);
        if card.is_valid() {
            Ok(card)
        } else {
            Err(ParseCardError::InvalidCardToken(format!("{rank:?} of {suit:?}")))
        }
    }

    pub const fn rank(self) -> Rank {
        self.rank
    }

    pub const fn suit(self) -> Suit {
        self.suit
    }

    pub const fn is_joker(self) -> bool {
        self.rank.is_joker()
    }

    pub const fn is_valid(self) -> bool {
        self.rank.is_joker() == self.suit.is_joker()
    }

    /// Human-facing label such as `♥10` or `JOKER`.
    pub fn label(self) -> String {
        if self.is_joker() {
            self.rank.to_string()
        } else {
            format!("{}{}", self.suit, self.rank)
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            Rank::SmallJoker => f.write_str("Z0"),
            Rank::BigJoker => f.write_str("Z1"),
            rank => {
                let suit = self.suit.token_char().unwrap_or('?');
                write!(f, "{}{}", rank.token_char(), suit)
            }
        }
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseCardError::InvalidCardToken(token.to_string());
        let mut chars = token.trim().chars();
        let (Some(rank_ch), Some(suit_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(invalid());
        };

        if rank_ch.eq_ignore_ascii_case(&'z') {
            return match suit_ch {
                '0' => Ok(Card::SMALL_JOKER),
                '1' => Ok(Card::BIG_JOKER),
                _ => Err(invalid()),
            };
        }

        let rank = Rank::from_token_char(rank_ch).ok_or_else(invalid)?;
        let suit = Suit::from_token_char(suit_ch).ok_or_else(invalid)?;
        Ok(Card::new(rank, suit))
    }
}

impl TryFrom<String> for Card {
    type Error = ParseCardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

/// Parses whitespace- or comma-separated card tokens.
pub fn parse_cards(text: &str) -> Result<Vec<Card>, ParseCardError> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

/// Joins cards into their token form, separated by single spaces.
pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    #[error("invalid card token '{0}'")]
    InvalidCardToken(String),
}
