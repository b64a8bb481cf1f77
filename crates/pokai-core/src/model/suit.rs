use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Spades = 2,
    Clubs = 3,
    /// Carried by the two jokers only.
    Joker = 4,
}

impl Suit {
    pub const STANDARD: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Spades, Suit::Clubs];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Hearts),
            1 => Some(Suit::Diamonds),
            2 => Some(Suit::Spades),
            3 => Some(Suit::Clubs),
            4 => Some(Suit::Joker),
            _ => None,
        }
    }

    pub const fn is_joker(self) -> bool {
        matches!(self, Suit::Joker)
    }

    pub const fn token_char(self) -> Option<char> {
        match self {
            Suit::Hearts => Some('h'),
            Suit::Diamonds => Some('d'),
            Suit::Spades => Some('s'),
            Suit::Clubs => Some('c'),
            Suit::Joker => None,
        }
    }

    pub fn from_token_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'h' => Some(Suit::Hearts),
            'd' => Some(Suit::Diamonds),
            's' => Some(Suit::Spades),
            'c' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Hearts => "\u{2665}",
            Suit::Diamonds => "\u{2666}",
            Suit::Spades => "\u{2660}",
            Suit::Clubs => "\u{2663}",
            Suit::Joker => "",
        };
        f.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Suit::from_index(2), Some(Suit::Spades));
        assert_eq!(Suit::from_index(5), None);
    }

    #[test]
    fn token_chars_round_trip_ignoring_case() {
        for suit in Suit::STANDARD {
            let ch = suit.token_char().unwrap();
            assert_eq!(Suit::from_token_char(ch.to_ascii_uppercase()), Some(suit));
        }
        assert_eq!(Suit::Joker.token_char(), None);
        assert_eq!(Suit::from_token_char('x'), None);
    }
}
