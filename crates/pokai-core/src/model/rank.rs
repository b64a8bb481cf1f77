use core::fmt;
use serde::{Deserialize, Serialize};

/// Card ranks in play order. Two outranks Ace and the jokers sit on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Three = 0,
    Four = 1,
    Five = 2,
    Six = 3,
    Seven = 4,
    Eight = 5,
    Nine = 6,
    Ten = 7,
    Jack = 8,
    Queen = 9,
    King = 10,
    Ace = 11,
    Two = 12,
    SmallJoker = 13,
    BigJoker = 14,
}

impl Rank {
    pub const COUNT: usize = 15;

    pub const ORDERED: [Rank; Rank::COUNT] = [
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
        Rank::Two,
        Rank::SmallJoker,
        Rank::BigJoker,
    ];

    /// Ranks that come in four suits, lowest first.
    pub const STANDARD: [Rank; 13] = [
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
        Rank::Two,
    ];

    /// Highest rank allowed inside a straight or double straight.
    pub const RUN_LIMIT: Rank = Rank::Ace;

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Rank::Three),
            1 => Some(Rank::Four),
            2 => Some(Rank::Five),
            3 => Some(Rank::Six),
            4 => Some(Rank::Seven),
            5 => Some(Rank::Eight),
            6 => Some(Rank::Nine),
            7 => Some(Rank::Ten),
            8 => Some(Rank::Jack),
            9 => Some(Rank::Queen),
            10 => Some(Rank::King),
            11 => Some(Rank::Ace),
            12 => Some(Rank::Two),
            13 => Some(Rank::SmallJoker),
            14 => Some(Rank::BigJoker),
            _ => None,
        }
    }

    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_joker(self) -> bool {
        matches!(self, Rank::SmallJoker | Rank::BigJoker)
    }

    /// Whether the rank may take part in a run of singles or pairs.
    pub const fn in_run_range(self) -> bool {
        self.value() <= Rank::RUN_LIMIT.value()
    }

    /// The rank directly above this one, if any.
    pub const fn successor(self) -> Option<Rank> {
        Rank::from_value(self.value() + 1)
    }

    /// Rank character used by the card token format (`0` stands for ten).
    /// Jokers share `Z` and are told apart by the second token character.
    pub const fn token_char(self) -> char {
        match self {
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => '0',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::SmallJoker | Rank::BigJoker => 'Z',
        }
    }

    /// Parses a non-joker rank character, ignoring case.
    pub fn from_token_char(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            '3' => Some(Rank::Three),
            '4' => Some(Rank::Four),
            '5' => Some(Rank::Five),
            '6' => Some(Rank::Six),
            '7' => Some(Rank::Seven),
            '8' => Some(Rank::Eight),
            '9' => Some(Rank::Nine),
            '0' => Some(Rank::Ten),
            'J' => Some(Rank::Jack),
            'Q' => Some(Rank::Queen),
            'K' => Some(Rank::King),
            'A' => Some(Rank::Ace),
            '2' => Some(Rank::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::SmallJoker => "joker",
            Rank::BigJoker => "JOKER",
        };
        f.write_str(text)
    }
}
