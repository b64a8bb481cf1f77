use core::fmt;
use serde::{Deserialize, Serialize};

/// Combination families a play can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Family {
    Single = 0,
    Double = 1,
    Triple = 2,
    Quadruple = 3,
    Straight = 4,
    DoubleStraight = 5,
    AdjacentTriple = 6,
    DoubleJoker = 7,
}

impl Family {
    pub const COUNT: usize = 8;

    pub const ALL: [Family; Family::COUNT] = [
        Family::Single,
        Family::Double,
        Family::Triple,
        Family::Quadruple,
        Family::Straight,
        Family::DoubleStraight,
        Family::AdjacentTriple,
        Family::DoubleJoker,
    ];

    /// Strongest lead first; bombs come last.
    pub const LEAD_PRIORITY: [Family; Family::COUNT] = [
        Family::AdjacentTriple,
        Family::DoubleStraight,
        Family::Straight,
        Family::Triple,
        Family::Double,
        Family::Single,
        Family::Quadruple,
        Family::DoubleJoker,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Families whose bare form beats any other family.
    pub const fn is_bomb(self) -> bool {
        matches!(self, Family::Quadruple | Family::DoubleJoker)
    }

    /// Basic family holding `count` equal-rank cards.
    pub const fn of_equal_rank(count: usize) -> Option<Family> {
        match count {
            1 => Some(Family::Single),
            2 => Some(Family::Double),
            3 => Some(Family::Triple),
            4 => Some(Family::Quadruple),
            _ => None,
        }
    }

    /// Cards per rank in the foundation.
    pub const fn each_count(self) -> usize {
        match self {
            Family::Single | Family::Straight | Family::DoubleJoker => 1,
            Family::Double | Family::DoubleStraight => 2,
            Family::Triple | Family::AdjacentTriple => 3,
            Family::Quadruple => 4,
        }
    }

    /// Legal attachment card counts, bare first.
    pub const fn attachment_counts(self) -> &'static [usize] {
        match self {
            Family::Triple => &[0, 1, 2],
            Family::AdjacentTriple | Family::Quadruple => &[0, 2, 4],
            _ => &[0],
        }
    }

    /// Number of attachment groups (singles or pairs) the family carries.
    pub const fn attachment_groups(self) -> usize {
        match self {
            Family::Triple => 1,
            Family::AdjacentTriple | Family::Quadruple => 2,
            _ => 0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Family::Single => "single",
            Family::Double => "double",
            Family::Triple => "triple",
            Family::Quadruple => "quadruple",
            Family::Straight => "straight",
            Family::DoubleStraight => "double_straight",
            Family::AdjacentTriple => "adjacent_triple",
            Family::DoubleJoker => "double_joker",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
