use crate::model::card::{Card, format_cards};
use crate::model::family::Family;
use crate::model::player::PlayerPosition;
use crate::model::rank::Rank;
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A concrete set of cards discarded together.
///
/// Cards are stored foundation first (ascending) followed by the attachment
/// cards; the first card is the base card used for comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PlayRecord")]
pub struct Play {
    actor: Option<PlayerPosition>,
    family: Family,
    cards: Vec<Card>,
    attachments: usize,
}

impl Play {
    /// Assembles a play from parts already known to satisfy the family's shape.
    pub(crate) fn from_parts(family: Family, foundation: &[Card], attachments: &[Card]) -> Self {
        debug_assert!(!foundation.is_empty());
        let mut cards = Vec::with_capacity(foundation.len() + attachments.len());
        cards.extend_from_slice(foundation);
        cards.extend_from_slice(attachments);
        Self {
            actor: None,
            family,
            cards,
            attachments: attachments.len(),
        }
    }

    /// Determines the unique family matching `cards`.
    pub fn classify(cards: &[Card]) -> Result<Play, InvalidPlay> {
        let mut sorted = cards.to_vec();
        sorted.sort();
        if sorted.is_empty() {
            return Err(InvalidPlay::Empty);
        }
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(InvalidPlay::DuplicateCard(pair[0]));
        }

        let groups: Vec<&[Card]> = sorted.chunk_by(|a, b| a.rank() == b.rank()).collect();
        let (family, foundation, attachments) = match_shape(&sorted, &groups)
            .ok_or_else(|| InvalidPlay::NoMatchingShape(format_cards(&sorted)))?;
        Ok(Self::from_parts(family, &foundation, &attachments))
    }

    /// Returns the same play attributed to `seat`.
    pub fn with_actor(mut self, seat: PlayerPosition) -> Self {
        self.actor = Some(seat);
        self
    }

    pub fn actor(&self) -> Option<PlayerPosition> {
        self.actor
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of attachment cards riding along with the foundation.
    pub fn attachments(&self) -> usize {
        self.attachments
    }

    pub fn foundation(&self) -> &[Card] {
        &self.cards[..self.foundation_len()]
    }

    pub fn attachment_cards(&self) -> &[Card] {
        &self.cards[self.foundation_len()..]
    }

    pub fn foundation_len(&self) -> usize {
        self.cards.len() - self.attachments
    }

    pub fn base_card(&self) -> Card {
        self.cards[0]
    }

    pub fn base_rank(&self) -> Rank {
        self.base_card().rank()
    }

    /// Bare quadruples and the double joker beat any other family.
    pub fn is_bomb(&self) -> bool {
        match self.family {
            Family::DoubleJoker => true,
            Family::Quadruple => self.attachments == 0,
            _ => false,
        }
    }

    /// Whether this play may be laid on top of `previous`.
    pub fn beats(&self, previous: &Play) -> bool {
        match (self.family, previous.family) {
            (Family::DoubleJoker, Family::DoubleJoker) => return false,
            (Family::DoubleJoker, _) => return true,
            (_, Family::DoubleJoker) => return false,
            _ => {}
        }

        if self.is_bomb() {
            return !previous.is_bomb() || self.base_rank() > previous.base_rank();
        }

        self.family == previous.family
            && self.attachments == previous.attachments
            && self.foundation_len() == previous.foundation_len()
            && self.base_rank() > previous.base_rank()
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(actor) = self.actor {
            write!(f, "{actor}: ")?;
        }
        write!(f, "{}", self.family)?;
        if self.attachments > 0 {
            write!(f, "+{}", self.attachments)?;
        }
        write!(f, " [{}]", format_cards(&self.cards))
    }
}

/// Wire form read back through [`Play::classify`]; `family` and
/// `attachments` are recomputed from the cards.
#[derive(Deserialize)]
struct PlayRecord {
    #[serde(default)]
    actor: Option<PlayerPosition>,
    cards: Vec<Card>,
}

impl TryFrom<PlayRecord> for Play {
    type Error = InvalidPlay;

    fn try_from(record: PlayRecord) -> Result<Self, Self::Error> {
        let play = Play::classify(&record.cards)?;
        Ok(match record.actor {
            Some(seat) => play.with_actor(seat),
            None => play,
        })
    }
}

type Shape = (Family, Vec<Card>, Vec<Card>);

fn match_shape(sorted: &[Card], groups: &[&[Card]]) -> Option<Shape> {
    let bare = |family: Family| Some((family, sorted.to_vec(), Vec::new()));

    match sorted.len() {
        1 => return bare(Family::Single),
        2 if sorted.iter().all(|card| card.is_joker()) => return bare(Family::DoubleJoker),
        _ => {}
    }

    if groups.len() == 1 {
        return Family::of_equal_rank(sorted.len()).and_then(bare);
    }

    if is_run(groups, 1, 5) {
        return bare(Family::Straight);
    }
    if is_run(groups, 2, 3) {
        return bare(Family::DoubleStraight);
    }

    let (heavy, light): (Vec<&[Card]>, Vec<&[Card]>) =
        groups.iter().copied().partition(|group| group.len() >= 3);

    match heavy.as_slice() {
        [triple] if triple.len() == 3 => {
            let attachments = attachment_cards(&light, 1)?;
            Some((Family::Triple, triple.to_vec(), attachments))
        }
        [quad] if quad.len() == 4 => {
            let attachments = attachment_cards(&light, 2)?;
            Some((Family::Quadruple, quad.to_vec(), attachments))
        }
        [low, high]
            if low.len() == 3
                && high.len() == 3
                && low[0].rank().successor() == Some(high[0].rank()) =>
        {
            let attachments = attachment_cards(&light, 2)?;
            let mut foundation = low.to_vec();
            foundation.extend_from_slice(high);
            Some((Family::AdjacentTriple, foundation, attachments))
        }
        _ => None,
    }
}

/// `groups` form a run of at least `min_len` consecutive ranks, each held
/// exactly `each` times, none above the run limit.
fn is_run(groups: &[&[Card]], each: usize, min_len: usize) -> bool {
    groups.len() >= min_len
        && groups.iter().all(|group| group.len() == each && group[0].rank().in_run_range())
        && groups
            .windows(2)
            .all(|pair| pair[0][0].rank().successor() == Some(pair[1][0].rank()))
}

/// Attachment cards made of exactly `count` groups that are all singles or
/// all pairs. A family taking one group may also go bare.
fn attachment_cards(light: &[&[Card]], count: usize) -> Option<Vec<Card>> {
    if light.is_empty() {
        return Some(Vec::new());
    }
    if light.len() != count {
        return None;
    }
    let size = light[0].len();
    if !(1..=2).contains(&size) || light.iter().any(|group| group.len() != size) {
        return None;
    }
    Some(light.iter().flat_map(|group| group.iter().copied()).collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPlay {
    #[error("a play needs at least one card")]
    Empty,
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("cards [{0}] do not form a valid combination")]
    NoMatchingShape(String),
}
