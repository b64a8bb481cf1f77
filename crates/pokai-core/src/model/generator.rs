//! Enumeration of the plays a hand can make.
//!
//! Everything here reads the hand's categorization snapshot and yields plays
//! lazily. Absence is an empty iterator; nothing in this module fails.

use crate::model::card::Card;
use crate::model::categories::{Categories, MIN_DOUBLE_STRAIGHT_LEN, MIN_STRAIGHT_LEN};
use crate::model::family::Family;
use crate::model::hand::Hand;
use crate::model::play::Play;
use crate::model::rank::Rank;
use std::iter;

/// Lazily produced plays, ascending by base rank, then run length, then
/// attachments.
pub type Candidates<'a> = Box<dyn Iterator<Item = Play> + 'a>;

pub struct Generator;

impl Generator {
    /// Plays of `family` held in `hand`.
    ///
    /// Without a previous play every play of the family is produced, including
    /// every sub-run of a straight and every attachment variant. With one, only
    /// plays satisfying [`Play::beats`] against it are produced.
    pub fn candidates<'a>(hand: &'a Hand, previous: Option<&Play>, family: Family) -> Candidates<'a> {
        let Some(previous) = previous else {
            return plays(hand.categories(), family, Filter::ANY);
        };

        let filter = match (previous.family(), family) {
            (Family::DoubleJoker, _) => return Box::new(iter::empty()),
            // Bare quadruples answer a quadruple with attachments at any rank.
            (Family::Quadruple, Family::Quadruple) if previous.attachments() > 0 => Filter::ANY,
            (same, family) if same == family => Filter::matching(previous),
            (_, Family::Quadruple) => Filter {
                attachments: Some(0),
                ..Filter::ANY
            },
            (_, Family::DoubleJoker) => Filter::ANY,
            _ => return Box::new(iter::empty()),
        };

        let previous = previous.clone();
        Box::new(plays(hand.categories(), family, filter).filter(move |play| play.beats(&previous)))
    }

    /// Bare quadruples then the double joker, restricted to those beating
    /// `previous` when given.
    pub fn bombs<'a>(hand: &'a Hand, previous: Option<&Play>) -> Candidates<'a> {
        let cats = hand.categories();
        let bare = Filter {
            attachments: Some(0),
            ..Filter::ANY
        };
        let bombs = plays(cats, Family::Quadruple, bare).chain(plays(cats, Family::DoubleJoker, Filter::ANY));
        match previous {
            None => Box::new(bombs),
            Some(previous) => {
                let previous = previous.clone();
                Box::new(bombs.filter(move |play| play.beats(&previous)))
            }
        }
    }

    /// Every play that beats `previous`: non-bomb plays of its family first,
    /// then bombs.
    pub fn responses<'a>(hand: &'a Hand, previous: &Play) -> Candidates<'a> {
        let same_family =
            Self::candidates(hand, Some(previous), previous.family()).filter(|play| !play.is_bomb());
        Box::new(same_family.chain(Self::bombs(hand, Some(previous))))
    }

    /// Every play in the hand, family by family in `order`.
    pub fn leads<'a>(hand: &'a Hand, order: &[Family]) -> Candidates<'a> {
        let order = order.to_vec();
        Box::new(
            order
                .into_iter()
                .flat_map(move |family| Self::candidates(hand, None, family)),
        )
    }
}

/// Narrowing applied while enumerating, before the final `beats` check.
#[derive(Debug, Clone, Copy)]
struct Filter {
    above: Option<Rank>,
    foundation_len: Option<usize>,
    attachments: Option<usize>,
}

impl Filter {
    const ANY: Filter = Filter {
        above: None,
        foundation_len: None,
        attachments: None,
    };

    fn matching(previous: &Play) -> Self {
        Self {
            above: Some(previous.base_rank()),
            foundation_len: Some(previous.foundation_len()),
            attachments: Some(previous.attachments()),
        }
    }

    fn admits_base(self, card: &Card) -> bool {
        self.above.is_none_or(|rank| card.rank() > rank)
    }
}

fn plays<'a>(cats: &'a Categories, family: Family, filter: Filter) -> Candidates<'a> {
    let counts: Vec<usize> = family
        .attachment_counts()
        .iter()
        .copied()
        .filter(|count| filter.attachments.is_none_or(|wanted| wanted == *count))
        .collect();

    Box::new(foundations(cats, family, filter).flat_map(move |foundation| {
        counts
            .clone()
            .into_iter()
            .flat_map(move |count| with_attachments(cats, family, foundation, count))
    }))
}

fn foundations<'a>(
    cats: &'a Categories,
    family: Family,
    filter: Filter,
) -> Box<dyn Iterator<Item = &'a [Card]> + 'a> {
    match family {
        Family::Straight | Family::DoubleStraight => {
            let each = family.each_count();
            let min_len = if family == Family::Straight {
                MIN_STRAIGHT_LEN
            } else {
                MIN_DOUBLE_STRAIGHT_LEN
            };
            Box::new(
                cats.groups(family)
                    .iter()
                    .flat_map(move |run| sub_runs(run, each, min_len, filter.foundation_len))
                    .filter(move |foundation| filter.admits_base(&foundation[0])),
            )
        }
        _ => Box::new(cats.groups(family).iter().map(Vec::as_slice).filter(move |foundation| {
            filter.admits_base(&foundation[0])
                && filter.foundation_len.is_none_or(|len| len == foundation.len())
        })),
    }
}

/// Contiguous slices of `run` spanning at least `min_len` ranks, or exactly
/// `cards / each` ranks when a card count is requested.
fn sub_runs(
    run: &[Card],
    each: usize,
    min_len: usize,
    cards: Option<usize>,
) -> impl Iterator<Item = &[Card]> {
    let ranks = run.len() / each;
    (0..ranks).flat_map(move |start| {
        let (shortest, longest) = match cards {
            Some(count) => (count / each, count / each),
            None => (min_len, ranks - start),
        };
        (shortest.max(min_len)..=longest)
            .filter(move |len| start + len <= ranks)
            .map(move |len| &run[start * each..(start + len) * each])
    })
}

fn with_attachments<'a>(cats: &'a Categories, family: Family, foundation: &'a [Card], count: usize) -> Candidates<'a> {
    if count == 0 {
        return Box::new(iter::once(Play::from_parts(family, foundation, &[])));
    }

    let groups = family.attachment_groups();
    let Some(source) = Family::of_equal_rank(count / groups) else {
        return Box::new(iter::empty());
    };
    let pool: Vec<&'a [Card]> = cats
        .groups(source)
        .iter()
        .map(Vec::as_slice)
        .filter(|group| foundation.iter().all(|card| card.rank() != group[0].rank()))
        .collect();

    Box::new(Combinations::new(pool, groups).map(move |chosen| {
        let cards: Vec<Card> = chosen.iter().flat_map(|group| group.iter().copied()).collect();
        Play::from_parts(family, foundation, &cards)
    }))
}

/// k-combinations of a pool in lexicographic index order.
struct Combinations<T> {
    pool: Vec<T>,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl<T: Copy> Combinations<T> {
    fn new(pool: Vec<T>, k: usize) -> Self {
        let done = k > pool.len();
        Self {
            pool,
            indices: (0..k).collect(),
            started: false,
            done,
        }
    }

    fn current(&self) -> Vec<T> {
        self.indices.iter().map(|&index| self.pool[index]).collect()
    }
}

impl<T: Copy> Iterator for Combinations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current());
        }

        let n = self.pool.len();
        let k = self.indices.len();
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.indices[i] != i + n - k {
                break;
            }
        }
        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.current())
    }
}
