//! Partition of a hand into the card groups that realise each combination family.

use crate::model::card::Card;
use crate::model::family::Family;
use crate::model::rank::Rank;

/// Shortest straight, counted in distinct ranks.
pub const MIN_STRAIGHT_LEN: usize = 5;
/// Shortest double straight, counted in distinct ranks.
pub const MIN_DOUBLE_STRAIGHT_LEN: usize = 3;

/// Card groups per family, each bucket in ascending rank order.
///
/// Basic buckets hold every prefix of a rank group, so a rank held three times
/// appears once as a single, once as a double and once as a triple. Straight
/// buckets hold maximal runs; sub-runs are derived by the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    buckets: [Vec<Vec<Card>>; Family::COUNT],
}

impl Categories {
    /// Categorizes cards that are already sorted ascending.
    pub fn from_sorted(cards: &[Card]) -> Self {
        debug_assert!(cards.windows(2).all(|pair| pair[0] <= pair[1]));
        let groups = rank_groups(cards);
        let mut categories = Self::default();
        categories.organize_basics(&groups);
        categories.organize_adjacent_triples(&groups);
        categories.organize_runs(&groups, Family::Straight, MIN_STRAIGHT_LEN);
        categories.organize_runs(&groups, Family::DoubleStraight, MIN_DOUBLE_STRAIGHT_LEN);
        categories.organize_jokers(&groups);
        categories
    }

    pub fn groups(&self, family: Family) -> &[Vec<Card>] {
        &self.buckets[family.index()]
    }

    pub fn is_empty(&self, family: Family) -> bool {
        self.buckets[family.index()].is_empty()
    }

    /// Number of bare bombs available (quadruples plus the double joker).
    pub fn bomb_count(&self) -> usize {
        self.groups(Family::Quadruple).len() + self.groups(Family::DoubleJoker).len()
    }

    fn organize_basics(&mut self, groups: &[RankGroup<'_>]) {
        for group in groups {
            for size in 1..=group.cards.len() {
                if let Some(family) = Family::of_equal_rank(size) {
                    self.buckets[family.index()].push(group.cards[..size].to_vec());
                }
            }
        }
    }

    fn organize_adjacent_triples(&mut self, groups: &[RankGroup<'_>]) {
        for pair in groups.windows(2) {
            let (low, high) = (&pair[0], &pair[1]);
            if low.rank.successor() == Some(high.rank) && low.len() >= 3 && high.len() >= 3 {
                let mut plane = low.cards[..3].to_vec();
                plane.extend_from_slice(&high.cards[..3]);
                self.buckets[Family::AdjacentTriple.index()].push(plane);
            }
        }
    }

    /// Greedy sweep collecting maximal runs where every rank holds at least
    /// `family.each_count()` cards.
    fn organize_runs(&mut self, groups: &[RankGroup<'_>], family: Family, min_len: usize) {
        let each = family.each_count();
        let mut run: Vec<Card> = Vec::new();
        let mut run_ranks = 0usize;
        let mut last: Option<Rank> = None;

        for group in groups {
            let extends = group.rank.in_run_range()
                && group.len() >= each
                && last.and_then(Rank::successor) == Some(group.rank);
            if !extends {
                self.close_run(family, &mut run, &mut run_ranks, min_len);
                last = None;
            }
            if group.rank.in_run_range() && group.len() >= each {
                run.extend_from_slice(&group.cards[..each]);
                run_ranks += 1;
                last = Some(group.rank);
            }
        }
        self.close_run(family, &mut run, &mut run_ranks, min_len);
    }

    fn close_run(&mut self, family: Family, run: &mut Vec<Card>, ranks: &mut usize, min_len: usize) {
        if *ranks >= min_len {
            self.buckets[family.index()].push(std::mem::take(run));
        } else {
            run.clear();
        }
        *ranks = 0;
    }

    fn organize_jokers(&mut self, groups: &[RankGroup<'_>]) {
        let has = |rank: Rank| groups.iter().any(|group| group.rank == rank);
        if has(Rank::SmallJoker) && has(Rank::BigJoker) {
            self.buckets[Family::DoubleJoker.index()].push(vec![Card::SMALL_JOKER, Card::BIG_JOKER]);
        }
    }
}

struct RankGroup<'a> {
    rank: Rank,
    cards: &'a [Card],
}

impl RankGroup<'_> {
    fn len(&self) -> usize {
        self.cards.len()
    }
}

fn rank_groups(cards: &[Card]) -> Vec<RankGroup<'_>> {
    cards
        .chunk_by(|a, b| a.rank() == b.rank())
        .map(|chunk| RankGroup {
            rank: chunk[0].rank(),
            cards: chunk,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::Categories;
    use crate::model::card::{Card, parse_cards};
    use crate::model::family::Family;
    use crate::model::rank::Rank;

    fn categorize(text: &str) -> Categories {
        let mut cards = parse_cards(text).unwrap();
        cards.sort();
        Categories::from_sorted(&cards)
    }

    fn ranks(group: &[Card]) -> Vec<Rank> {
        group.iter().map(|card| card.rank()).collect()
    }

    #[test]
    fn rank_group_contributes_one_group_per_size() {
        let cats = categorize("7h 7d 7s 9c 9h");
        assert_eq!(cats.groups(Family::Single).len(), 2);
        assert_eq!(cats.groups(Family::Double).len(), 2);
        assert_eq!(cats.groups(Family::Triple).len(), 1);
        assert!(cats.is_empty(Family::Quadruple));
        assert_eq!(ranks(&cats.groups(Family::Triple)[0]), vec![Rank::Seven; 3]);
    }

    #[test]
    fn four_of_a_kind_populates_every_basic_bucket() {
        let cats = categorize("5h 5d 5s 5c");
        for family in [Family::Single, Family::Double, Family::Triple, Family::Quadruple] {
            assert_eq!(cats.groups(family).len(), 1, "{family}");
        }
        assert_eq!(cats.bomb_count(), 1);
    }

    #[test]
    fn adjacent_triples_need_consecutive_ranks() {
        let cats = categorize("3s 3d 3h 4s 5h 5s 6s 6h 6d 7s 7h 7d 8h 9h 9c");
        let planes: Vec<_> = cats
            .groups(Family::AdjacentTriple)
            .iter()
            .map(|g| g[0].rank())
            .collect();
        assert_eq!(planes, vec![Rank::Six]);
        assert_eq!(cats.groups(Family::AdjacentTriple)[0].len(), 6);
    }

    #[test]
    fn straight_sweep_registers_maximal_runs() {
        let cats = categorize("3h 4d 5s 6c 7h 9d 0s Jc Qh Kd As 2c");
        let runs: Vec<_> = cats.groups(Family::Straight).iter().map(|g| ranks(g)).collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].first(), Some(&Rank::Three));
        assert_eq!(runs[0].len(), 5);
        assert_eq!(runs[1].first(), Some(&Rank::Nine));
        assert_eq!(runs[1].last(), Some(&Rank::Ace));
    }

    #[test]
    fn short_runs_are_not_registered() {
        let cats = categorize("3h 4d 5s 6c 8h");
        assert!(cats.is_empty(Family::Straight));
    }

    #[test]
    fn runs_never_include_two() {
        let cats = categorize("Jh Qd Ks Ac 2h");
        assert!(cats.is_empty(Family::Straight));
    }

    #[test]
    fn double_straight_sweep_uses_pairs() {
        let cats = categorize("5h 5d 6h 6d 7s 7c 8h");
        let runs = cats.groups(Family::DoubleStraight);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 6);
        assert!(cats.is_empty(Family::Straight));
    }

    #[test]
    fn both_jokers_form_one_double_joker_group() {
        let cats = categorize("Z0 Z1 3h");
        let jokers = cats.groups(Family::DoubleJoker);
        assert_eq!(jokers.len(), 1);
        assert_eq!(jokers[0], vec![Card::SMALL_JOKER, Card::BIG_JOKER]);

        let single = categorize("Z0 3h");
        assert!(single.is_empty(Family::DoubleJoker));
    }

    #[test]
    fn empty_hand_has_empty_buckets() {
        let cats = Categories::from_sorted(&[]);
        assert!(Family::ALL.iter().all(|f| cats.is_empty(*f)));
    }
}
