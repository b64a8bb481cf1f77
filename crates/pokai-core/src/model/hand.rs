use crate::model::card::{Card, format_cards};
use crate::model::categories::Categories;
use core::fmt;
use thiserror::Error;

/// Cards held by one seat, kept sorted, plus their categorization.
///
/// Every mutation rebuilds the categorization, so [`Hand::categories`] always
/// describes the current cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
    categories: Categories,
}

impl Hand {
    /// Builds a hand; repeated cards are kept once.
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut cards: Vec<Card> = cards.into_iter().collect();
        cards.sort();
        cards.dedup();
        let categories = Categories::from_sorted(&cards);
        Self { cards, categories }
    }

    /// Adds cards not already held.
    pub fn add(&mut self, cards: &[Card]) {
        for &card in cards {
            if !self.cards.contains(&card) {
                self.cards.push(card);
            }
        }
        self.cards.sort();
        self.organize();
    }

    /// Removes every card in `cards`, or none of them if any is missing.
    pub fn remove(&mut self, cards: &[Card]) -> Result<(), InsufficientCards> {
        let missing: Vec<Card> = cards
            .iter()
            .copied()
            .filter(|card| !self.cards.contains(card))
            .collect();
        if !missing.is_empty() {
            return Err(InsufficientCards { missing });
        }
        self.cards.retain(|card| !cards.contains(card));
        self.organize();
        Ok(())
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.binary_search(&card).is_ok()
    }

    pub fn contains_all(&self, cards: &[Card]) -> bool {
        cards.iter().all(|&card| self.contains(card))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    /// Bare bombs held: quadruples plus the double joker.
    pub fn bomb_count(&self) -> usize {
        self.categories.bomb_count()
    }

    fn organize(&mut self) {
        self.categories = Categories::from_sorted(&self.cards);
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cards(&self.cards))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hand does not hold {}", format_cards(.missing))]
pub struct InsufficientCards {
    pub missing: Vec<Card>,
}
