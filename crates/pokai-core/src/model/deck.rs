use crate::model::card::Card;
use crate::model::player::{PLAYER_COUNT, PlayerPosition};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub const DECK_SIZE: usize = 54;
/// Cards dealt to every seat before the landlord takes the kitty.
pub const BASE_HAND_SIZE: usize = 17;
pub const KITTY_SIZE: usize = DECK_SIZE - BASE_HAND_SIZE * PLAYER_COUNT;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The full pack in ascending order.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for rank in Rank::STANDARD.iter().copied() {
            for suit in Suit::STANDARD.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        cards.push(Card::SMALL_JOKER);
        cards.push(Card::BIG_JOKER);
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The cards of this deck that are not in `taken`, keeping deck order.
    pub fn without(&self, taken: &[Card]) -> Vec<Card> {
        self.cards
            .iter()
            .copied()
            .filter(|card| !taken.contains(card))
            .collect()
    }

    /// Deals 17 cards to each seat in turn and the remaining kitty to `landlord`.
    pub fn deal_landlord(&self, landlord: PlayerPosition) -> [Vec<Card>; PLAYER_COUNT] {
        let mut hands: [Vec<Card>; PLAYER_COUNT] =
            std::array::from_fn(|_| Vec::with_capacity(BASE_HAND_SIZE + KITTY_SIZE));
        let (dealt, kitty) = self.cards.split_at(BASE_HAND_SIZE * PLAYER_COUNT);
        for (index, card) in dealt.iter().enumerate() {
            hands[index % PLAYER_COUNT].push(*card);
        }
        hands[landlord.index()].extend_from_slice(kitty);
        hands
    }
}
