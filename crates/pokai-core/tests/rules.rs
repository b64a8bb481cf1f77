use pokai_core::model::card::parse_cards;
use pokai_core::model::deck::{DECK_SIZE, Deck};
use pokai_core::model::family::Family;
use pokai_core::model::generator::Generator;
use pokai_core::model::hand::Hand;
use pokai_core::model::play::Play;
use pokai_core::model::player::PlayerPosition;
use pokai_core::model::rank::Rank;
use pokai_core::model::round::{Phase, RoundState};

fn hand(text: &str) -> Hand {
    Hand::new(parse_cards(text).unwrap())
}

fn play(text: &str) -> Play {
    Play::classify(&parse_cards(text).unwrap()).unwrap()
}

#[test]
fn generated_plays_classify_back_on_seeded_deals() {
    for seed in 0..12u64 {
        let deck = Deck::shuffled_with_seed(seed);
        for cards in deck.deal_landlord(PlayerPosition::First) {
            let hand = Hand::new(cards);
            for generated in Generator::leads(&hand, &Family::LEAD_PRIORITY) {
                let classified = Play::classify(generated.cards())
                    .unwrap_or_else(|err| panic!("seed {seed}: {generated}: {err}"));
                assert_eq!(classified.family(), generated.family(), "seed {seed}: {generated}");
                assert_eq!(classified.attachments(), generated.attachments(), "seed {seed}: {generated}");
                assert!(hand.contains_all(generated.cards()));
            }
        }
    }
}

#[test]
fn beats_orders_singles_strictly_by_rank() {
    let singles: Vec<Play> = Rank::ORDERED
        .iter()
        .map(|rank| {
            let token = match rank {
                Rank::SmallJoker => "Z0".to_string(),
                Rank::BigJoker => "Z1".to_string(),
                other => format!("{}h", other.token_char()),
            };
            play(&token)
        })
        .collect();

    for (i, low) in singles.iter().enumerate() {
        for (j, high) in singles.iter().enumerate() {
            assert_eq!(high.beats(low), j > i, "{high} vs {low}");
        }
    }
}

#[test]
fn double_joker_beats_any_non_bomb() {
    let both = hand("Z0 Z1 5h");
    let groups = both.categories().groups(Family::DoubleJoker);
    assert_eq!(groups.len(), 1);
    let rocket = Play::classify(&groups[0]).unwrap();
    for other in ["2h", "Ah Ad", "3h 4d 5s 6c 7h", "9h 9d 9s 9c"] {
        assert!(rocket.beats(&play(other)), "{other}");
    }
}

#[test]
fn lowest_response_play_through_keeps_counts_consistent() {
    let deck = Deck::shuffled_with_seed(2024);
    let landlord = PlayerPosition::Second;
    let mut hands = deck.deal_landlord(landlord).map(Hand::new);
    let mut round = RoundState::landlord(landlord);

    let mut moves = 0;
    while round.winner().is_none() {
        moves += 1;
        assert!(moves < 500, "round did not terminate");

        let seat = round.turn();
        let hand = &hands[seat.index()];
        let choice = match round.phase() {
            Phase::Lead => Generator::leads(hand, &Family::LEAD_PRIORITY).next(),
            Phase::Follow(previous) => Generator::responses(hand, previous).next(),
        };

        let before = round.remaining_total();
        match choice {
            Some(play) => {
                let len = play.len();
                hands[seat.index()].remove(play.cards()).unwrap();
                round.apply(play.with_actor(seat)).unwrap();
                assert_eq!(round.remaining_total(), before - len);
                round.advance_turn();
            }
            None => {
                round.pass().unwrap();
                assert_eq!(round.remaining_total(), before);
            }
        }

        for seat in PlayerPosition::LOOP {
            assert_eq!(round.remaining(seat), hands[seat.index()].len());
        }
        assert_eq!(round.remaining_total() + round.played_cards().len(), DECK_SIZE);
    }

    let winner = round.winner().unwrap();
    assert!(hands[winner.index()].is_empty());
}
