use pokai_bot::config::{EstimatorConfig, PolicyConfig};
use pokai_bot::estimator::Estimator;
use pokai_bot::policy::{GreedyPolicy, MonteCarloPolicy, Policy, PolicyContext};
use pokai_bot::selector::Selector;
use pokai_core::model::card::parse_cards;
use pokai_core::model::deck::Deck;
use pokai_core::model::hand::Hand;
use pokai_core::model::player::PlayerPosition;
use pokai_core::model::round::RoundState;

fn config(trials: usize, seed: u64) -> PolicyConfig {
    PolicyConfig {
        estimator: EstimatorConfig {
            trials,
            workers: 4,
            seed: Some(seed),
            ..EstimatorConfig::default()
        },
        ..PolicyConfig::default()
    }
}

#[test]
fn estimates_converge_with_more_trials() {
    let deck = Deck::shuffled_with_seed(31);
    let [landlord, _, _] = deck.deal_landlord(PlayerPosition::First);
    let hand = Hand::new(landlord);
    let round = RoundState::landlord(PlayerPosition::First);

    let reference = Estimator::new(config(0, 8))
        .estimate(PlayerPosition::First, &hand, &round, 10_000, 4)
        .unwrap();
    for seed in [101, 202, 303, 404, 505] {
        let sample = Estimator::new(config(0, seed))
            .estimate(PlayerPosition::First, &hand, &round, 1000, 4)
            .unwrap();
        assert!(
            (sample - reference).abs() <= 0.1,
            "seed {seed}: 1000 trials gave {sample}, 10000 trials gave {reference}"
        );
    }
}

#[test]
fn lone_three_of_hearts_leads_itself_at_round_start() {
    let hand = Hand::new(parse_cards("3h").unwrap());
    let round = RoundState::new([1, 26, 27], PlayerPosition::First).unwrap();
    let chosen = Selector::new(config(16, 1))
        .best_play(PlayerPosition::First, &hand, &round)
        .unwrap()
        .unwrap();
    assert_eq!(chosen.cards(), parse_cards("3h").unwrap().as_slice());
}

#[test]
fn mixed_policies_finish_a_legal_round() {
    let landlord = PlayerPosition::Third;
    let deck = Deck::shuffled_with_seed(77);
    let mut hands = deck.deal_landlord(landlord).map(Hand::new);
    let mut round = RoundState::landlord(landlord);

    let small = PolicyConfig {
        candidate_limit: Some(2),
        ..config(12, 5)
    };
    let mut policies: [Box<dyn Policy>; 3] = [
        Box::new(MonteCarloPolicy::new(small)),
        Box::new(GreedyPolicy::default()),
        Box::new(GreedyPolicy::default()),
    ];

    let mut moves = 0;
    while round.winner().is_none() {
        moves += 1;
        assert!(moves < 1000, "round did not finish");
        let seat = round.turn();
        let choice = {
            let ctx = PolicyContext {
                seat,
                hand: &hands[seat.index()],
                round: &round,
            };
            policies[seat.index()].choose_play(&ctx)
        };
        match choice {
            Some(play) => {
                hands[seat.index()].remove(play.cards()).unwrap();
                round.apply(play).unwrap();
                round.advance_turn();
            }
            None => round.pass().unwrap(),
        }
    }

    let winner = round.winner().unwrap();
    assert!(hands[winner.index()].is_empty());
    for seat in PlayerPosition::LOOP {
        assert_eq!(round.remaining(seat), hands[seat.index()].len());
    }
}
