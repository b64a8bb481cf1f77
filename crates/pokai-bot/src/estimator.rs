//! Monte-Carlo estimate of how often a seat wins from a position.
//!
//! Every trial deals the cards the seat cannot see to its two opponents at
//! random, then plays the round out with the greedy policy for all three
//! seats. Trials are split across rayon workers that each own an RNG.

use crate::config::PolicyConfig;
use crate::policy::greedy_play;
use pokai_core::model::card::Card;
use pokai_core::model::hand::{Hand, InsufficientCards};
use pokai_core::model::play::Play;
use pokai_core::model::player::{PLAYER_COUNT, PlayerPosition};
use pokai_core::model::round::{MoveError, RoundState};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

/// Outcome counts of one estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Estimate {
    pub wins: usize,
    pub completed: usize,
    /// Trials abandoned after reaching an illegal state.
    pub discarded: usize,
}

impl Estimate {
    /// Wins over completed trials.
    pub fn win_rate(&self) -> Option<f64> {
        (self.completed > 0).then(|| self.wins as f64 / self.completed as f64)
    }

    fn merge(self, other: Estimate) -> Estimate {
        Estimate {
            wins: self.wins + other.wins,
            completed: self.completed + other.completed,
            discarded: self.discarded + other.discarded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("{unseen} unseen cards cannot fill opponent hands of {expected}")]
    InconsistentDeal { unseen: usize, expected: usize },
    #[error("all {discarded} trials were discarded")]
    NoCompletedTrials { discarded: usize },
    #[error("candidate cannot be played: {0}")]
    IllegalMove(#[from] MoveError),
    #[error("candidate cannot be played: {0}")]
    MissingCards(#[from] InsufficientCards),
}

/// Reasons a single simulated game is abandoned.
#[derive(Debug, Error)]
enum TrialError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Hand(#[from] InsufficientCards),
    #[error("no winner after {0} moves")]
    StepLimit(usize),
}

#[derive(Debug, Clone, Default)]
pub struct Estimator {
    config: PolicyConfig,
}

impl Estimator {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Fraction of completed trials won by `seat` holding `hand` in `round`.
    pub fn estimate(
        &self,
        seat: PlayerPosition,
        hand: &Hand,
        round: &RoundState,
        trials: usize,
        workers: usize,
    ) -> Result<f64, EstimateError> {
        let estimate = self.estimate_detailed(seat, hand, round, trials, workers)?;
        estimate
            .win_rate()
            .ok_or(EstimateError::NoCompletedTrials {
                discarded: estimate.discarded,
            })
    }

    /// Win, completion and discard counts for the same simulation as
    /// [`Estimator::estimate`].
    pub fn estimate_detailed(
        &self,
        seat: PlayerPosition,
        hand: &Hand,
        round: &RoundState,
        trials: usize,
        workers: usize,
    ) -> Result<Estimate, EstimateError> {
        let unseen = round.unseen_cards(hand.cards());
        let first = seat.next();
        let second = first.next();
        let expected = round.remaining(first) + round.remaining(second);
        if unseen.len() != expected {
            return Err(EstimateError::InconsistentDeal {
                unseen: unseen.len(),
                expected,
            });
        }

        let shares = split_trials(trials, workers);
        let deal = Deal {
            seat,
            hand,
            round,
            unseen: &unseen,
        };
        let estimate = shares
            .into_par_iter()
            .enumerate()
            .map(|(worker, share)| {
                let mut rng = self.worker_rng(worker);
                (0..share).fold(Estimate::default(), |mut tally, trial| {
                    match self.run_trial(&deal, &mut rng) {
                        Ok(won) => {
                            tally.completed += 1;
                            tally.wins += usize::from(won);
                        }
                        Err(err) => {
                            event!(
                                target: "pokai_bot::estimator",
                                Level::WARN,
                                seat = ?seat,
                                worker,
                                trial,
                                error = %err,
                                "discarding trial"
                            );
                            tally.discarded += 1;
                        }
                    }
                    tally
                })
            })
            .reduce(Estimate::default, Estimate::merge);

        event!(
            target: "pokai_bot::estimator",
            Level::DEBUG,
            seat = ?seat,
            trials,
            workers,
            wins = estimate.wins,
            completed = estimate.completed,
            discarded = estimate.discarded,
        );

        if estimate.completed == 0 {
            return Err(EstimateError::NoCompletedTrials {
                discarded: estimate.discarded,
            });
        }
        Ok(estimate)
    }

    /// Win rate after `seat` lays `play` and the turn moves on.
    pub fn estimate_play(
        &self,
        seat: PlayerPosition,
        hand: &Hand,
        round: &RoundState,
        play: &Play,
    ) -> Result<f64, EstimateError> {
        let mut hand = hand.clone();
        let mut round = round.clone();
        hand.remove(play.cards())?;
        round.apply(play.clone().with_actor(seat))?;
        round.advance_turn();
        self.estimate_configured(seat, &hand, &round)
    }

    /// Win rate after `seat` passes.
    pub fn estimate_pass(&self, seat: PlayerPosition, hand: &Hand, round: &RoundState) -> Result<f64, EstimateError> {
        if round.turn() != seat {
            return Err(MoveError::OutOfTurn {
                expected: round.turn(),
                actual: seat,
            }
            .into());
        }
        let mut round = round.clone();
        round.pass()?;
        self.estimate_configured(seat, hand, &round)
    }

    fn estimate_configured(&self, seat: PlayerPosition, hand: &Hand, round: &RoundState) -> Result<f64, EstimateError> {
        let settings = self.config.estimator;
        self.estimate(seat, hand, round, settings.trials, settings.workers)
    }

    fn worker_rng(&self, worker: usize) -> SmallRng {
        match self.config.estimator.seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(worker as u64)),
            None => SmallRng::from_entropy(),
        }
    }

    fn run_trial(&self, deal: &Deal<'_>, rng: &mut SmallRng) -> Result<bool, TrialError> {
        let mut hands = deal.hands(rng);
        let mut round = deal.round.clone();
        let step_limit = self.config.estimator.step_limit;

        for _ in 0..step_limit {
            if let Some(winner) = round.winner() {
                return Ok(winner == deal.seat);
            }
            let turn = round.turn();
            match greedy_play(&hands[turn.index()], &round, &self.config) {
                Some(play) => {
                    hands[turn.index()].remove(play.cards())?;
                    round.apply(play.with_actor(turn))?;
                    round.advance_turn();
                }
                None => round.pass()?,
            }
        }

        match round.winner() {
            Some(winner) => Ok(winner == deal.seat),
            None => Err(TrialError::StepLimit(step_limit)),
        }
    }
}

/// Read-only inputs shared by every worker.
struct Deal<'a> {
    seat: PlayerPosition,
    hand: &'a Hand,
    round: &'a RoundState,
    unseen: &'a [Card],
}

impl Deal<'_> {
    /// Random opponent hands sized from the round, seat order after `seat`.
    fn hands(&self, rng: &mut SmallRng) -> [Hand; PLAYER_COUNT] {
        let mut pool = self.unseen.to_vec();
        pool.shuffle(rng);

        let first = self.seat.next();
        let (first_cards, second_cards) = pool.split_at(self.round.remaining(first));
        let mut hands: [Hand; PLAYER_COUNT] = Default::default();
        hands[self.seat.index()] = self.hand.clone();
        hands[first.index()] = Hand::new(first_cards.iter().copied());
        hands[first.next().index()] = Hand::new(second_cards.iter().copied());
        hands
    }
}

/// Splits `trials` across at least one worker, remainder to the lowest indices.
fn split_trials(trials: usize, workers: usize) -> Vec<usize> {
    let workers = workers.max(1);
    let base = trials / workers;
    let extra = trials % workers;
    (0..workers)
        .map(|worker| base + usize::from(worker < extra))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{EstimateError, Estimator, split_trials};
    use crate::config::{EstimatorConfig, PolicyConfig};
    use pokai_core::model::card::parse_cards;
    use pokai_core::model::deck::Deck;
    use pokai_core::model::hand::Hand;
    use pokai_core::model::play::Play;
    use pokai_core::model::player::PlayerPosition;
    use pokai_core::model::round::{MoveError, RoundState};

    fn seeded(seed: u64) -> Estimator {
        Estimator::new(PolicyConfig {
            estimator: EstimatorConfig {
                trials: 64,
                workers: 2,
                seed: Some(seed),
                ..EstimatorConfig::default()
            },
            ..PolicyConfig::default()
        })
    }

    fn landlord_position(seed: u64) -> (Hand, RoundState) {
        let deck = Deck::shuffled_with_seed(seed);
        let [first, _, _] = deck.deal_landlord(PlayerPosition::First);
        (Hand::new(first), RoundState::landlord(PlayerPosition::First))
    }

    fn with_step_limit(step_limit: usize) -> Estimator {
        Estimator::new(PolicyConfig {
            estimator: EstimatorConfig {
                step_limit,
                ..seeded(21).config().estimator
            },
            ..PolicyConfig::default()
        })
    }

    #[test]
    fn split_gives_remainder_to_first_workers() {
        assert_eq!(split_trials(10, 4), vec![3, 3, 2, 2]);
        assert_eq!(split_trials(3, 0), vec![3]);
        assert_eq!(split_trials(2, 3), vec![1, 1, 0]);
    }

    #[test]
    fn counts_cover_every_trial() {
        let (hand, round) = landlord_position(5);
        let estimate = seeded(1)
            .estimate_detailed(PlayerPosition::First, &hand, &round, 40, 3)
            .unwrap();
        assert_eq!(estimate.completed + estimate.discarded, 40);
        assert!(estimate.wins <= estimate.completed);
        let rate = estimate.win_rate().unwrap();
        assert!((0.0..=1.0).contains(&rate));
    }

    #[test]
    fn seeded_estimates_repeat() {
        let (hand, round) = landlord_position(9);
        let a = seeded(77).estimate(PlayerPosition::First, &hand, &round, 48, 4).unwrap();
        let b = seeded(77).estimate(PlayerPosition::First, &hand, &round, 48, 4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn inconsistent_deal_fails_before_simulating() {
        let hand = Hand::new(parse_cards("3h 4h").unwrap());
        let round = RoundState::landlord(PlayerPosition::First);
        let err = seeded(0)
            .estimate(PlayerPosition::First, &hand, &round, 10, 2)
            .unwrap_err();
        assert_eq!(
            err,
            EstimateError::InconsistentDeal {
                unseen: 52,
                expected: 34
            }
        );
    }

    #[test]
    fn zero_trials_complete_nothing() {
        let (hand, round) = landlord_position(3);
        assert_eq!(
            seeded(0).estimate(PlayerPosition::First, &hand, &round, 0, 2),
            Err(EstimateError::NoCompletedTrials { discarded: 0 })
        );
    }

    #[test]
    fn emptying_the_hand_is_a_certain_win() {
        let hand = Hand::new(parse_cards("9h").unwrap());
        let round = RoundState::new([1, 26, 27], PlayerPosition::First).unwrap();
        let lone = Play::classify(hand.cards()).unwrap();
        let rate = seeded(4)
            .estimate_play(PlayerPosition::First, &hand, &round, &lone)
            .unwrap();
        assert_eq!(rate, 1.0);
    }

    #[test]
    fn passing_on_lead_is_rejected() {
        let (hand, round) = landlord_position(2);
        assert_eq!(
            seeded(0).estimate_pass(PlayerPosition::First, &hand, &round),
            Err(EstimateError::IllegalMove(MoveError::PassOnLead))
        );
    }

    #[test]
    fn truncated_trials_are_all_discarded() {
        // Nobody can shed a 17 or 20 card hand in two moves.
        let (hand, round) = landlord_position(6);
        assert_eq!(
            with_step_limit(2).estimate_detailed(PlayerPosition::First, &hand, &round, 10, 2),
            Err(EstimateError::NoCompletedTrials { discarded: 10 })
        );
        assert_eq!(
            with_step_limit(2).estimate(PlayerPosition::First, &hand, &round, 10, 2),
            Err(EstimateError::NoCompletedTrials { discarded: 10 })
        );
    }

    #[test]
    fn discarded_trials_are_counted_beside_completed_ones() {
        // Seeded workers deal the same games at every limit, so raising the
        // limit only moves trials from discarded to completed.
        let (hand, round) = landlord_position(6);
        let mut previous_completed = 0;
        let mut mixed = false;
        for step_limit in 1..=400 {
            if previous_completed == 20 {
                break;
            }
            let result = with_step_limit(step_limit).estimate_detailed(PlayerPosition::First, &hand, &round, 20, 2);
            match result {
                Ok(estimate) => {
                    assert_eq!(estimate.completed + estimate.discarded, 20);
                    assert!(estimate.wins <= estimate.completed);
                    assert!(estimate.completed >= previous_completed);
                    previous_completed = estimate.completed;
                    mixed |= estimate.discarded > 0;
                }
                Err(err) => {
                    assert_eq!(err, EstimateError::NoCompletedTrials { discarded: 20 });
                    assert_eq!(previous_completed, 0);
                }
            }
        }
        assert!(mixed, "no step limit split the trials");
        assert_eq!(previous_completed, 20);
    }
}
