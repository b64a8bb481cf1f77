use crate::config::PolicyConfig;
use crate::estimator::{EstimateError, Estimator};
use pokai_core::model::card::format_cards;
use pokai_core::model::generator::{Candidates, Generator};
use pokai_core::model::hand::Hand;
use pokai_core::model::play::Play;
use pokai_core::model::player::PlayerPosition;
use pokai_core::model::round::{Phase, RoundState};
use tracing::{Level, event};

/// Picks the play with the best simulated win rate.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    estimator: Estimator,
}

#[derive(Debug, Clone)]
struct Scored {
    play: Play,
    score: f64,
}

impl Selector {
    pub fn new(config: PolicyConfig) -> Self {
        Self {
            estimator: Estimator::new(config),
        }
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    pub fn config(&self) -> &PolicyConfig {
        self.estimator.config()
    }

    /// Best move for `seat`; `None` means pass.
    pub fn best_play(
        &self,
        seat: PlayerPosition,
        hand: &Hand,
        round: &RoundState,
    ) -> Result<Option<Play>, EstimateError> {
        if hand.is_empty() {
            return Ok(None);
        }
        match round.phase() {
            Phase::Lead => self.best_lead(seat, hand, round),
            Phase::Follow(previous) => self.best_follow(seat, hand, round, previous),
        }
    }

    fn best_lead(&self, seat: PlayerPosition, hand: &Hand, round: &RoundState) -> Result<Option<Play>, EstimateError> {
        let groups = self
            .config()
            .lead_priority
            .iter()
            .map(|&family| Generator::candidates(hand, None, family));

        let mut scored = 0;
        let mut best: Option<Scored> = None;
        for candidates in groups {
            if let Some(finishing) = self.score_group(seat, hand, round, candidates, &mut best, &mut scored)? {
                return Ok(Some(decide(seat, finishing, "empties_hand", scored, None, None)));
            }
        }

        Ok(best.map(|best| decide(seat, best.play, "best_lead", scored, Some(best.score), None)))
    }

    fn best_follow(
        &self,
        seat: PlayerPosition,
        hand: &Hand,
        round: &RoundState,
        previous: &Play,
    ) -> Result<Option<Play>, EstimateError> {
        let same_family: Candidates<'_> = Box::new(
            Generator::candidates(hand, Some(previous), previous.family()).filter(|play| !play.is_bomb()),
        );
        let bombs = Generator::bombs(hand, Some(previous));

        let mut scored = 0;
        let mut best: Option<Scored> = None;
        for candidates in [same_family, bombs] {
            if let Some(finishing) = self.score_group(seat, hand, round, candidates, &mut best, &mut scored)? {
                return Ok(Some(decide(seat, finishing, "empties_hand", scored, None, None)));
            }
        }

        let Some(best) = best else {
            log_pass(seat, previous, "no_candidates", None);
            return Ok(None);
        };

        let pass_score = self.estimator.estimate_pass(seat, hand, round)?;
        if best.score - pass_score >= self.config().pass_margin {
            Ok(Some(decide(seat, best.play, "beats_pass", scored, Some(best.score), Some(pass_score))))
        } else {
            log_pass(seat, previous, "pass_scores_higher", Some((best.score, pass_score)));
            Ok(None)
        }
    }

    /// Scores up to `candidate_limit` plays, keeping the first best. Returns a
    /// play that empties the hand as soon as one is seen.
    fn score_group(
        &self,
        seat: PlayerPosition,
        hand: &Hand,
        round: &RoundState,
        candidates: Candidates<'_>,
        best: &mut Option<Scored>,
        scored: &mut usize,
    ) -> Result<Option<Play>, EstimateError> {
        let limit = self.config().candidate_limit.unwrap_or(usize::MAX);
        for play in candidates.take(limit) {
            if play.len() == hand.len() {
                return Ok(Some(play));
            }
            let score = self.estimator.estimate_play(seat, hand, round, &play)?;
            *scored += 1;
            if best.as_ref().is_none_or(|current| score > current.score) {
                *best = Some(Scored { play, score });
            }
        }
        Ok(None)
    }
}

fn decide(
    seat: PlayerPosition,
    play: Play,
    reason: &'static str,
    scored: usize,
    score: Option<f64>,
    pass_score: Option<f64>,
) -> Play {
    let play = play.with_actor(seat);
    if tracing::enabled!(Level::INFO) {
        event!(
            target: "pokai_bot::selector",
            Level::INFO,
            seat = ?seat,
            family = %play.family(),
            cards = %format_cards(play.cards()),
            score = ?score,
            pass_score = ?pass_score,
            scored,
            reason,
        );
    }
    play
}

fn log_pass(seat: PlayerPosition, previous: &Play, reason: &'static str, scores: Option<(f64, f64)>) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    event!(
        target: "pokai_bot::selector",
        Level::INFO,
        seat = ?seat,
        previous = %format_cards(previous.cards()),
        best_score = ?scores.map(|(best, _)| best),
        pass_score = ?scores.map(|(_, pass)| pass),
        reason,
    );
}
