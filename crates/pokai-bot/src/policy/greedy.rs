use super::{Policy, PolicyContext};
use crate::config::PolicyConfig;
use pokai_core::model::family::Family;
use pokai_core::model::generator::Generator;
use pokai_core::model::hand::Hand;
use pokai_core::model::play::Play;
use pokai_core::model::round::{Phase, RoundState};
use std::cmp::Reverse;

/// Plays the cheapest legal combination without looking ahead.
#[derive(Debug, Clone, Default)]
pub struct GreedyPolicy {
    config: PolicyConfig,
}

impl GreedyPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }
}

impl Policy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Play> {
        greedy_play(ctx.hand, ctx.round, &self.config).map(|play| play.with_actor(ctx.seat))
    }
}

/// Greedy move for the seat to move in `round` holding `hand`; `None` passes.
pub fn greedy_play(hand: &Hand, round: &RoundState, config: &PolicyConfig) -> Option<Play> {
    match round.phase() {
        Phase::Lead => lead(hand, config),
        Phase::Follow(previous) => follow(hand, round, previous, config),
    }
}

fn lead(hand: &Hand, config: &PolicyConfig) -> Option<Play> {
    config.lead_priority.iter().find_map(|&family| match family {
        Family::Straight | Family::DoubleStraight => lead_run(hand, family, config),
        _ => config.attachment_order(family).iter().find_map(|&count| {
            Generator::candidates(hand, None, family).find(|play| play.attachments() == count)
        }),
    })
}

fn lead_run(hand: &Hand, family: Family, config: &PolicyConfig) -> Option<Play> {
    let runs = Generator::candidates(hand, None, family);
    if config.long_straight_priority {
        runs.max_by_key(|play| (play.len(), Reverse(play.base_rank())))
    } else {
        runs.min_by_key(|play| (play.len(), play.base_rank()))
    }
}

fn follow(hand: &Hand, round: &RoundState, previous: &Play, config: &PolicyConfig) -> Option<Play> {
    let lowest = Generator::candidates(hand, Some(previous), previous.family()).find(|play| !play.is_bomb());
    if lowest.is_some() {
        return lowest;
    }

    let bombs = hand.bomb_count();
    let threatened = round
        .previous_actor()
        .is_some_and(|actor| round.remaining(actor) <= config.bomb_threshold * bombs);
    if bombs > 0 && threatened {
        return Generator::bombs(hand, Some(previous)).next();
    }
    None
}
