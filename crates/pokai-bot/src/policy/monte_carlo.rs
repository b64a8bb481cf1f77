use super::{Policy, PolicyContext, greedy_play};
use crate::config::PolicyConfig;
use crate::selector::Selector;
use pokai_core::model::play::Play;
use tracing::{Level, event};

/// Chooses by simulated win rate through [`Selector`].
#[derive(Debug, Clone, Default)]
pub struct MonteCarloPolicy {
    selector: Selector,
}

impl MonteCarloPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self {
            selector: Selector::new(config),
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl Policy for MonteCarloPolicy {
    fn name(&self) -> &'static str {
        "monte_carlo"
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Play> {
        match self.selector.best_play(ctx.seat, ctx.hand, ctx.round) {
            Ok(choice) => choice,
            Err(err) => {
                // Falls back to the greedy move so a game can always continue.
                event!(
                    target: "pokai_bot::selector",
                    Level::WARN,
                    seat = ?ctx.seat,
                    error = %err,
                    "estimate failed, playing greedily"
                );
                greedy_play(ctx.hand, ctx.round, self.selector.config()).map(|play| play.with_actor(ctx.seat))
            }
        }
    }
}
