mod greedy;
mod monte_carlo;

pub use greedy::{GreedyPolicy, greedy_play};
pub use monte_carlo::MonteCarloPolicy;

use pokai_core::model::hand::Hand;
use pokai_core::model::play::Play;
use pokai_core::model::player::PlayerPosition;
use pokai_core::model::round::RoundState;

/// Context provided to policies for decision-making
pub struct PolicyContext<'a> {
    pub seat: PlayerPosition,
    pub hand: &'a Hand,
    pub round: &'a RoundState,
}

/// Unified interface for computer players.
pub trait Policy: Send {
    /// Short label used in logs and reports.
    fn name(&self) -> &'static str;

    /// Play for the seat to move, or `None` to pass.
    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Play>;
}
