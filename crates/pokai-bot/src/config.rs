use pokai_core::model::family::Family;
use serde::{Deserialize, Serialize};

/// Monte-Carlo sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Simulated games per estimate.
    pub trials: usize,
    /// Parallel workers the trials are split across.
    pub workers: usize,
    /// Seeds every worker deterministically when set.
    pub seed: Option<u64>,
    /// Moves after which a simulated game is abandoned.
    pub step_limit: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            workers: 4,
            seed: None,
            step_limit: 1000,
        }
    }
}

/// Tuning shared by the greedy and Monte-Carlo players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Families tried in order when leading.
    pub lead_priority: Vec<Family>,
    /// Attachment card counts tried in order when leading a triple.
    pub triple_attachments: Vec<usize>,
    /// Attachment card counts tried in order when leading a plane.
    pub plane_attachments: Vec<usize>,
    /// Attachment card counts tried in order when leading a quadruple.
    pub quadruple_attachments: Vec<usize>,
    /// Lead the longest straight available rather than the shortest.
    pub long_straight_priority: bool,
    /// Bomb when the standing play's actor holds at most this many cards per
    /// bomb in hand.
    pub bomb_threshold: usize,
    /// Minimum win-rate gain over passing before a follow play is made. The
    /// negative default keeps playing unless passing is better by over 0.05.
    pub pass_margin: f64,
    /// Caps how many candidates per family the selector scores.
    pub candidate_limit: Option<usize>,
    pub estimator: EstimatorConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            lead_priority: Family::LEAD_PRIORITY.to_vec(),
            triple_attachments: vec![2, 1, 0],
            plane_attachments: vec![2, 4, 0],
            quadruple_attachments: vec![4, 2, 0],
            long_straight_priority: true,
            bomb_threshold: 5,
            pass_margin: -0.05,
            candidate_limit: None,
            estimator: EstimatorConfig::default(),
        }
    }
}

impl PolicyConfig {
    /// Defaults overridden by `POKAI_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    /// Preferred attachment counts for leading `family`.
    pub fn attachment_order(&self, family: Family) -> &[usize] {
        match family {
            Family::Triple => self.triple_attachments.as_slice(),
            Family::AdjacentTriple => self.plane_attachments.as_slice(),
            Family::Quadruple => self.quadruple_attachments.as_slice(),
            _ => &[0],
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.estimator.seed = seed;
        self
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(trials) = read("POKAI_TRIALS")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
        {
            config.estimator.trials = trials;
        }

        if let Some(workers) = read("POKAI_WORKERS")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
        {
            config.estimator.workers = workers;
        }

        if let Some(margin) = read("POKAI_PASS_MARGIN")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
        {
            config.pass_margin = margin;
        }

        if let Some(threshold) =
            read("POKAI_BOMB_THRESHOLD").and_then(|raw| raw.trim().parse::<usize>().ok())
        {
            config.bomb_threshold = threshold;
        }

        config.estimator.seed = read("POKAI_SEED").and_then(|raw| raw.trim().parse::<u64>().ok());
        config
    }
}
