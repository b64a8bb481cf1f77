use std::collections::HashMap;
use std::fs;
use std::path::Path;

use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::{AgentConfig, AgentKind};
use crate::runner::GameOutcome;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-agent results across a run.
pub struct SummaryCollector {
    agents: HashMap<String, AgentAccumulator>,
    agent_order: Vec<String>,
}

impl SummaryCollector {
    pub fn new(agents: &[AgentConfig]) -> Self {
        let order = agents.iter().map(|agent| agent.name.clone()).collect();
        let agents = agents
            .iter()
            .map(|agent| (agent.name.clone(), AgentAccumulator::new(agent.kind)))
            .collect();
        Self {
            agents,
            agent_order: order,
        }
    }

    pub fn record(&mut self, outcome: &GameOutcome) {
        for result in &outcome.seat_results {
            let Some(acc) = self.agents.get_mut(&result.agent_name) else {
                continue;
            };
            let won = if result.won { 1.0 } else { 0.0 };
            acc.outcomes.push(won);
            if result.landlord {
                acc.landlord_games += 1;
                if result.won {
                    acc.landlord_wins += 1;
                }
            }
            if !result.won {
                acc.cards_left_on_loss += result.cards_left;
            }
            acc.total_latency_ms +=
                result.metrics.avg_ms_per_decision * f64::from(result.metrics.decisions);
            acc.total_decisions += u64::from(result.metrics.decisions);
        }
    }

    pub fn finalize(mut self) -> SummaryReport {
        let agents = self
            .agent_order
            .iter()
            .filter_map(|name| {
                self.agents
                    .remove(name)
                    .map(|acc| acc.into_report(name.clone()))
            })
            .collect();
        SummaryReport { agents }
    }
}

struct AgentAccumulator {
    kind: AgentKind,
    outcomes: Vec<f64>,
    landlord_games: u32,
    landlord_wins: u32,
    cards_left_on_loss: usize,
    total_latency_ms: f64,
    total_decisions: u64,
}

impl AgentAccumulator {
    fn new(kind: AgentKind) -> Self {
        Self {
            kind,
            outcomes: Vec::new(),
            landlord_games: 0,
            landlord_wins: 0,
            cards_left_on_loss: 0,
            total_latency_ms: 0.0,
            total_decisions: 0,
        }
    }

    fn into_report(self, name: String) -> AgentReport {
        let games = self.outcomes.len();
        let wins = self.outcomes.iter().filter(|&&won| won > 0.0).count();
        let losses = games - wins;
        AgentReport {
            name,
            kind: self.kind,
            games,
            wins,
            win_rate: ratio(wins as f64, games as f64),
            ci95: confidence_interval(&self.outcomes),
            landlord_games: self.landlord_games,
            landlord_wins: self.landlord_wins,
            avg_cards_left_on_loss: ratio(self.cards_left_on_loss as f64, losses as f64),
            average_ms_per_decision: ratio(self.total_latency_ms, self.total_decisions as f64),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentReport {
    pub name: String,
    pub kind: AgentKind,
    pub games: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub ci95: (f64, f64),
    pub landlord_games: u32,
    pub landlord_wins: u32,
    pub avg_cards_left_on_loss: f64,
    pub average_ms_per_decision: f64,
}

#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub agents: Vec<AgentReport>,
}

impl SummaryReport {
    pub fn write_markdown(&self, path: impl AsRef<Path>, run_id: &str) -> Result<(), SummaryError> {
        fs::write(path.as_ref(), self.to_markdown(run_id)).map_err(|source| SummaryError::Io {
            context: "writing summary markdown",
            source,
        })
    }

    pub fn to_markdown(&self, run_id: &str) -> String {
        let mut rows = String::new();
        rows.push_str(&format!("# Self-play Summary: {run_id}\n\n"));
        rows.push_str("| Agent | Kind | Games | Wins | Win % | 95% CI | Landlord W/G | Avg cards left on loss | Avg ms/decision |\n");
        rows.push_str("|-------|------|-------|------|-------|--------|--------------|------------------------|-----------------|\n");

        for agent in &self.agents {
            rows.push_str(&format!(
                "| {name} | {kind:?} | {games} | {wins} | {win:.1}% | [{ci_low:.3}, {ci_high:.3}] | {lw}/{lg} | {left:.2} | {latency:.2} |\n",
                name = agent.name,
                kind = agent.kind,
                games = agent.games,
                wins = agent.wins,
                win = agent.win_rate * 100.0,
                ci_low = agent.ci95.0,
                ci_high = agent.ci95.1,
                lw = agent.landlord_wins,
                lg = agent.landlord_games,
                left = agent.avg_cards_left_on_loss,
                latency = agent.average_ms_per_decision,
            ));
        }
        rows
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Two-sided 95% z value from the standard normal.
fn confidence_z() -> f64 {
    Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(0.975))
        .unwrap_or(1.96)
}

/// Normal-approximation interval of the mean, clamped to `[0, 1]`.
fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let margin = confidence_z() * std_error;
    ((mean - margin).max(0.0), (mean + margin).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{DecisionSummary, SeatResult};
    use pokai_bot::config::PolicyConfig;
    use pokai_core::model::player::PlayerPosition;

    fn agents() -> Vec<AgentConfig> {
        ["a", "b", "c"]
            .into_iter()
            .map(|name| AgentConfig {
                name: name.to_string(),
                kind: AgentKind::Greedy,
                params: PolicyConfig::default(),
            })
            .collect()
    }

    fn outcome(landlord: PlayerPosition, winner: PlayerPosition) -> GameOutcome {
        let seat_results = PlayerPosition::LOOP
            .into_iter()
            .zip(["a", "b", "c"])
            .map(|(seat, name)| SeatResult {
                agent_name: name.to_string(),
                kind: AgentKind::Greedy,
                seat,
                landlord: seat == landlord,
                won: seat == winner,
                cards_left: if seat == winner { 0 } else { 4 },
                metrics: DecisionSummary {
                    decisions: 2,
                    avg_ms_per_decision: 1.5,
                },
            })
            .collect();
        GameOutcome {
            landlord,
            winner,
            moves: 10,
            seat_results,
        }
    }

    #[test]
    fn z_matches_the_familiar_constant() {
        assert!((confidence_z() - 1.959964).abs() < 1e-4);
    }

    #[test]
    fn interval_brackets_the_mean_and_stays_in_unit_range() {
        let points = [1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let (low, high) = confidence_interval(&points);
        let mean = 4.0 / 6.0;
        assert!(low < mean && mean < high);
        assert!(low >= 0.0 && high <= 1.0);
        assert_eq!(confidence_interval(&[1.0]), (1.0, 1.0));
        assert_eq!(confidence_interval(&[]), (0.0, 0.0));
    }

    #[test]
    fn collector_counts_wins_and_landlord_games() {
        let mut collector = SummaryCollector::new(&agents());
        collector.record(&outcome(PlayerPosition::First, PlayerPosition::First));
        collector.record(&outcome(PlayerPosition::Second, PlayerPosition::First));
        let report = collector.finalize();

        let a = &report.agents[0];
        assert_eq!(a.name, "a");
        assert_eq!((a.games, a.wins), (2, 2));
        assert_eq!((a.landlord_wins, a.landlord_games), (1, 1));
        assert_eq!(a.avg_cards_left_on_loss, 0.0);

        let b = &report.agents[1];
        assert_eq!(b.wins, 0);
        assert_eq!(b.landlord_games, 1);
        assert_eq!(b.avg_cards_left_on_loss, 4.0);
        assert!((b.average_ms_per_decision - 1.5).abs() < 1e-9);

        let markdown = report.to_markdown("unit");
        assert!(markdown.starts_with("# Self-play Summary: unit"));
        assert!(markdown.contains("| a | Greedy | 2 | 2 | 100.0% |"));
    }
}
