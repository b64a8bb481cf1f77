use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use pokai_bot::config::PolicyConfig;
use pokai_bot::policy::{GreedyPolicy, MonteCarloPolicy, Policy, PolicyContext};
use pokai_core::model::card::format_cards;
use pokai_core::model::deck::Deck;
use pokai_core::model::hand::Hand;
use pokai_core::model::player::{PLAYER_COUNT, PlayerPosition};
use pokai_core::model::round::RoundState;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentConfig, AgentKind, BenchmarkConfig, ResolvedOutputs};
use crate::logging::telemetry_path;
use crate::summary::{SummaryCollector, SummaryError};

/// Moves after which a game is declared stuck.
const MAX_MOVES_PER_GAME: usize = 2_000;

/// Plays seeded self-play games between three configured agents.
pub struct GameRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
}

pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl GameRunner {
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.agents.len() != PLAYER_COUNT {
            return Err(RunnerError::SeatCount {
                found: config.agents.len(),
            });
        }
        let agents = config.agents.iter().map(AgentBlueprint::from_config).collect();
        Ok(Self {
            config,
            outputs,
            agents,
        })
    }

    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(&self.outputs.jsonl)?;
        ensure_parent(&self.outputs.summary_md)?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut collector = SummaryCollector::new(&self.config.agents);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let mut rows_written = 0usize;

        for game_index in 0..self.config.deals.games {
            let deal_seed = rng.next_u64();
            let outcome = self.play_game(game_index, deal_seed)?;
            collector.record(&outcome);
            rows_written += self.write_game_rows(&mut writer, game_index, deal_seed, &outcome)?;
        }
        writer.flush()?;

        let report = collector.finalize();
        report.write_markdown(&self.outputs.summary_md, &self.config.run_id)?;

        let telemetry_path = self
            .config
            .logging
            .enable_structured
            .then(|| telemetry_path(&self.outputs.jsonl));

        Ok(RunSummary {
            games_played: self.config.deals.games,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn play_game(&self, game_index: usize, deal_seed: u64) -> Result<GameOutcome, RunnerError> {
        let landlord = PlayerPosition::LOOP[game_index % PLAYER_COUNT];
        let deck = Deck::shuffled_with_seed(deal_seed);
        let mut hands = deck.deal_landlord(landlord).map(Hand::new);
        let mut round = RoundState::landlord(landlord);
        let mut seats: Vec<SeatState> = PlayerPosition::LOOP
            .iter()
            .zip(&self.agents)
            .map(|(&seat, agent)| SeatState::new(seat, agent, deal_seed))
            .collect();

        let logging_enabled = self.config.logging.enable_structured;
        let mut moves = 0usize;
        let winner = loop {
            if let Some(winner) = round.winner() {
                break winner;
            }
            if moves >= MAX_MOVES_PER_GAME {
                return Err(RunnerError::game(format!(
                    "game {game_index} did not finish within {MAX_MOVES_PER_GAME} moves"
                )));
            }
            moves += 1;

            let seat = round.turn();
            let state = &mut seats[seat.index()];
            let ctx = PolicyContext {
                seat,
                hand: &hands[seat.index()],
                round: &round,
            };
            let started = Instant::now();
            let choice = state.policy.choose_play(&ctx);
            let elapsed_ms = state.metrics.record(started.elapsed());

            match choice {
                Some(play) => {
                    round
                        .validate(&play)
                        .map_err(|source| RunnerError::illegal(game_index, seat, source))?;
                    hands[seat.index()]
                        .remove(play.cards())
                        .map_err(|source| RunnerError::illegal(game_index, seat, source))?;

                    if logging_enabled && tracing::enabled!(Level::INFO) {
                        event!(
                            target: "pokai_bench::game",
                            Level::INFO,
                            run_id = %self.config.run_id,
                            game_index,
                            seat = seat.index(),
                            agent = %state.agent_name,
                            family = %play.family(),
                            cards = %format_cards(play.cards()),
                            remaining = hands[seat.index()].len(),
                            elapsed_ms,
                        );
                    }

                    round
                        .apply(play)
                        .map_err(|source| RunnerError::illegal(game_index, seat, source))?;
                    round.advance_turn();
                }
                None => {
                    if logging_enabled && tracing::enabled!(Level::DEBUG) {
                        event!(
                            target: "pokai_bench::game",
                            Level::DEBUG,
                            run_id = %self.config.run_id,
                            game_index,
                            seat = seat.index(),
                            agent = %state.agent_name,
                            elapsed_ms,
                            "pass"
                        );
                    }
                    round
                        .pass()
                        .map_err(|source| RunnerError::illegal(game_index, seat, source))?;
                }
            }
        };

        if logging_enabled {
            event!(
                target: "pokai_bench::game",
                Level::INFO,
                run_id = %self.config.run_id,
                game_index,
                deal_seed,
                landlord = landlord.index(),
                winner = winner.index(),
                moves,
                "game finished"
            );
        }

        let seat_results = seats
            .into_iter()
            .map(|state| SeatResult {
                agent_name: state.agent_name,
                kind: state.kind,
                seat: state.seat,
                landlord: state.seat == landlord,
                won: state.seat == winner,
                cards_left: hands[state.seat.index()].len(),
                metrics: state.metrics.finalize(),
            })
            .collect();

        Ok(GameOutcome {
            landlord,
            winner,
            moves,
            seat_results,
        })
    }

    fn write_game_rows(
        &self,
        writer: &mut BufWriter<File>,
        game_index: usize,
        deal_seed: u64,
        outcome: &GameOutcome,
    ) -> Result<usize, RunnerError> {
        for result in &outcome.seat_results {
            let row = GameLogRow {
                run_id: self.config.run_id.clone(),
                game_index,
                deal_seed,
                seat: result.seat.index(),
                agent: result.agent_name.clone(),
                kind: result.kind,
                landlord: result.landlord,
                won: result.won,
                cards_left: result.cards_left,
                moves: outcome.moves,
                decisions: result.metrics.decisions,
                speed_ms_turn: result.metrics.avg_ms_per_decision,
            };
            serde_json::to_writer(&mut *writer, &row)?;
            writer.write_all(b"\n")?;
        }
        Ok(outcome.seat_results.len())
    }
}

fn ensure_parent(path: &Path) -> Result<(), RunnerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

struct SeatState {
    seat: PlayerPosition,
    agent_name: String,
    kind: AgentKind,
    policy: Box<dyn Policy>,
    metrics: DecisionMetrics,
}

impl SeatState {
    fn new(seat: PlayerPosition, agent: &AgentBlueprint, deal_seed: u64) -> Self {
        Self {
            seat,
            agent_name: agent.name.clone(),
            kind: agent.kind,
            policy: agent.spawn_policy(deal_seed),
            metrics: DecisionMetrics::default(),
        }
    }
}

pub struct GameOutcome {
    pub landlord: PlayerPosition,
    pub winner: PlayerPosition,
    pub moves: usize,
    pub seat_results: Vec<SeatResult>,
}

pub struct SeatResult {
    pub agent_name: String,
    pub kind: AgentKind,
    pub seat: PlayerPosition,
    pub landlord: bool,
    pub won: bool,
    pub cards_left: usize,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_index: usize,
    deal_seed: u64,
    seat: usize,
    agent: String,
    kind: AgentKind,
    landlord: bool,
    won: bool,
    cards_left: usize,
    moves: usize,
    decisions: u32,
    speed_ms_turn: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {message}")]
    Game { message: String },
    #[error("game {game}: {seat} made an illegal move: {source}")]
    IllegalMove {
        game: usize,
        seat: PlayerPosition,
        #[source]
        source: pokai_core::Error,
    },
    #[error("configuration requires exactly 3 agents but found {found}")]
    SeatCount { found: usize },
    #[error("summary error: {0}")]
    Summary(#[from] SummaryError),
}

impl RunnerError {
    fn game(message: String) -> Self {
        RunnerError::Game { message }
    }

    fn illegal(game: usize, seat: PlayerPosition, source: impl Into<pokai_core::Error>) -> Self {
        RunnerError::IllegalMove {
            game,
            seat,
            source: source.into(),
        }
    }
}

struct AgentBlueprint {
    name: String,
    kind: AgentKind,
    params: PolicyConfig,
}

impl AgentBlueprint {
    fn from_config(config: &AgentConfig) -> Self {
        Self {
            name: config.name.clone(),
            kind: config.kind,
            params: config.params.clone(),
        }
    }

    /// Unseeded sampling agents draw from the deal seed so runs replay exactly.
    fn spawn_policy(&self, deal_seed: u64) -> Box<dyn Policy> {
        match self.kind {
            AgentKind::Greedy => Box::new(GreedyPolicy::new(self.params.clone())),
            AgentKind::MonteCarlo => {
                let seed = self.params.estimator.seed.unwrap_or(deal_seed);
                Box::new(MonteCarloPolicy::new(self.params.clone().with_seed(Some(seed))))
            }
        }
    }
}
