//! CLI definition and dispatch.
//!
//! Every command loads an INI config, validates it, opens the CSV history
//! directory, runs one engine operation and prints the result to stdout as
//! text or JSON. Progress goes to stderr through `tracing`.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvHistoryAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::batch::{self, CashCow};
use crate::domain::config_validation::{validate_data_config, validate_engine_config};
use crate::domain::engine_config::EngineConfig;
use crate::domain::error::EngineError;
use crate::domain::player::{Player, PlayerId, Position};
use crate::domain::price::{PriceConfig, PriceTrajectory};
use crate::domain::projection::{ProjectionResult, ProjectionWeights};
use crate::domain::roster::parse_player_ids;
use crate::domain::trade::{self, TradeComparison, TradeConfig, TradeOption, WeeksToBreakeven};
use crate::domain::valuation::{ScoreHints, ValuationConfig, ValuationResult};
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::HistoryPort;

#[derive(Parser, Debug)]
#[command(
    name = "rosteredge",
    about = "Fantasy score projection and price valuation engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project one player's score for a round
    Project {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        player: PlayerId,
        #[arg(short, long)]
        round: u32,
        #[arg(long)]
        json: bool,
    },
    /// Project every player (optionally one position) for a round
    ProjectAll {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        round: u32,
        #[arg(long)]
        position: Option<Position>,
        #[arg(long)]
        json: bool,
    },
    /// Simulate a player's price over the coming rounds
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        player: PlayerId,
        #[arg(short, long)]
        round: u32,
        #[arg(long, default_value_t = 5)]
        rounds: u32,
        #[arg(long)]
        json: bool,
    },
    /// Ceiling/floor valuation and price trend for a player
    Value {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        player: PlayerId,
        #[arg(short, long)]
        round: u32,
        #[arg(long, default_value_t = 5)]
        rounds: u32,
        #[arg(long)]
        ceiling: Option<f64>,
        #[arg(long)]
        floor: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Compare trading one player out for another
    Trade {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long = "in")]
        player_in: PlayerId,
        #[arg(long = "out")]
        player_out: PlayerId,
        /// Current roster as comma-separated ids; enables roster checks
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        weeks: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// List affordable upgrades at a position, best value first
    TradeOptions {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        position: Position,
        #[arg(long)]
        cash: i64,
        #[arg(long)]
        team: String,
        #[arg(long, default_value_t = 0.0)]
        min_score: f64,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Rank low-priced players by simulated price growth
    CashCows {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        round: u32,
        #[arg(long, default_value_t = 5)]
        rounds: u32,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Project {
            config,
            data,
            player,
            round,
            json,
        } => run_project(&config, data.as_deref(), player, round, json),
        Command::ProjectAll {
            config,
            data,
            round,
            position,
            json,
        } => run_project_all(&config, data.as_deref(), round, position, json),
        Command::Simulate {
            config,
            data,
            player,
            round,
            rounds,
            json,
        } => run_simulate(&config, data.as_deref(), player, round, rounds, json),
        Command::Value {
            config,
            data,
            player,
            round,
            rounds,
            ceiling,
            floor,
            json,
        } => run_value(
            &config,
            data.as_deref(),
            player,
            round,
            rounds,
            ScoreHints {
                ceiling,
                floor,
                projected_score: None,
            },
            json,
        ),
        Command::Trade {
            config,
            data,
            player_in,
            player_out,
            team,
            weeks,
            json,
        } => run_trade(
            &config,
            data.as_deref(),
            player_in,
            player_out,
            team.as_deref(),
            weeks,
            json,
        ),
        Command::TradeOptions {
            config,
            data,
            position,
            cash,
            team,
            min_score,
            limit,
            json,
        } => run_trade_options(
            &config,
            data.as_deref(),
            position,
            cash,
            &team,
            min_score,
            limit,
            json,
        ),
        Command::CashCows {
            config,
            data,
            round,
            rounds,
            limit,
            json,
        } => run_cash_cows(&config, data.as_deref(), round, rounds, limit, json),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Everything a command needs: parsed config, engine settings and history.
pub struct Session {
    pub config: FileConfigAdapter,
    pub engine: EngineConfig,
    pub history: CsvHistoryAdapter,
}

impl Session {
    fn json(&self, flag: bool) -> bool {
        flag || self.config.get_bool("output", "json", false)
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, EngineError> {
    info!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path)?;
    for section in adapter.unknown_sections() {
        warn!(section = %section, "ignoring unknown config section");
    }
    Ok(adapter)
}

pub fn open_session(config_path: &Path, data_override: Option<&Path>) -> Result<Session, EngineError> {
    let config = load_config(config_path)?;
    let engine = build_engine_config(&config)?;
    let data_path = resolve_data_path(data_override, &config)?;
    let history = CsvHistoryAdapter::from_dir(&data_path)?;
    Ok(Session {
        config,
        engine,
        history,
    })
}

/// Validates the engine sections and builds [`EngineConfig`], falling back
/// to defaults for absent keys.
pub fn build_engine_config(adapter: &dyn ConfigPort) -> Result<EngineConfig, EngineError> {
    validate_engine_config(adapter)?;

    let d = ProjectionWeights::default();
    let weights = ProjectionWeights {
        season_average: adapter.get_double("projection", "season_average", d.season_average),
        last_three: adapter.get_double("projection", "last_three", d.last_three),
        last_five: adapter.get_double("projection", "last_five", d.last_five),
        last_vs_opponent: adapter.get_double("projection", "last_vs_opponent", d.last_vs_opponent),
        last_three_vs_opponent: adapter.get_double(
            "projection",
            "last_three_vs_opponent",
            d.last_three_vs_opponent,
        ),
        last_at_venue: adapter.get_double("projection", "last_at_venue", d.last_at_venue),
        last_three_at_venue: adapter.get_double(
            "projection",
            "last_three_at_venue",
            d.last_three_at_venue,
        ),
    };

    let price = PriceConfig {
        magic_number: adapter.get_double(
            "price",
            "magic_number",
            PriceConfig::default().magic_number,
        ),
    };

    let v = ValuationConfig::default();
    let valuation = ValuationConfig {
        magic_number: price.magic_number,
        ceiling_multiplier: adapter.get_double("valuation", "ceiling_multiplier", v.ceiling_multiplier),
        floor_multiplier: adapter.get_double("valuation", "floor_multiplier", v.floor_multiplier),
        default_ceiling_score: adapter.get_double(
            "valuation",
            "default_ceiling_score",
            v.default_ceiling_score,
        ),
        default_floor_score: adapter.get_double(
            "valuation",
            "default_floor_score",
            v.default_floor_score,
        ),
    };

    let t = TradeConfig::default();
    let trade = TradeConfig {
        price_factor: adapter.get_double("trade", "price_factor", t.price_factor),
        rookie_max_price: adapter.get_int("trade", "rookie_max_price", t.rookie_max_price),
        premium_min_price: adapter.get_int("trade", "premium_min_price", t.premium_min_price),
        weeks: u32::try_from(adapter.get_int("trade", "weeks", i64::from(t.weeks))).map_err(
            |e| EngineError::ConfigInvalid {
                section: "trade".into(),
                key: "weeks".into(),
                reason: e.to_string(),
            },
        )?,
    };

    Ok(EngineConfig {
        weights,
        price,
        valuation,
        trade,
    })
}

pub fn resolve_data_path(
    data_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, EngineError> {
    if let Some(path) = data_override {
        return Ok(path.to_path_buf());
    }
    validate_data_config(config)?;
    config
        .get_string("data", "path")
        .map(|p| PathBuf::from(p.trim()))
        .ok_or_else(|| EngineError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

/// Parses `--team` into player ids.
pub fn resolve_team(team: &str) -> Result<Vec<PlayerId>, EngineError> {
    parse_player_ids(team).map_err(|e| EngineError::ConfigInvalid {
        section: "cli".into(),
        key: "team".into(),
        reason: e.to_string(),
    })
}

fn emit<T: Serialize>(value: &T, json: bool, text: impl FnOnce(&T)) -> Result<(), EngineError> {
    if json {
        let out = serde_json::to_string_pretty(value).map_err(|e| EngineError::Data {
            reason: format!("failed to serialize output: {e}"),
        })?;
        println!("{out}");
    } else {
        text(value);
    }
    Ok(())
}

fn run_project(
    config_path: &Path,
    data: Option<&Path>,
    player_id: PlayerId,
    round: u32,
    json: bool,
) -> Result<(), EngineError> {
    let session = open_session(config_path, data)?;
    let player = batch::require_player(&session.history, player_id)?;
    let projection = batch::project_player(&session.engine.projector(), &session.history, &player, round)?;
    emit(&projection, session.json(json), |p| print_projection(&player, p))
}

fn run_project_all(
    config_path: &Path,
    data: Option<&Path>,
    round: u32,
    position: Option<Position>,
    json: bool,
) -> Result<(), EngineError> {
    let session = open_session(config_path, data)?;
    let players: Vec<Player> = session
        .history
        .list_players()?
        .into_iter()
        .filter(|p| position.is_none_or(|pos| p.position == pos))
        .collect();

    let results = batch::project_pool(&session.engine.projector(), &session.history, &players, round);

    let mut projections = Vec::with_capacity(results.len());
    for (id, result) in results {
        match result {
            Ok(p) => projections.push(p),
            Err(e) => warn!(player_id = id, error = %e, "skipping player"),
        }
    }
    info!(
        projected = projections.len(),
        skipped = players.len() - projections.len(),
        "pool projection complete"
    );

    emit(&projections, session.json(json), |rows| {
        println!("{:<6} {:<24} {:>5} {:>5} {:>10}", "ID", "NAME", "PROJ", "CONF", "COMPLETE");
        for p in rows {
            let name = players
                .iter()
                .find(|pl| pl.id == p.player_id)
                .map_or("", |pl| pl.name.as_str());
            println!(
                "{:<6} {:<24} {:>5} {:>5} {:>9.1}%",
                p.player_id, name, p.projected_score, p.confidence, p.factors.data_completeness
            );
        }
    })
}

#[derive(Serialize)]
struct SimulationOutput {
    projections: Vec<ProjectionResult>,
    trajectory: PriceTrajectory,
}

fn run_simulate(
    config_path: &Path,
    data: Option<&Path>,
    player_id: PlayerId,
    round: u32,
    rounds: u32,
    json: bool,
) -> Result<(), EngineError> {
    let session = open_session(config_path, data)?;
    let player = batch::require_player(&session.history, player_id)?;
    let (projections, trajectory) = batch::simulate_player(
        &session.engine.projector(),
        &session.engine.simulator(),
        &session.history,
        &player,
        round,
        rounds,
    )?;
    let output = SimulationOutput {
        projections,
        trajectory,
    };
    emit(&output, session.json(json), |o| {
        println!("{} ({}, {})", player.name, player.position, player.team);
        print_trajectory(&o.trajectory);
    })
}

fn run_value(
    config_path: &Path,
    data: Option<&Path>,
    player_id: PlayerId,
    round: u32,
    rounds: u32,
    hints: ScoreHints,
    json: bool,
) -> Result<(), EngineError> {
    let session = open_session(config_path, data)?;
    let player = batch::require_player(&session.history, player_id)?;
    let (projections, trajectory) = batch::simulate_player(
        &session.engine.projector(),
        &session.engine.simulator(),
        &session.history,
        &player,
        round,
        rounds,
    )?;
    let hints = ScoreHints {
        projected_score: projections.first().map(|p| p.projected_score),
        ..hints
    };
    let valuation = session.engine.analyzer().analyze(&player, &trajectory, hints);
    emit(&valuation, session.json(json), |v| print_valuation(&player, v))
}

fn run_trade(
    config_path: &Path,
    data: Option<&Path>,
    in_id: PlayerId,
    out_id: PlayerId,
    team: Option<&str>,
    weeks: Option<u32>,
    json: bool,
) -> Result<(), EngineError> {
    let session = open_session(config_path, data)?;
    let player_in = batch::require_player(&session.history, in_id)?;
    let player_out = batch::require_player(&session.history, out_id)?;
    let weeks = weeks.unwrap_or(session.engine.trade.weeks);
    let evaluator = session.engine.evaluator();

    let comparison = match team {
        Some(t) => {
            let roster = resolve_team(t)?;
            evaluator.evaluate_for_team(&roster, &player_in, &player_out, weeks)?
        }
        None => evaluator.evaluate(&player_in, &player_out, weeks),
    };
    emit(&comparison, session.json(json), print_trade)
}

#[allow(clippy::too_many_arguments)]
fn run_trade_options(
    config_path: &Path,
    data: Option<&Path>,
    position: Position,
    cash: i64,
    team: &str,
    min_score: f64,
    limit: usize,
    json: bool,
) -> Result<(), EngineError> {
    let session = open_session(config_path, data)?;
    let roster = resolve_team(team)?;
    let players = session.history.list_players()?;
    let mut options = trade::find_trade_options(position, cash, &players, &roster, min_score)?;
    info!(options = options.len(), %position, "trade options found");
    options.truncate(limit);
    emit(&options, session.json(json), |o| print_options(o))
}

fn run_cash_cows(
    config_path: &Path,
    data: Option<&Path>,
    round: u32,
    rounds: u32,
    limit: usize,
    json: bool,
) -> Result<(), EngineError> {
    let session = open_session(config_path, data)?;
    let players = session.history.list_players()?;
    let mut cows = batch::rank_cash_cows(
        &session.engine.projector(),
        &session.engine.simulator(),
        &session.history,
        &players,
        round,
        rounds,
        session.engine.trade.rookie_max_price,
    );
    cows.truncate(limit);
    emit(&cows, session.json(json), |c| print_cash_cows(c))
}

fn run_validate(config_path: &Path) -> Result<(), EngineError> {
    eprintln!("Validating config: {}", config_path.display());
    let config = load_config(config_path)?;
    let engine = build_engine_config(&config)?;
    validate_data_config(&config)?;

    eprintln!("\nProjection weights (sum {:.2}):", engine.weights.total());
    eprintln!("  season_average:         {:.2}", engine.weights.season_average);
    eprintln!("  last_three:             {:.2}", engine.weights.last_three);
    eprintln!("  last_five:              {:.2}", engine.weights.last_five);
    eprintln!("  last_vs_opponent:       {:.2}", engine.weights.last_vs_opponent);
    eprintln!("  last_three_vs_opponent: {:.2}", engine.weights.last_three_vs_opponent);
    eprintln!("  last_at_venue:          {:.2}", engine.weights.last_at_venue);
    eprintln!("  last_three_at_venue:    {:.2}", engine.weights.last_three_at_venue);
    eprintln!("\nPrice:  magic_number = {}", engine.price.magic_number);
    eprintln!("Trade:  price_factor = {}, weeks = {}", engine.trade.price_factor, engine.trade.weeks);

    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn print_projection(player: &Player, p: &ProjectionResult) {
    println!("{} ({}, {}) round {}", player.name, player.position, player.team, p.round);
    println!("  Projected score:   {}", p.projected_score);
    println!("  Confidence:        {}", p.confidence);
    println!("  Data completeness: {:.1}%", p.factors.data_completeness);
    println!("  Recent form:       {:?}", p.factors.recent_form);
    println!("  Opponent:          {:?}", p.factors.opponent_difficulty);
    println!("  Venue:             {:?}", p.factors.venue_advantage);
    println!("  Breakdown:");
    for c in &p.breakdown {
        let value = c.value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
        println!(
            "    {:<22} {:>7} x {:.2} = {:>6.1}",
            format!("{:?}", c.kind),
            value,
            c.weight,
            c.contribution
        );
    }
}

fn print_trajectory(t: &PriceTrajectory) {
    println!("  {:>5} {:>10} {:>9}", "ROUND", "PRICE", "BREAKEVEN");
    for point in &t.points {
        println!("  {:>5} {:>10} {:>9}", point.round, point.price, point.breakeven);
    }
    let sign = if t.total_change() >= 0 { "+" } else { "" };
    println!("  Total change: {}{}", sign, t.total_change());
}

fn print_valuation(player: &Player, v: &ValuationResult) {
    println!("{} ({}, {})", player.name, player.position, player.team);
    println!("  Current price:   {}", player.price);
    println!("  Projected price: {}", v.projected_price);
    println!("  Ceiling: {} (score {:.1}), gain {}", v.ceiling_price, v.ceiling_score, v.potential_gain);
    println!("  Floor:   {} (score {:.1}), loss {}", v.floor_price, v.floor_score, v.potential_loss);
    println!("  Trend:   {}", v.trend);
    println!("  {}", v.trend_recommendation);
    println!("  {}", v.recommendation);
}

fn print_trade(c: &TradeComparison) {
    println!("IN:  {} ({}, avg {:.1})", c.player_in.name, c.player_in.price, c.player_in.average);
    println!("OUT: {} ({}, avg {:.1})", c.player_out.name, c.player_out.price, c.player_out.average);
    println!("  Price diff:         {}", c.price_diff);
    println!("  Weekly score diff:  {:.1}", c.weekly_score_diff);
    println!("  Total over {} weeks: {:.1}", c.weeks, c.total_score_diff);
    println!("  ROI per $10k:       {:.2}", c.roi);
    match c.weeks_to_breakeven {
        WeeksToBreakeven::Rounds(n) => println!("  Weeks to breakeven: {n}"),
        WeeksToBreakeven::Unbounded => println!("  Weeks to breakeven: never"),
    }
    println!(
        "  Projected prices:   in {} ({:+}), out {} ({:+})",
        c.player_in.projected_price,
        c.player_in.projected_price_change,
        c.player_out.projected_price,
        c.player_out.projected_price_change
    );
    if c.is_rookie_to_premium {
        println!("  Rookie to premium upgrade");
    }
}

fn print_options(options: &[TradeOption]) {
    if options.is_empty() {
        eprintln!("No improving trades found");
        return;
    }
    for o in options {
        println!(
            "  {} -> {}: {:+.1} pts, {:+} cash, {:.2} per $10k",
            o.out_name, o.in_name, o.score_diff, o.price_diff, o.value
        );
    }
}

fn print_cash_cows(cows: &[CashCow]) {
    for c in cows {
        println!(
            "  {:<24} {:>8} -> {:>8} ({:+}), peaks round {}",
            c.name, c.price, c.projected_price, c.projected_gain, c.peak_round
        );
    }
}
