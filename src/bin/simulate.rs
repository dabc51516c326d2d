use chrono::{SecondsFormat, Utc};
use clap::Parser;
use maze_chase::config::GameConfig;
use maze_chase::engine::GameEngine;
use maze_chase::movement::is_centered;
use maze_chase::session::Session;
use maze_chase::types::{Direction, GhostState, RuntimeEvent, Snapshot, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    single: bool,
    #[arg(long)]
    minutes: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct Scenario {
    name: String,
    minutes: u32,
    seed: u64,
    /// Autopilot turns away from ghosts closer than this many tiles. Zero never flees.
    #[serde(rename = "fleeRadius")]
    flee_radius: f32,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u64,
    minutes: u32,
    reason: String,
    ticks: u64,
    score: u32,
    level: u32,
    #[serde(rename = "pickupsConsumed")]
    pickups_consumed: u32,
    #[serde(rename = "ghostsCaptured")]
    ghosts_captured: u32,
    #[serde(rename = "livesLost")]
    lives_lost: u32,
    #[serde(rename = "modeChanges")]
    mode_changes: u32,
    #[serde(rename = "levelsCleared")]
    levels_cleared: u32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioRunResult {
    #[serde(flatten)]
    result: ScenarioResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
    finished_tick: u64,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "generatedAtIso")]
    generated_at_iso: String,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageScore")]
    average_score: u32,
    #[serde(rename = "reasonCounts")]
    reason_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let scenarios = resolve_scenarios(&cli);
    let run_started_at_ms = now_ms();
    let seed_hint = scenarios.first().map(|scenario| scenario.seed).unwrap_or(0);
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| default_match_id(seed_hint, run_started_at_ms));

    let log = RunLog::new(match_id.clone());

    let config = match cli.config.as_deref() {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(error) => {
                log.run_event(
                    "error",
                    "config_load_failed",
                    json!({
                        "path": path.to_string_lossy(),
                        "error": error.to_string(),
                    }),
                );
                std::process::exit(2);
            }
        },
        None => GameConfig::default(),
    };

    let mut has_anomaly = false;
    let mut scenario_results = Vec::new();
    let mut reason_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_anomalies = 0usize;

    for scenario in scenarios {
        log.scenario_event(
            "info",
            "scenario_started",
            &scenario,
            None,
            json!({
                "minutes": scenario.minutes,
                "fleeRadius": scenario.flee_radius,
            }),
        );
        let scenario_run = run_scenario(&scenario, &config);

        for anomaly in &scenario_run.anomaly_records {
            log.scenario_event(
                "warn",
                "anomaly_detected",
                &scenario,
                Some(anomaly.tick),
                json!({
                    "message": anomaly.message,
                }),
            );
        }

        if !scenario_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += scenario_run.anomaly_records.len();
        *reason_counts
            .entry(scenario_run.result.reason.clone())
            .or_insert(0) += 1;

        log.scenario_event(
            "info",
            "scenario_finished",
            &scenario,
            Some(scenario_run.finished_tick),
            json!({
                "reason": scenario_run.result.reason,
                "score": scenario_run.result.score,
                "level": scenario_run.result.level,
                "anomalyCount": scenario_run.anomaly_records.len(),
            }),
        );

        println!(
            "{}",
            serde_json::to_string(&scenario_run.result).expect("scenario result should serialize")
        );
        scenario_results.push(scenario_run.result);
    }

    let run_finished_at_ms = now_ms();
    let summary = build_run_summary(
        match_id.clone(),
        run_started_at_ms,
        run_finished_at_ms,
        scenario_results,
        reason_counts,
        total_anomalies,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            log.run_event(
                "error",
                "summary_write_failed",
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    log.run_event(
        "info",
        "run_finished",
        json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "averageScore": summary.average_score,
            "reasonCounts": summary.reason_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn run_scenario(scenario: &Scenario, config: &GameConfig) -> ScenarioRunResult {
    let mut engine = GameEngine::classic(config.clone());
    let mut session = Session::new(&config.scoring);
    let mut rng = StdRng::seed_from_u64(scenario.seed);
    let tick_limit = scenario.minutes as u64 * 60 * config.tick_rate as u64;

    let mut mode_changes = 0;
    let mut levels_cleared = 0;
    let mut anomalies = AnomalyLog::default();
    let mut last_pickups = engine.world.pickups_remaining();
    let mut last_tick = 0u64;

    while !engine.is_ended() && engine.tick() < tick_limit {
        if let Some(dir) = choose_autopilot_intent(&engine, &mut rng, scenario.flee_radius) {
            engine.set_player_intent(dir);
        }
        engine.step(&mut session);
        let snapshot = engine.build_snapshot(true);
        last_tick = snapshot.tick;

        for message in collect_snapshot_anomalies(&engine, &snapshot, last_pickups) {
            anomalies.record(snapshot.tick, message);
        }
        last_pickups = snapshot.pickups_remaining;

        for event in &snapshot.events {
            match event {
                RuntimeEvent::ModeChanged { .. } => mode_changes += 1,
                RuntimeEvent::LevelCleared { .. } => levels_cleared += 1,
                _ => {}
            }
        }
    }

    let summary = engine.build_summary(&session);
    let reason = if engine.is_ended() {
        "game_over"
    } else {
        "time_limit"
    };

    ScenarioRunResult {
        result: ScenarioResultLine {
            scenario: scenario.name.clone(),
            seed: scenario.seed,
            minutes: scenario.minutes,
            reason: reason.to_string(),
            ticks: summary.ticks,
            score: summary.score,
            level: summary.level,
            pickups_consumed: summary.pickups_consumed,
            ghosts_captured: summary.ghosts_captured,
            lives_lost: summary.lives_lost,
            mode_changes,
            levels_cleared,
            anomalies: anomalies.distinct,
        },
        anomaly_records: anomalies.records,
        finished_tick: last_tick,
    }
}

/// Picks a turn only near a tile center. Flees the nearest threatening ghost,
/// otherwise prefers exits with a pickup and wanders at random.
fn choose_autopilot_intent(
    engine: &GameEngine,
    rng: &mut StdRng,
    flee_radius: f32,
) -> Option<Direction> {
    let world = &engine.world;
    let player = engine.player();
    if !is_centered(world, player.pos, engine.config.player_speed) {
        return None;
    }
    let tile = player.tile(world);
    if !world.in_bounds(tile.x, tile.y) {
        return None;
    }
    let exits = world.open_directions(tile.x, tile.y);
    if exits.is_empty() {
        return None;
    }

    let threat = engine
        .ghosts()
        .iter()
        .filter(|ghost| matches!(ghost.state, GhostState::Scatter | GhostState::Chase))
        .map(|ghost| ghost.tile)
        .filter(|ghost_tile| ghost_tile.distance(tile) < flee_radius)
        .min_by(|a, b| a.distance(tile).total_cmp(&b.distance(tile)));
    if let Some(ghost_tile) = threat {
        return exits.iter().copied().max_by(|a, b| {
            tile.step(*a, 1)
                .distance(ghost_tile)
                .total_cmp(&tile.step(*b, 1).distance(ghost_tile))
        });
    }

    let forward: Vec<Direction> = exits
        .iter()
        .copied()
        .filter(|dir| *dir != player.dir.opposite())
        .collect();
    let options = if forward.is_empty() { exits } else { forward };
    let hungry: Vec<Direction> = options
        .iter()
        .copied()
        .filter(|dir| {
            let next: Vec2 = tile.step(*dir, 1);
            world.has_pickup(next.x, next.y)
        })
        .collect();
    if !hungry.is_empty() && !rng.random_bool(0.1) {
        return Some(hungry[rng.random_range(0..hungry.len())]);
    }
    Some(options[rng.random_range(0..options.len())])
}

fn collect_snapshot_anomalies(
    engine: &GameEngine,
    snapshot: &Snapshot,
    last_pickups: usize,
) -> Vec<String> {
    let mut anomalies = Vec::new();
    let level_cleared = snapshot
        .events
        .iter()
        .any(|event| matches!(event, RuntimeEvent::LevelCleared { .. }));
    if snapshot.pickups_remaining > last_pickups && !level_cleared {
        anomalies.push(format!(
            "pickups increased without a level clear: {last_pickups} -> {}",
            snapshot.pickups_remaining
        ));
    }

    if !snapshot.player.x.is_finite() || !snapshot.player.y.is_finite() {
        anomalies.push("player position is not finite".to_string());
    }

    for ghost in engine.ghosts() {
        if !ghost.is_on_lane(&engine.world) {
            anomalies.push(format!("ghost {} left its lane", ghost.id));
        }
        if ghost.blinking && ghost.state != GhostState::Vulnerable {
            anomalies.push(format!("ghost {} blinks while {:?}", ghost.id, ghost.state));
        }
        if ghost.state == GhostState::Inactive && !engine.is_frozen() && !engine.is_ended() {
            anomalies.push(format!("ghost {} inactive during play", ghost.id));
        }
    }
    anomalies
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = cli.seed.unwrap_or_else(now_ms);

    if cli.single || cli.minutes.is_some() {
        return vec![Scenario {
            name: "custom".to_string(),
            minutes: cli.minutes.unwrap_or(3).clamp(1, 30),
            seed,
            flee_radius: 4.0,
        }];
    }

    vec![
        Scenario {
            name: "quick-check-cautious".to_string(),
            minutes: 2,
            seed,
            flee_radius: 4.0,
        },
        Scenario {
            name: "long-run-reckless".to_string(),
            minutes: 5,
            seed: seed.wrapping_add(1),
            flee_radius: 0.0,
        },
    ]
}

/// Every anomaly with its tick, plus each distinct message once for the result line.
#[derive(Debug, Default)]
struct AnomalyLog {
    records: Vec<AnomalyRecord>,
    distinct: Vec<String>,
    seen: HashSet<String>,
}

impl AnomalyLog {
    fn record(&mut self, tick: u64, message: String) {
        if self.seen.insert(message.clone()) {
            self.distinct.push(message.clone());
        }
        self.records.push(AnomalyRecord { tick, message });
    }
}

fn default_match_id(seed: u64, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    match_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    scenarios: Vec<ScenarioResultLine>,
    reason_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let total_score: u64 = scenarios.iter().map(|scenario| scenario.score as u64).sum();
    let average_score = if scenario_count == 0 {
        0
    } else {
        (total_score / scenario_count as u64) as u32
    };
    RunSummary {
        match_id,
        started_at_ms,
        finished_at_ms,
        generated_at_iso: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        scenario_count,
        anomaly_count,
        average_score,
        reason_counts,
        scenarios,
    }
}

/// JSON-lines run log on stderr, stamped with the run's match id.
struct RunLog {
    match_id: String,
}

impl RunLog {
    fn new(match_id: String) -> Self {
        Self { match_id }
    }

    fn run_event(&self, level: &str, event: &str, details: Value) {
        self.write(self.line(level, event, None, None, details));
    }

    fn scenario_event(
        &self,
        level: &str,
        event: &str,
        scenario: &Scenario,
        tick: Option<u64>,
        details: Value,
    ) {
        self.write(self.line(level, event, Some(scenario), tick, details));
    }

    fn line(
        &self,
        level: &str,
        event: &str,
        scenario: Option<&Scenario>,
        tick: Option<u64>,
        details: Value,
    ) -> StructuredLogLine {
        StructuredLogLine {
            timestamp_ms: now_ms(),
            level: level.to_string(),
            event: event.to_string(),
            match_id: self.match_id.clone(),
            scenario: scenario.map(|scenario| scenario.name.clone()),
            seed: scenario.map(|scenario| scenario.seed),
            tick,
            details,
        }
    }

    fn write(&self, line: StructuredLogLine) {
        match serde_json::to_string(&line) {
            Ok(text) => eprintln!("{text}"),
            Err(error) => {
                tracing::error!(%error, event = %line.event, "run log line did not serialize")
            }
        }
    }
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_scenario_result(reason: &str, score: u32) -> ScenarioResultLine {
        ScenarioResultLine {
            scenario: "test".to_string(),
            seed: 42,
            minutes: 1,
            reason: reason.to_string(),
            ticks: 3_600,
            score,
            level: 1,
            pickups_consumed: 0,
            ghosts_captured: 0,
            lives_lost: 0,
            mode_changes: 0,
            levels_cleared: 0,
            anomalies: Vec::new(),
        }
    }

    #[test]
    fn default_match_id_contains_seed_and_timestamp() {
        assert_eq!(default_match_id(42, 123456789), "sim-42-123456789");
    }

    #[test]
    fn build_run_summary_calculates_average_score() {
        let summary = build_run_summary(
            "sim-42-1".to_string(),
            1,
            2,
            vec![
                make_scenario_result("time_limit", 600),
                make_scenario_result("game_over", 900),
            ],
            BTreeMap::from([
                ("time_limit".to_string(), 1usize),
                ("game_over".to_string(), 1usize),
            ]),
            1,
        );
        assert_eq!(summary.average_score, 750);
        assert_eq!(summary.scenario_count, 2);
        assert!(summary.generated_at_iso.ends_with('Z'));
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("missing").join("summary.json");
        let summary = build_run_summary(
            "sim-1-1".to_string(),
            1,
            2,
            vec![make_scenario_result("time_limit", 0)],
            BTreeMap::from([("time_limit".to_string(), 1usize)]),
            0,
        );
        assert!(write_summary(&target, &summary).is_err());

        let ok_target = dir.path().join("summary.json");
        write_summary(&ok_target, &summary).expect("summary written");
        let text = std::fs::read_to_string(&ok_target).expect("summary readable");
        assert!(text.contains("\"matchId\": \"sim-1-1\""));
    }

    #[test]
    fn anomaly_log_keeps_every_tick_but_reports_each_message_once() {
        let mut anomalies = AnomalyLog::default();
        anomalies.record(10, "ghost 2 left its lane".to_string());
        anomalies.record(11, "ghost 2 left its lane".to_string());
        anomalies.record(12, "player position is not finite".to_string());

        assert_eq!(anomalies.distinct.len(), 2);
        assert_eq!(anomalies.records.len(), 3);
        assert_eq!(anomalies.records[1].tick, 11);
    }

    #[test]
    fn run_log_lines_carry_the_scenario_scope() {
        let log = RunLog::new("sim-3-9".to_string());
        let scenario = Scenario {
            name: "unit".to_string(),
            minutes: 1,
            seed: 3,
            flee_radius: 0.0,
        };
        let scoped = log.line("info", "scenario_started", Some(&scenario), None, json!({}));
        let scoped = serde_json::to_value(scoped).expect("log line serializes");
        assert_eq!(scoped["matchId"], "sim-3-9");
        assert_eq!(scoped["scenario"], "unit");
        assert_eq!(scoped["seed"], 3);
        assert!(scoped.get("tick").is_none());

        let run_wide = log.line("info", "run_finished", None, Some(5), json!({}));
        let run_wide = serde_json::to_value(run_wide).expect("log line serializes");
        assert!(run_wide.get("scenario").is_none());
        assert_eq!(run_wide["tick"], 5);
    }

    #[test]
    fn single_flag_builds_one_custom_scenario() {
        let cli = Cli::parse_from(["simulate", "--single", "--seed", "7", "--minutes", "99"]);
        let scenarios = resolve_scenarios(&cli);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].seed, 7);
        assert_eq!(scenarios[0].minutes, 30);
    }

    #[test]
    fn short_scenario_runs_without_anomalies() {
        let scenario = Scenario {
            name: "unit".to_string(),
            minutes: 1,
            seed: 11,
            flee_radius: 4.0,
        };
        let run = run_scenario(&scenario, &GameConfig::default());
        assert!(run.result.anomalies.is_empty(), "{:?}", run.result.anomalies);
        assert!(run.result.pickups_consumed > 0);
        assert!(run.result.mode_changes > 0 || run.result.lives_lost > 0);
    }
}
