use crate::config::ScoringConfig;
use crate::types::{GameSummary, RuntimeEvent};

/// Score, lives and level bookkeeping for one play session.
///
/// The engine never touches these counters directly; it hands each outcome
/// event to `record` at the end of a tick.
#[derive(Clone, Debug)]
pub struct Session {
    pub score: u32,
    pub best_score: u32,
    pub lives: u32,
    pub level: u32,
    pub pickups_consumed: u32,
    pub ghosts_captured: u32,
    pub lives_lost: u32,
    scoring: ScoringConfig,
}

impl Session {
    pub fn new(scoring: &ScoringConfig) -> Self {
        Self {
            score: 0,
            best_score: 0,
            lives: scoring.starting_lives,
            level: 1,
            pickups_consumed: 0,
            ghosts_captured: 0,
            lives_lost: 0,
            scoring: scoring.clone(),
        }
    }

    pub fn record(&mut self, event: &RuntimeEvent) {
        match event {
            RuntimeEvent::PickupConsumed { .. } => {
                self.pickups_consumed += 1;
                self.add_score(self.scoring.pickup);
            }
            RuntimeEvent::PowerPickupConsumed { .. } => {
                self.pickups_consumed += 1;
                self.add_score(self.scoring.power_pickup);
            }
            RuntimeEvent::GhostCaptured { .. } => {
                self.ghosts_captured += 1;
                self.add_score(self.scoring.ghost);
            }
            RuntimeEvent::LifeLost { .. } => {
                self.lives = self.lives.saturating_sub(1);
                self.lives_lost += 1;
            }
            RuntimeEvent::LevelCleared { level } => {
                self.level = *level;
            }
            RuntimeEvent::ModeChanged { .. } | RuntimeEvent::GameOver => {}
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Starts a new game. The best score survives.
    pub fn reset(&mut self) {
        let best_score = self.best_score;
        let scoring = self.scoring.clone();
        *self = Self::new(&scoring);
        self.best_score = best_score;
    }

    pub fn summary(&self, ticks: u64) -> GameSummary {
        GameSummary {
            score: self.score,
            best_score: self.best_score,
            level: self.level,
            lives: self.lives,
            ticks,
            pickups_consumed: self.pickups_consumed,
            ghosts_captured: self.ghosts_captured,
            lives_lost: self.lives_lost,
        }
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.best_score = self.best_score.max(self.score);
    }
}
