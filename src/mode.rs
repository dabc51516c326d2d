use crate::config::GameConfig;
use crate::types::GhostMode;

/// Global Scatter/Chase timetable driven by active ticks only.
#[derive(Clone, Debug)]
pub struct ModeScheduler {
    /// `(cutoff_tick, mode)`: `mode` applies while elapsed ticks are below `cutoff_tick`.
    phases: Vec<(u64, GhostMode)>,
    elapsed_ticks: u64,
    current: GhostMode,
}

impl ModeScheduler {
    pub fn new(phases: Vec<(u64, GhostMode)>) -> Self {
        let current = mode_at(&phases, 0);
        Self {
            phases,
            elapsed_ticks: 0,
            current,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config
                .mode_schedule
                .iter()
                .map(|phase| (config.ms_to_ticks(phase.until_ms), phase.mode))
                .collect(),
        )
    }

    pub fn mode(&self) -> GhostMode {
        self.current
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Advances one active tick. Returns the new mode only on the tick it changes.
    pub fn advance(&mut self) -> Option<GhostMode> {
        self.elapsed_ticks += 1;
        let derived = mode_at(&self.phases, self.elapsed_ticks);
        if derived == self.current {
            return None;
        }
        self.current = derived;
        Some(derived)
    }

    pub fn reset(&mut self) {
        self.elapsed_ticks = 0;
        self.current = mode_at(&self.phases, 0);
    }
}

fn mode_at(phases: &[(u64, GhostMode)], elapsed_ticks: u64) -> GhostMode {
    phases
        .iter()
        .find(|(cutoff, _)| elapsed_ticks < *cutoff)
        .map(|(_, mode)| *mode)
        .unwrap_or(GhostMode::Chase)
}
