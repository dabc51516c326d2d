use super::*;

impl GameEngine {
    pub(super) fn update_engine_timers(&mut self) {
        for timer in self.timers.take_due(self.tick_counter) {
            match timer {
                EngineTimer::ResumePlay => {
                    self.frozen = false;
                    let mode = self.scheduler.mode();
                    for ghost in &mut self.ghosts {
                        ghost.activate(mode);
                    }
                    debug!(tick = self.tick_counter, "play resumed");
                }
            }
        }
    }

    /// Sends every actor home and holds the game still for the resume delay.
    /// Ghost timers are dropped with the reset, so nothing from the previous
    /// life can fire later.
    pub(super) fn begin_respawn_delay(&mut self) {
        self.player.reset_to_spawn(&self.world);
        for ghost in &mut self.ghosts {
            ghost.reset_to_spawn(&self.world);
        }
        self.scheduler.reset();
        self.frozen = true;
        self.timers.arm(
            EngineTimer::ResumePlay,
            self.tick_counter,
            self.config.ms_to_ticks(self.config.life_lost_delay_ms),
        );
    }

    pub(super) fn clear_level(&mut self) {
        self.level += 1;
        self.world = self.pristine.clone();
        for ghost in &mut self.ghosts {
            ghost.aggressive = false;
        }
        self.events.push(RuntimeEvent::LevelCleared { level: self.level });
        info!(tick = self.tick_counter, level = self.level, "level cleared");
        self.begin_respawn_delay();
    }

    /// Every ghost that can turn vulnerable does; eaten and respawning ghosts are skipped.
    pub fn power_pickup_consumed(&mut self) {
        let mut turned = 0;
        for ghost in &mut self.ghosts {
            if ghost.make_vulnerable(self.tick_counter, &self.config) {
                turned += 1;
            }
        }
        debug!(tick = self.tick_counter, turned, "power pickup consumed");
    }

    /// Fresh game on the same layout. The session keeps only its best score.
    pub fn restart(&mut self, session: &mut Session) {
        self.world = self.pristine.clone();
        self.level = 1;
        self.tick_counter = 0;
        self.timers.clear();
        self.events.clear();
        self.scheduler.reset();
        self.player.reset_to_spawn(&self.world);
        let mode = self.scheduler.mode();
        for ghost in &mut self.ghosts {
            ghost.reset_to_spawn(&self.world);
            ghost.aggressive = false;
            ghost.activate(mode);
        }
        self.paused = false;
        self.frozen = false;
        self.ended = false;
        session.reset();
        info!("game restarted");
    }
}
