use super::*;

use crate::types::GhostState;

impl GameEngine {
    /// Player against every collidable ghost. A loss of life ends the pass since
    /// every actor is sent back to its spawn.
    pub(super) fn resolve_collisions(&mut self) {
        let radius = self.config.collision_radius_ratio * self.world.tile_size;
        for idx in 0..self.ghosts.len() {
            let ghost = &self.ghosts[idx];
            if !ghost.state.is_collidable() || !within_radius(ghost.pos, self.player.pos, radius) {
                continue;
            }

            if ghost.state == GhostState::Vulnerable {
                if self.ghosts[idx].capture(self.tick_counter, &self.config) {
                    let ghost = &self.ghosts[idx];
                    self.events.push(RuntimeEvent::GhostCaptured {
                        ghost_id: ghost.id,
                        strategy: ghost.strategy,
                    });
                    debug!(tick = self.tick_counter, ghost = ghost.id, "ghost captured");
                }
                continue;
            }

            let ghost_id = ghost.id;
            self.events.push(RuntimeEvent::LifeLost { ghost_id });
            info!(tick = self.tick_counter, ghost = ghost_id, "life lost");
            self.begin_respawn_delay();
            break;
        }
    }
}
