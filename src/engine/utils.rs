use crate::ghost::targeting::TargetContext;
use crate::ghost::Ghost;
use crate::player::Player;
use crate::types::{PixelPos, Strategy};
use crate::world::World;

/// Snapshot of the positions ghosts may read this tick. Taken before any ghost moves.
pub(super) fn target_context(player: &Player, ghosts: &[Ghost], world: &World) -> TargetContext {
    let player_tile = player.tile(world);
    let pursuer_tile = ghosts
        .iter()
        .find(|ghost| ghost.strategy == Strategy::Pursuer)
        .map(|ghost| ghost.tile)
        .unwrap_or(player_tile);
    TargetContext {
        player_tile,
        player_dir: player.dir,
        pursuer_tile,
    }
}

pub(super) fn within_radius(a: PixelPos, b: PixelPos, radius: f32) -> bool {
    a.distance(b) < radius
}
