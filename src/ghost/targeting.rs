use tracing::warn;

use crate::config::GameConfig;
use crate::types::{Direction, GhostState, Strategy, Vec2};
use crate::world::World;

/// Read-only view of everything a ghost may look at while choosing a target.
/// Built once per tick before any ghost moves.
#[derive(Clone, Copy, Debug)]
pub struct TargetContext {
    pub player_tile: Vec2,
    pub player_dir: Direction,
    pub pursuer_tile: Vec2,
}

pub fn scatter_corner(strategy: Strategy, world: &World) -> Vec2 {
    match strategy {
        Strategy::Pursuer => Vec2::new(world.width - 2, 1),
        Strategy::Ambusher => Vec2::new(1, 1),
        Strategy::Flanker => Vec2::new(world.width - 2, world.height - 2),
        Strategy::Opportunist => Vec2::new(1, world.height - 2),
    }
}

/// Point `tiles` ahead of the player. Facing up also shifts the point left by
/// the same amount, as the arcade cabinet did.
pub fn lead_point(player: Vec2, dir: Direction, tiles: i32) -> Vec2 {
    let ahead = player.step(dir, tiles);
    if dir == Direction::Up {
        Vec2::new(ahead.x - tiles, ahead.y)
    } else {
        ahead
    }
}

pub fn target_tile(
    strategy: Strategy,
    state: GhostState,
    aggressive: bool,
    own_tile: Vec2,
    ctx: &TargetContext,
    world: &World,
    config: &GameConfig,
) -> Vec2 {
    match state {
        GhostState::Vulnerable => scatter_corner(strategy, world),
        GhostState::Scatter | GhostState::Chase if aggressive => ctx.player_tile,
        GhostState::Scatter => scatter_corner(strategy, world),
        GhostState::Chase => chase_target(strategy, own_tile, ctx, world, config),
        GhostState::Inactive | GhostState::Eaten | GhostState::Respawning => own_tile,
    }
}

fn chase_target(
    strategy: Strategy,
    own_tile: Vec2,
    ctx: &TargetContext,
    world: &World,
    config: &GameConfig,
) -> Vec2 {
    match strategy {
        Strategy::Pursuer => ctx.player_tile,
        Strategy::Ambusher => lead_point(ctx.player_tile, ctx.player_dir, config.ambusher_lead_tiles),
        Strategy::Flanker => {
            let pivot = lead_point(ctx.player_tile, ctx.player_dir, config.flanker_lead_tiles);
            let raw = Vec2::new(
                pivot.x + (pivot.x - ctx.pursuer_tile.x),
                pivot.y + (pivot.y - ctx.pursuer_tile.y),
            );
            if world.in_bounds(raw.x, raw.y) && !world.is_blocked(raw.x, raw.y) {
                return raw;
            }
            nearest_open_tile(world, raw).unwrap_or_else(|| {
                warn!(x = raw.x, y = raw.y, "no open tile near flanker target");
                own_tile
            })
        }
        Strategy::Opportunist => {
            if own_tile.distance(ctx.player_tile) > config.opportunist_retreat_tiles {
                ctx.player_tile
            } else {
                scatter_corner(strategy, world)
            }
        }
    }
}

/// Closest open in-grid tile to `target`, searching square rings of growing
/// radius around the target clamped into the grid.
pub fn nearest_open_tile(world: &World, target: Vec2) -> Option<Vec2> {
    let origin = Vec2::new(
        target.x.clamp(0, world.width - 1),
        target.y.clamp(0, world.height - 1),
    );
    let max_radius = world.width.max(world.height);
    for radius in 0..=max_radius {
        let mut best: Option<(Vec2, f32)> = None;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let tile = Vec2::new(origin.x + dx, origin.y + dy);
                if !world.in_bounds(tile.x, tile.y) || world.is_blocked(tile.x, tile.y) {
                    continue;
                }
                let dist = tile.distance(target);
                if best.map(|(_, top)| dist < top).unwrap_or(true) {
                    best = Some((tile, dist));
                }
            }
        }
        if let Some((tile, _)) = best {
            return Some(tile);
        }
    }
    None
}
