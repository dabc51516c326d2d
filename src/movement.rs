//! Grid-aligned movement shared by the player and the ghosts.
//!
//! Ghosts travel between tile centers and only need `tile_center`, `advance_toward`
//! and `wrap_tunnel_tile`. The player moves freely along lanes and uses the
//! leading-edge test in `player_can_move`.

use crate::types::{Direction, PixelPos, Vec2};
use crate::world::World;

/// Keeps the leading-edge probe inside the tile being entered rather than on its border.
const EDGE_EPSILON: f32 = 0.001;

pub fn tile_center(world: &World, tile: Vec2) -> PixelPos {
    let half = world.tile_size / 2.0;
    PixelPos::new(
        tile.x as f32 * world.tile_size + half,
        tile.y as f32 * world.tile_size + half,
    )
}

pub fn tile_of(world: &World, pos: PixelPos) -> Vec2 {
    let (x, y) = world.tile_of(pos.x, pos.y);
    Vec2::new(x, y)
}

/// True when `pos` is within one movement step of its tile's center on both axes.
pub fn is_centered(world: &World, pos: PixelPos, step: f32) -> bool {
    let center = tile_center(world, tile_of(world, pos));
    (pos.x - center.x).abs() <= step && (pos.y - center.y).abs() <= step
}

/// Moves `pos` toward `target` along a single axis by at most `step`.
/// Returns true when the target has been reached exactly.
pub fn advance_toward(pos: &mut PixelPos, target: PixelPos, step: f32) -> bool {
    let dx = target.x - pos.x;
    let dy = target.y - pos.y;
    let remaining = dx.abs() + dy.abs();
    if remaining <= step {
        *pos = target;
        return true;
    }
    if dx != 0.0 {
        pos.x += dx.signum() * step.min(dx.abs());
    } else {
        pos.y += dy.signum() * step.min(dy.abs());
    }
    false
}

/// A ghost that reaches the off-grid tile at one end of the tunnel reappears at the other end.
pub fn wrap_tunnel_tile(world: &World, tile: Vec2) -> Option<Vec2> {
    if !world.is_tunnel_row(tile.y) {
        return None;
    }
    if tile.x < 0 {
        return Some(Vec2::new(world.width, tile.y));
    }
    if tile.x >= world.width {
        return Some(Vec2::new(-1, tile.y));
    }
    None
}

/// Player-side tunnel wrap: leaving past half a tile reenters at the mirrored offset.
pub fn wrap_tunnel_pixel(world: &World, pos: &mut PixelPos) -> bool {
    let (_, row) = world.tile_of(pos.x, pos.y);
    if !world.is_tunnel_row(row) {
        return false;
    }
    let span = world.width as f32 * world.tile_size;
    let half = world.tile_size / 2.0;
    if pos.x < -half {
        pos.x += span + world.tile_size;
        return true;
    }
    if pos.x > span + half {
        pos.x -= span + world.tile_size;
        return true;
    }
    false
}

/// Leading-edge test for the player.
///
/// After a step of `step` pixels in `dir`, both corners of the leading edge,
/// pulled in by `corner_margin` on the perpendicular axis, must be open. The
/// margin lets the player turn slightly before a tile center while still
/// refusing to clip a wall corner.
pub fn player_can_move(
    world: &World,
    pos: PixelPos,
    dir: Direction,
    step: f32,
    corner_margin: f32,
) -> bool {
    let (dx, dy) = dir.delta();
    let half = world.tile_size / 2.0;
    let reach = step + half - EDGE_EPSILON;
    let lead = PixelPos::new(pos.x + dx as f32 * reach, pos.y + dy as f32 * reach);
    let spread = half - corner_margin;
    let corners = if dir.is_vertical() {
        [
            PixelPos::new(lead.x - spread, lead.y),
            PixelPos::new(lead.x + spread, lead.y),
        ]
    } else {
        [
            PixelPos::new(lead.x, lead.y - spread),
            PixelPos::new(lead.x, lead.y + spread),
        ]
    };
    corners.iter().all(|corner| !world.is_wall(corner.x, corner.y))
}
