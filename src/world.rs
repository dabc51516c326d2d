use std::collections::{HashSet, VecDeque};

use crate::constants::{
    CLASSIC_GHOST_SPAWNS, CLASSIC_LAYOUT, CLASSIC_PLAYER_SPAWN, CLASSIC_TUNNEL_ROW,
};
use crate::error::WorldError;
use crate::types::{Direction, PickupKind, TileKind, Vec2, WorldView};

/// Text form of a maze plus its spawn points. See `TileKind::from_glyph` for the glyphs.
#[derive(Clone, Debug)]
pub struct LevelLayout {
    pub rows: Vec<String>,
    pub tunnel_row: Option<i32>,
    pub player_spawn: Vec2,
    pub ghost_spawns: [Vec2; 4],
}

impl LevelLayout {
    pub fn classic() -> Self {
        Self {
            rows: CLASSIC_LAYOUT.iter().map(|row| row.to_string()).collect(),
            tunnel_row: Some(CLASSIC_TUNNEL_ROW),
            player_spawn: Vec2::new(CLASSIC_PLAYER_SPAWN.0, CLASSIC_PLAYER_SPAWN.1),
            ghost_spawns: CLASSIC_GHOST_SPAWNS.map(|(x, y)| Vec2::new(x, y)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct World {
    pub width: i32,
    pub height: i32,
    pub tile_size: f32,
    pub tunnel_row: Option<i32>,
    pub player_spawn: Vec2,
    pub ghost_spawns: [Vec2; 4],
    tiles: Vec<TileKind>,
    pickups_remaining: usize,
}

impl World {
    pub fn new(layout: &LevelLayout, tile_size: f32) -> Result<Self, WorldError> {
        let height = layout.rows.len();
        if height == 0 {
            return Err(WorldError::EmptyLayout);
        }
        let width = layout.rows[0].chars().count();
        let mut tiles = Vec::with_capacity(width * height);
        for (row, line) in layout.rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(WorldError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let tile =
                    TileKind::from_glyph(glyph).ok_or(WorldError::UnknownTile { col, row, glyph })?;
                tiles.push(tile);
            }
        }

        let pickups_remaining = tiles
            .iter()
            .filter(|tile| matches!(tile, TileKind::Pickup | TileKind::PowerPickup))
            .count();
        let world = Self {
            width: width as i32,
            height: height as i32,
            tile_size,
            tunnel_row: layout.tunnel_row,
            player_spawn: layout.player_spawn,
            ghost_spawns: layout.ghost_spawns,
            tiles,
            pickups_remaining,
        };

        if let Some(row) = layout.tunnel_row {
            if row < 0 || row >= world.height {
                return Err(WorldError::TunnelOutOfRange {
                    row,
                    height: world.height,
                });
            }
        }
        let spawn = layout.player_spawn;
        if !world.in_bounds(spawn.x, spawn.y) || world.is_blocked(spawn.x, spawn.y) {
            return Err(WorldError::BlockedSpawn {
                what: "player",
                x: spawn.x,
                y: spawn.y,
            });
        }
        for spawn in &layout.ghost_spawns {
            if !world.in_bounds(spawn.x, spawn.y) || world.is_blocked(spawn.x, spawn.y) {
                return Err(WorldError::BlockedSpawn {
                    what: "ghost",
                    x: spawn.x,
                    y: spawn.y,
                });
            }
        }
        Ok(world)
    }

    pub fn classic(tile_size: f32) -> Self {
        Self::new(&LevelLayout::classic(), tile_size).expect("built-in layout should be valid")
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.width && row < self.height
    }

    pub fn is_tunnel_row(&self, row: i32) -> bool {
        self.tunnel_row == Some(row)
    }

    /// Tile at a coordinate an actor actually occupies. Off-grid columns are only
    /// meaningful on the tunnel row, where they read as open corridor.
    pub fn tile(&self, col: i32, row: i32) -> TileKind {
        if self.in_bounds(col, row) {
            return self.tiles[self.index(col, row)];
        }
        if self.is_tunnel_row(row) {
            return TileKind::Corridor;
        }
        debug_assert!(false, "tile lookup out of bounds: ({col},{row})");
        let col = col.clamp(0, self.width - 1);
        let row = row.clamp(0, self.height - 1);
        self.tiles[self.index(col, row)]
    }

    /// Neighbor probe: anything off the grid is blocked except the open ends of the tunnel row.
    pub fn is_blocked(&self, col: i32, row: i32) -> bool {
        if self.in_bounds(col, row) {
            return self.tiles[self.index(col, row)].blocks_movement();
        }
        !self.is_tunnel_row(row)
    }

    pub fn is_wall(&self, pixel_x: f32, pixel_y: f32) -> bool {
        let (col, row) = self.tile_of(pixel_x, pixel_y);
        self.is_blocked(col, row)
    }

    pub fn tile_of(&self, pixel_x: f32, pixel_y: f32) -> (i32, i32) {
        (
            (pixel_x / self.tile_size).floor() as i32,
            (pixel_y / self.tile_size).floor() as i32,
        )
    }

    pub fn has_pickup(&self, col: i32, row: i32) -> bool {
        self.in_bounds(col, row)
            && matches!(
                self.tile(col, row),
                TileKind::Pickup | TileKind::PowerPickup
            )
    }

    pub fn remove_pickup(&mut self, col: i32, row: i32) -> Option<PickupKind> {
        if !self.in_bounds(col, row) {
            return None;
        }
        let idx = self.index(col, row);
        let eaten = match self.tiles[idx] {
            TileKind::Pickup => PickupKind::Pickup,
            TileKind::PowerPickup => PickupKind::PowerPickup,
            _ => return None,
        };
        self.tiles[idx] = TileKind::Eaten;
        self.pickups_remaining -= 1;
        Some(eaten)
    }

    pub fn pickups_remaining(&self) -> usize {
        self.pickups_remaining
    }

    /// Directions whose neighbor tile can be entered from `(col, row)`.
    pub fn open_directions(&self, col: i32, row: i32) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|dir| {
                let next = Vec2::new(col, row).step(*dir, 1);
                !self.is_blocked(next.x, next.y)
            })
            .collect()
    }

    pub fn rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| self.tiles[self.index(col, row)].glyph())
                    .collect::<String>()
            })
            .collect()
    }

    pub fn view(&self) -> WorldView {
        WorldView {
            width: self.width,
            height: self.height,
            tile_size: self.tile_size,
            tunnel_row: self.tunnel_row,
            rows: self.rows(),
        }
    }

    /// Open tiles connected to `start`, following the tunnel wrap.
    pub fn reachable_from(&self, start: Vec2) -> HashSet<(i32, i32)> {
        let mut out = HashSet::new();
        if !self.in_bounds(start.x, start.y) || self.is_blocked(start.x, start.y) {
            return out;
        }

        let mut queue = VecDeque::new();
        out.insert((start.x, start.y));
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            for dir in Direction::ALL {
                let mut next = cell.step(dir, 1);
                if self.is_tunnel_row(next.y) {
                    next.x = next.x.rem_euclid(self.width);
                }
                if !self.in_bounds(next.x, next.y) || self.is_blocked(next.x, next.y) {
                    continue;
                }
                if out.insert((next.x, next.y)) {
                    queue.push_back(next);
                }
            }
        }

        out
    }

    fn index(&self, col: i32, row: i32) -> usize {
        (row * self.width + col) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::{LevelLayout, World};
    use crate::error::WorldError;
    use crate::types::{Direction, PickupKind, TileKind, Vec2};

    fn corridor_layout() -> LevelLayout {
        LevelLayout {
            rows: vec![
                "#####".to_string(),
                "#.o.#".to_string(),
                "#####".to_string(),
            ],
            tunnel_row: None,
            player_spawn: Vec2::new(1, 1),
            ghost_spawns: [Vec2::new(3, 1); 4],
        }
    }

    #[test]
    fn classic_open_tiles_are_all_reachable_from_player_spawn() {
        let world = World::classic(16.0);
        let reachable = world.reachable_from(world.player_spawn);
        let mut open = 0;
        for row in 0..world.height {
            for col in 0..world.width {
                if world.is_blocked(col, row) {
                    continue;
                }
                open += 1;
                assert!(
                    reachable.contains(&(col, row)),
                    "open tile is unreachable: ({col},{row})"
                );
            }
        }
        assert_eq!(open, 300);
        assert_eq!(world.pickups_remaining(), 300);
    }

    #[test]
    fn tunnel_row_is_open_past_both_edges() {
        let world = World::classic(16.0);
        assert!(!world.is_blocked(-1, 14));
        assert!(!world.is_blocked(world.width, 14));
        assert!(world.is_blocked(-1, 13));
        assert!(world.is_blocked(world.width, 1));
        assert_eq!(world.tile(-1, 14), TileKind::Corridor);
    }

    #[test]
    fn holding_pen_blocks_movement_but_is_not_a_wall_glyph() {
        let world = World::classic(16.0);
        assert_eq!(world.tile(13, 12), TileKind::PenFloor);
        assert!(world.is_blocked(13, 12));
        assert_eq!(
            world.open_directions(13, 11),
            vec![Direction::Right, Direction::Left]
        );
    }

    #[test]
    fn pixel_wall_lookup_floors_to_tiles() {
        let world = World::classic(16.0);
        assert!(world.is_wall(15.9, 15.9));
        assert!(!world.is_wall(16.0, 16.0));
        assert!(!world.is_wall(31.9, 20.0));
    }

    #[test]
    fn removing_pickups_reports_kind_once() {
        let mut world = World::new(&corridor_layout(), 16.0).expect("valid layout");
        assert_eq!(world.pickups_remaining(), 3);
        assert!(world.has_pickup(2, 1));
        assert_eq!(world.remove_pickup(2, 1), Some(PickupKind::PowerPickup));
        assert_eq!(world.remove_pickup(2, 1), None);
        assert_eq!(world.remove_pickup(1, 1), Some(PickupKind::Pickup));
        assert_eq!(world.remove_pickup(0, 0), None);
        assert_eq!(world.remove_pickup(-4, 9), None);
        assert_eq!(world.pickups_remaining(), 1);
        assert_eq!(world.rows()[1], "#__.#");
    }

    #[test]
    fn malformed_layouts_are_rejected() {
        let mut layout = corridor_layout();
        layout.rows[1] = "#..#".to_string();
        assert_eq!(
            World::new(&layout, 16.0).err(),
            Some(WorldError::RaggedRow {
                row: 1,
                expected: 5,
                found: 4
            })
        );

        let mut layout = corridor_layout();
        layout.rows[1] = "#.x.#".to_string();
        assert_eq!(
            World::new(&layout, 16.0).err(),
            Some(WorldError::UnknownTile {
                col: 2,
                row: 1,
                glyph: 'x'
            })
        );

        let mut layout = corridor_layout();
        layout.player_spawn = Vec2::new(0, 0);
        assert!(matches!(
            World::new(&layout, 16.0),
            Err(WorldError::BlockedSpawn { what: "player", .. })
        ));

        let mut layout = corridor_layout();
        layout.tunnel_row = Some(7);
        assert!(matches!(
            World::new(&layout, 16.0),
            Err(WorldError::TunnelOutOfRange { row: 7, .. })
        ));
    }
}
