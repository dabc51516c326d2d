use crate::constants::{CONTINUE_BONUS, INTERSECTION_VERTICAL_BONUS, LOWER_HALF_VERTICAL_WEIGHT};
use crate::types::{Direction, Vec2};
use crate::world::World;

/// Whether a ghost may stand on `tile`. Off-grid tiles are only enterable one
/// step past either end of the tunnel row.
pub fn can_enter(world: &World, tile: Vec2) -> bool {
    if world.in_bounds(tile.x, tile.y) {
        return !world.is_blocked(tile.x, tile.y);
    }
    world.is_tunnel_row(tile.y) && (tile.x == -1 || tile.x == world.width)
}

pub fn legal_directions(world: &World, tile: Vec2) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|dir| can_enter(world, tile.step(*dir, 1)))
        .collect()
}

/// Drops the reversal of `current` unless it is forced (dead end) or the tile
/// is a junction of three or more exits.
pub fn candidate_directions(legal: &[Direction], current: Direction) -> Vec<Direction> {
    if legal.len() == 1 || legal.len() >= 3 {
        return legal.to_vec();
    }
    legal
        .iter()
        .copied()
        .filter(|dir| *dir != current.opposite())
        .collect()
}

pub fn direction_credit(
    world: &World,
    tile: Vec2,
    current: Direction,
    target: Vec2,
    dir: Direction,
    intersection: bool,
) -> f32 {
    let dx = (target.x - tile.x) as f32;
    let dy = (target.y - tile.y) as f32;
    let vertical_weight = if tile.y >= world.height / 2 {
        LOWER_HALF_VERTICAL_WEIGHT
    } else {
        1.0
    };

    let mut credit = match dir {
        Direction::Right if dx > 0.0 => dx,
        Direction::Left if dx < 0.0 => -dx,
        Direction::Down if dy > 0.0 => dy * vertical_weight,
        Direction::Up if dy < 0.0 => -dy * vertical_weight,
        _ => 0.0,
    };
    if dir == current {
        credit += CONTINUE_BONUS;
    }
    if intersection && dir.is_vertical() {
        credit += INTERSECTION_VERTICAL_BONUS;
    }
    credit
}

/// Picks the exit from `tile` toward `target`. `None` means the tile has no
/// legal exit at all and the ghost must hold.
pub fn choose_direction(
    world: &World,
    tile: Vec2,
    current: Direction,
    target: Vec2,
) -> Option<Direction> {
    let legal = legal_directions(world, tile);
    let candidates = candidate_directions(&legal, current);
    let intersection = legal.len() >= 3;

    let mut best: Option<(Direction, f32)> = None;
    for dir in Direction::TIE_BREAK {
        if !candidates.contains(&dir) {
            continue;
        }
        let credit = direction_credit(world, tile, current, target, dir, intersection);
        if best.map(|(_, top)| credit > top).unwrap_or(true) {
            best = Some((dir, credit));
        }
    }
    best.map(|(dir, _)| dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::LevelLayout;

    fn layout(rows: &[&str], tunnel_row: Option<i32>, spawn: Vec2) -> World {
        let layout = LevelLayout {
            rows: rows.iter().map(|row| row.to_string()).collect(),
            tunnel_row,
            player_spawn: spawn,
            ghost_spawns: [spawn; 4],
        };
        World::new(&layout, 16.0).expect("valid layout")
    }

    #[test]
    fn legal_set_matches_neighbor_lookups_everywhere() {
        let world = World::classic(16.0);
        for row in 0..world.height {
            for col in 0..world.width {
                if world.is_blocked(col, row) {
                    continue;
                }
                let legal = legal_directions(&world, Vec2::new(col, row));
                for dir in Direction::ALL {
                    let next = Vec2::new(col, row).step(dir, 1);
                    let open = if world.in_bounds(next.x, next.y) {
                        !world.is_blocked(next.x, next.y)
                    } else {
                        world.is_tunnel_row(next.y)
                    };
                    assert_eq!(
                        legal.contains(&dir),
                        open,
                        "({col},{row}) {dir:?} disagrees with lookup"
                    );
                }
            }
        }
    }

    #[test]
    fn tunnel_ends_are_legal_exits() {
        let world = World::classic(16.0);
        let west = legal_directions(&world, Vec2::new(0, 14));
        assert!(west.contains(&Direction::Left));
        let east = legal_directions(&world, Vec2::new(world.width - 1, 14));
        assert!(east.contains(&Direction::Right));
        let beyond = legal_directions(&world, Vec2::new(world.width, 14));
        assert_eq!(beyond, vec![Direction::Left]);
    }

    #[test]
    fn reversal_only_at_dead_ends_and_junctions() {
        let corridor = [Direction::Right, Direction::Left];
        assert_eq!(
            candidate_directions(&corridor, Direction::Right),
            vec![Direction::Right]
        );
        let dead_end = [Direction::Left];
        assert_eq!(
            candidate_directions(&dead_end, Direction::Right),
            vec![Direction::Left]
        );
        let junction = [Direction::Right, Direction::Up, Direction::Left];
        assert_eq!(
            candidate_directions(&junction, Direction::Right),
            junction.to_vec()
        );
    }

    #[test]
    fn corridor_never_reverses_even_when_target_is_behind() {
        let world = World::classic(16.0);
        for col in 2..5 {
            let tile = Vec2::new(col, 1);
            let choice = choose_direction(&world, tile, Direction::Right, Vec2::new(0, 1));
            assert_eq!(choice, Some(Direction::Right));
        }
    }

    #[test]
    fn straight_corridor_steers_toward_target() {
        let world = layout(
            &["#####", "#####", ".....", "#####", "#####"],
            None,
            Vec2::new(2, 2),
        );
        let choice = choose_direction(&world, Vec2::new(0, 2), Direction::Left, Vec2::new(2, 2));
        assert_eq!(choice, Some(Direction::Right));
    }

    #[test]
    fn lower_half_prefers_vertical_progress() {
        let world = layout(
            &[
                "#######", "#.....#", "#.#.#.#", "#.....#", "#.#.#.#", "#.....#", "#######",
            ],
            None,
            Vec2::new(3, 3),
        );
        // Equal horizontal and vertical distance: the lower half weights vertical higher.
        let lower = choose_direction(&world, Vec2::new(3, 5), Direction::Down, Vec2::new(1, 3));
        assert_eq!(lower, Some(Direction::Up));
        // Upper half: vertical moves get no extra weight.
        let upper = choose_direction(&world, Vec2::new(3, 1), Direction::Right, Vec2::new(5, 1));
        assert_eq!(upper, Some(Direction::Right));
    }

    #[test]
    fn continuing_wins_when_no_exit_makes_progress() {
        let world = layout(
            &["#####", "#...#", "#...#", "#...#", "#####"],
            None,
            Vec2::new(2, 2),
        );
        let tile = Vec2::new(2, 2);
        assert_eq!(
            direction_credit(&world, tile, Direction::Left, tile, Direction::Up, true),
            INTERSECTION_VERTICAL_BONUS
        );
        assert_eq!(
            choose_direction(&world, tile, Direction::Left, tile),
            Some(Direction::Left)
        );
        assert_eq!(
            choose_direction(&world, tile, Direction::Right, tile),
            Some(Direction::Right)
        );
    }

    #[test]
    fn ties_fall_back_to_up_left_down_right() {
        let world = layout(&["#####", "#...#", "#####"], None, Vec2::new(1, 1));
        let tile = Vec2::new(2, 1);
        // Heading Up into a horizontal corridor: neither exit is a reversal or a continuation.
        assert_eq!(
            choose_direction(&world, tile, Direction::Up, tile),
            Some(Direction::Left)
        );
    }

    #[test]
    fn walled_in_tile_has_no_choice() {
        let world = layout(&["###", "#.#", "###"], None, Vec2::new(1, 1));
        assert_eq!(
            choose_direction(&world, Vec2::new(1, 1), Direction::Up, Vec2::new(0, 0)),
            None
        );
    }
}
