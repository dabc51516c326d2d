use crate::config::GameConfig;
use crate::movement::{advance_toward, player_can_move, tile_center, tile_of, wrap_tunnel_pixel};
use crate::types::{Direction, PixelPos, PlayerView, Vec2};
use crate::world::World;

/// The player actor: free movement along lanes with a buffered turn intent.
#[derive(Clone, Debug)]
pub struct Player {
    pub pos: PixelPos,
    pub dir: Direction,
    /// Latest requested direction, applied as soon as it becomes legal.
    pub next_dir: Option<Direction>,
    spawn: Vec2,
}

impl Player {
    pub fn new(spawn: Vec2, world: &World) -> Self {
        Self {
            pos: tile_center(world, spawn),
            dir: Direction::Right,
            next_dir: None,
            spawn,
        }
    }

    pub fn reset_to_spawn(&mut self, world: &World) {
        self.pos = tile_center(world, self.spawn);
        self.dir = Direction::Right;
        self.next_dir = None;
    }

    pub fn set_intent(&mut self, dir: Direction) {
        self.next_dir = Some(dir);
    }

    pub fn tile(&self, world: &World) -> Vec2 {
        tile_of(world, self.pos)
    }

    pub fn update(&mut self, world: &World, config: &GameConfig) {
        let step = config.player_speed;
        let margin = config.player_corner_margin;

        if let Some(wanted) = self.next_dir {
            if player_can_move(world, self.pos, wanted, step, margin) {
                if wanted.is_vertical() != self.dir.is_vertical() {
                    let center = tile_center(world, self.tile(world));
                    if wanted.is_vertical() {
                        self.pos.x = center.x;
                    } else {
                        self.pos.y = center.y;
                    }
                }
                self.dir = wanted;
                self.next_dir = None;
            }
        }

        if player_can_move(world, self.pos, self.dir, step, margin) {
            let (dx, dy) = self.dir.delta();
            self.pos.x += dx as f32 * step;
            self.pos.y += dy as f32 * step;
        } else {
            let center = tile_center(world, self.tile(world));
            advance_toward(&mut self.pos, center, step);
        }
        wrap_tunnel_pixel(world, &mut self.pos);
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            x: self.pos.x,
            y: self.pos.y,
            dir: self.dir,
            next_dir: self.next_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Player;
    use crate::config::GameConfig;
    use crate::movement::tile_center;
    use crate::types::{Direction, PixelPos, Vec2};
    use crate::world::World;

    #[test]
    fn player_stops_at_a_wall_on_the_tile_center() {
        let world = World::classic(16.0);
        let config = GameConfig::default();
        // Row 1 runs from column 1 to 12 before the wall at 13.
        let mut player = Player::new(Vec2::new(10, 1), &world);
        for _ in 0..120 {
            player.update(&world, &config);
        }
        assert_eq!(player.pos, tile_center(&world, Vec2::new(12, 1)));
        assert_eq!(player.dir, Direction::Right);
    }

    #[test]
    fn buffered_turn_waits_until_legal_then_snaps_to_lane() {
        let world = World::classic(16.0);
        let config = GameConfig::default();
        // Heading right along row 1; column 6 is the first opening downward.
        let mut player = Player::new(Vec2::new(2, 1), &world);
        player.set_intent(Direction::Down);
        player.update(&world, &config);
        assert_eq!(player.dir, Direction::Right);
        assert_eq!(player.next_dir, Some(Direction::Down));

        for _ in 0..60 {
            player.update(&world, &config);
            if player.dir == Direction::Down {
                break;
            }
        }
        assert_eq!(player.dir, Direction::Down);
        assert_eq!(player.next_dir, None);
        assert_eq!(player.pos.x, tile_center(&world, Vec2::new(6, 1)).x);
    }

    #[test]
    fn reversing_is_immediate() {
        let world = World::classic(16.0);
        let config = GameConfig::default();
        let mut player = Player::new(Vec2::new(4, 1), &world);
        player.update(&world, &config);
        let x = player.pos.x;
        player.set_intent(Direction::Left);
        player.update(&world, &config);
        assert_eq!(player.dir, Direction::Left);
        assert!(player.pos.x < x);
    }

    #[test]
    fn player_wraps_through_the_tunnel() {
        let world = World::classic(16.0);
        let config = GameConfig::default();
        let mut player = Player::new(Vec2::new(1, 14), &world);
        player.set_intent(Direction::Left);
        let mut wrapped = false;
        for _ in 0..60 {
            player.update(&world, &config);
            if player.pos.x > world.width as f32 * world.tile_size / 2.0 {
                wrapped = true;
                break;
            }
        }
        assert!(wrapped);
        assert_eq!(player.dir, Direction::Left);
        assert_eq!(player.pos.y, tile_center(&world, Vec2::new(0, 14)).y);
    }

    #[test]
    fn reset_returns_to_spawn() {
        let world = World::classic(16.0);
        let mut player = Player::new(world.player_spawn, &world);
        player.pos = PixelPos::new(40.0, 40.0);
        player.set_intent(Direction::Up);
        player.reset_to_spawn(&world);
        assert_eq!(player.pos, tile_center(&world, world.player_spawn));
        assert_eq!(player.next_dir, None);
    }
}
