//! Adversary behavior: per-ghost lifecycle, timers and tile-to-tile travel.
//!
//! Targeting lives in `targeting`, direction ranking in `steering`. A ghost only
//! decides when it leaves a tile center; between centers it keeps moving toward
//! `next_tile`. While it rests on a center, `dir` is still the way it came in.

use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::movement::{advance_toward, tile_center, tile_of, wrap_tunnel_tile};
use crate::timers::TimerTable;
use crate::types::{Direction, GhostMode, GhostState, GhostView, PixelPos, Strategy, Vec2};
use crate::world::World;

pub mod steering;
pub mod targeting;

use self::steering::{can_enter, choose_direction};
use self::targeting::{target_tile, TargetContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum GhostTimer {
    BlinkStart,
    BlinkToggle,
    VulnerableEnd,
    EatenHold,
    Respawn,
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub id: usize,
    pub strategy: Strategy,
    pub pos: PixelPos,
    pub dir: Direction,
    pub state: GhostState,
    pub blinking: bool,
    pub aggressive: bool,
    pub spawn: Vec2,
    /// Tile whose center the ghost last stood on.
    pub tile: Vec2,
    /// Tile the ghost is traveling to. Equal to `tile` while holding still.
    pub next_tile: Vec2,
    timers: TimerTable<GhostTimer>,
    stalled: bool,
}

impl Ghost {
    pub fn new(id: usize, strategy: Strategy, spawn: Vec2, world: &World) -> Self {
        Self {
            id,
            strategy,
            pos: tile_center(world, spawn),
            dir: Direction::Left,
            state: GhostState::Inactive,
            blinking: false,
            aggressive: false,
            spawn,
            tile: spawn,
            next_tile: spawn,
            timers: TimerTable::new(),
            stalled: false,
        }
    }

    /// Back to the spawn tile, inactive, with every pending timer dropped.
    pub fn reset_to_spawn(&mut self, world: &World) {
        self.pos = tile_center(world, self.spawn);
        self.tile = self.spawn;
        self.next_tile = self.spawn;
        self.dir = Direction::Left;
        self.state = GhostState::Inactive;
        self.blinking = false;
        self.stalled = false;
        self.timers.clear();
    }

    pub fn activate(&mut self, mode: GhostMode) {
        self.state = GhostState::from_mode(mode);
        self.blinking = false;
    }

    pub fn timer_deadline(&self, timer: GhostTimer) -> Option<u64> {
        self.timers.deadline(timer)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn speed(&self, config: &GameConfig, level: u32) -> f32 {
        let base = config.ghost_speed * config.level_speed_multiplier(level);
        if self.state == GhostState::Vulnerable {
            base * config.vulnerable_speed_ratio
        } else if self.aggressive {
            base * config.aggressive_speed_ratio
        } else {
            base
        }
    }

    /// Pursuer turns aggressive for the rest of the level once pickups run low.
    pub fn update_aggression(&mut self, pickups_remaining: usize, config: &GameConfig) {
        if self.strategy == Strategy::Pursuer
            && !self.aggressive
            && pickups_remaining <= config.aggressive_pickup_threshold
        {
            self.aggressive = true;
            debug!(ghost = self.id, pickups_remaining, "pursuer turned aggressive");
        }
    }

    /// Scatter/Chase flip: reverse once and snap onto the nearest tile center
    /// from which the reversed direction leads back along the lane.
    /// Vulnerable, eaten and respawning ghosts ignore the flip.
    pub fn on_mode_flip(&mut self, mode: GhostMode, world: &World) {
        if !self.state.follows_schedule() {
            return;
        }
        self.state = GhostState::from_mode(mode);
        let reversed = self.dir.opposite();
        let nearest = tile_of(world, self.pos);
        // Just past a turn the tile behind can be a wall; the tile ahead always
        // has the departed tile behind it.
        let mut snapped = if can_enter(world, nearest.step(reversed, 1)) {
            nearest
        } else {
            self.next_tile
        };
        // Both off-grid tunnel ends are the same spot seen from either side.
        let beyond = snapped.step(reversed, 1);
        if !can_enter(world, beyond) {
            if let Some(mirror) = wrap_tunnel_tile(world, beyond) {
                snapped = mirror;
            }
        }
        self.tile = snapped;
        self.pos = tile_center(world, snapped);
        self.dir = reversed;
        let behind = snapped.step(reversed, 1);
        self.next_tile = if can_enter(world, behind) {
            behind
        } else {
            snapped
        };
    }

    /// Returns false when the ghost cannot become vulnerable right now.
    /// A repeated power pickup restarts the window instead of stacking a second one.
    pub fn make_vulnerable(&mut self, now_tick: u64, config: &GameConfig) -> bool {
        if !matches!(
            self.state,
            GhostState::Scatter | GhostState::Chase | GhostState::Vulnerable
        ) {
            return false;
        }
        self.state = GhostState::Vulnerable;
        self.blinking = false;
        self.timers.cancel(GhostTimer::BlinkToggle);
        let total = config.ms_to_ticks(config.vulnerable_duration_ms);
        let warning = config.ms_to_ticks(config.blink_warning_ms).min(total);
        self.timers
            .arm(GhostTimer::BlinkStart, now_tick, total - warning);
        self.timers.arm(GhostTimer::VulnerableEnd, now_tick, total);
        true
    }

    /// Only a vulnerable ghost can be captured; anything else is a no-op.
    pub fn capture(&mut self, now_tick: u64, config: &GameConfig) -> bool {
        if self.state != GhostState::Vulnerable {
            return false;
        }
        self.state = GhostState::Eaten;
        self.blinking = false;
        self.timers.clear();
        self.timers.arm(
            GhostTimer::EatenHold,
            now_tick,
            config.ms_to_ticks(config.eaten_hold_ms),
        );
        true
    }

    pub fn update_timers(
        &mut self,
        now_tick: u64,
        world: &World,
        config: &GameConfig,
        mode: GhostMode,
    ) {
        for timer in self.timers.take_due(now_tick) {
            match timer {
                GhostTimer::BlinkStart => {
                    self.blinking = true;
                    self.timers.arm(
                        GhostTimer::BlinkToggle,
                        now_tick,
                        config.ms_to_ticks(config.blink_interval_ms),
                    );
                }
                GhostTimer::BlinkToggle => {
                    if self.state != GhostState::Vulnerable {
                        continue;
                    }
                    self.blinking = !self.blinking;
                    self.timers.arm(
                        GhostTimer::BlinkToggle,
                        now_tick,
                        config.ms_to_ticks(config.blink_interval_ms),
                    );
                }
                GhostTimer::VulnerableEnd => {
                    self.state = GhostState::from_mode(mode);
                    self.blinking = false;
                    self.timers.cancel(GhostTimer::BlinkToggle);
                    debug!(ghost = self.id, state = ?self.state, "vulnerability expired");
                }
                GhostTimer::EatenHold => {
                    self.pos = tile_center(world, self.spawn);
                    self.tile = self.spawn;
                    self.next_tile = self.spawn;
                    self.dir = Direction::Left;
                    self.state = GhostState::Respawning;
                    self.timers.arm(
                        GhostTimer::Respawn,
                        now_tick,
                        config.ms_to_ticks(config.respawn_duration_ms),
                    );
                }
                GhostTimer::Respawn => {
                    self.state = GhostState::from_mode(mode);
                    debug!(ghost = self.id, state = ?self.state, "ghost respawned");
                }
            }
        }
    }

    /// One tick of travel. A ghost resting on a center picks its exit and sets
    /// off; on arrival it stops on the new center without turning.
    pub fn step(&mut self, ctx: &TargetContext, world: &World, config: &GameConfig, level: u32) {
        if !self.state.is_collidable() {
            return;
        }
        if self.tile == self.next_tile {
            self.decide(ctx, world, config);
            if self.tile == self.next_tile {
                return;
            }
        }

        let speed = self.speed(config, level);
        let goal = tile_center(world, self.next_tile);
        if !advance_toward(&mut self.pos, goal, speed) {
            return;
        }
        self.tile = self.next_tile;
        if let Some(wrapped) = wrap_tunnel_tile(world, self.tile) {
            self.tile = wrapped;
            self.next_tile = wrapped;
            self.pos = tile_center(world, wrapped);
        }
    }

    fn decide(&mut self, ctx: &TargetContext, world: &World, config: &GameConfig) {
        let target = target_tile(
            self.strategy,
            self.state,
            self.aggressive,
            self.tile,
            ctx,
            world,
            config,
        );
        match choose_direction(world, self.tile, self.dir, target) {
            Some(dir) => {
                self.dir = dir;
                self.next_tile = self.tile.step(dir, 1);
                self.stalled = false;
            }
            None => {
                if !self.stalled {
                    warn!(
                        ghost = self.id,
                        x = self.tile.x,
                        y = self.tile.y,
                        "no legal direction; holding position"
                    );
                }
                self.stalled = true;
                self.next_tile = self.tile;
            }
        }
    }

    /// True when the ghost stands on a tile center or lies strictly between the
    /// centers of `tile` and `next_tile` along its direction of travel.
    pub fn is_on_lane(&self, world: &World) -> bool {
        let from = tile_center(world, self.tile);
        if self.pos == from {
            return true;
        }
        if self.tile.step(self.dir, 1) != self.next_tile {
            return false;
        }
        let to = tile_center(world, self.next_tile);
        let within = |v: f32, a: f32, b: f32| v >= a.min(b) && v <= a.max(b);
        if self.dir.is_vertical() {
            self.pos.x == from.x && within(self.pos.y, from.y, to.y)
        } else {
            self.pos.y == from.y && within(self.pos.x, from.x, to.x)
        }
    }

    pub fn view(&self) -> GhostView {
        GhostView {
            id: self.id,
            strategy: self.strategy,
            x: self.pos.x,
            y: self.pos.y,
            dir: self.dir,
            state: self.state,
            blinking: self.blinking,
            aggressive: self.aggressive,
        }
    }
}
