use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::WorldError;
use crate::ghost::Ghost;
use crate::mode::ModeScheduler;
use crate::player::Player;
use crate::session::Session;
use crate::timers::TimerTable;
use crate::types::{
    Direction, GameSummary, GhostMode, PickupKind, RuntimeEvent, Snapshot, Strategy, WorldView,
};
use crate::world::{LevelLayout, World};

mod collision_system;
mod lifecycle_system;
mod utils;

use self::utils::{target_context, within_radius};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum EngineTimer {
    ResumePlay,
}

/// One maze, one player and four ghosts, advanced one fixed tick at a time.
#[derive(Clone, Debug)]
pub struct GameEngine {
    pub config: GameConfig,
    pub world: World,

    /// Untouched copy of the level, restored on level-up and restart.
    pristine: World,
    player: Player,
    ghosts: Vec<Ghost>,
    scheduler: ModeScheduler,
    timers: TimerTable<EngineTimer>,
    events: Vec<RuntimeEvent>,
    tick_counter: u64,
    level: u32,
    paused: bool,
    /// Set during the synchronized respawn delay; nothing moves and the mode clock stops.
    frozen: bool,
    ended: bool,
}

impl GameEngine {
    pub fn new(config: GameConfig, layout: LevelLayout) -> Result<Self, WorldError> {
        let world = World::new(&layout, config.tile_size)?;
        let reachable = world.reachable_from(world.player_spawn).len();
        let open = (0..world.height)
            .flat_map(|row| (0..world.width).map(move |col| (col, row)))
            .filter(|(col, row)| !world.is_blocked(*col, *row))
            .count();
        if reachable != open {
            warn!(open, reachable, "layout has open tiles the player cannot reach");
        }
        let player = Player::new(world.player_spawn, &world);
        let scheduler = ModeScheduler::from_config(&config);
        let ghosts = Strategy::ALL
            .iter()
            .zip(world.ghost_spawns)
            .enumerate()
            .map(|(id, (strategy, spawn))| {
                let mut ghost = Ghost::new(id, *strategy, spawn, &world);
                ghost.activate(scheduler.mode());
                ghost
            })
            .collect();

        Ok(Self {
            config,
            pristine: world.clone(),
            world,
            player,
            ghosts,
            scheduler,
            timers: TimerTable::new(),
            events: Vec::new(),
            tick_counter: 0,
            level: 1,
            paused: false,
            frozen: false,
            ended: false,
        })
    }

    pub fn classic(config: GameConfig) -> Self {
        Self::new(config, LevelLayout::classic()).expect("built-in layout should be valid")
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn tick(&self) -> u64 {
        self.tick_counter
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn mode(&self) -> GhostMode {
        self.scheduler.mode()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn set_player_intent(&mut self, dir: Direction) {
        self.player.set_intent(dir);
    }

    /// Suspends the tick loop and every pending timer. Paused ticks never count
    /// toward vulnerability, mode or respawn durations.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(tick = self.tick_counter, "paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            debug!(tick = self.tick_counter, "resumed");
        }
    }

    pub fn step(&mut self, session: &mut Session) {
        if self.ended || self.paused {
            return;
        }
        let first_new = self.events.len();
        self.tick_counter += 1;
        self.update_engine_timers();

        if !self.frozen {
            self.update_player();
            if self.world.pickups_remaining() == 0 {
                self.clear_level();
            } else {
                self.update_mode();
                self.update_ghosts();
                self.resolve_collisions();
            }
        }

        for event in &self.events[first_new..] {
            session.record(event);
        }
        if session.is_game_over() {
            self.ended = true;
            self.events.push(RuntimeEvent::GameOver);
            info!(
                tick = self.tick_counter,
                score = session.score,
                level = self.level,
                "game over"
            );
        }
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let snapshot = Snapshot {
            tick: self.tick_counter,
            paused: self.paused,
            mode: self.scheduler.mode(),
            level: self.level,
            pickups_remaining: self.world.pickups_remaining(),
            player: self.player.view(),
            ghosts: self.ghosts.iter().map(Ghost::view).collect(),
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    pub fn world_view(&self) -> WorldView {
        self.world.view()
    }

    pub fn build_summary(&self, session: &Session) -> GameSummary {
        session.summary(self.tick_counter)
    }

    fn update_player(&mut self) {
        self.player.update(&self.world, &self.config);
        let tile = self.player.tile(&self.world);
        match self.world.remove_pickup(tile.x, tile.y) {
            Some(PickupKind::Pickup) => {
                self.events.push(RuntimeEvent::PickupConsumed {
                    x: tile.x,
                    y: tile.y,
                });
            }
            Some(PickupKind::PowerPickup) => {
                self.events.push(RuntimeEvent::PowerPickupConsumed {
                    x: tile.x,
                    y: tile.y,
                });
                self.power_pickup_consumed();
            }
            None => {}
        }
    }

    fn update_mode(&mut self) {
        let Some(mode) = self.scheduler.advance() else {
            return;
        };
        for ghost in &mut self.ghosts {
            ghost.on_mode_flip(mode, &self.world);
        }
        self.events.push(RuntimeEvent::ModeChanged { mode });
        debug!(tick = self.tick_counter, ?mode, "mode changed");
    }

    fn update_ghosts(&mut self) {
        let mode = self.scheduler.mode();
        let pickups_remaining = self.world.pickups_remaining();
        for ghost in &mut self.ghosts {
            ghost.update_timers(self.tick_counter, &self.world, &self.config, mode);
            ghost.update_aggression(pickups_remaining, &self.config);
        }

        let ctx = target_context(&self.player, &self.ghosts, &self.world);
        for ghost in &mut self.ghosts {
            ghost.step(&ctx, &self.world, &self.config, self.level);
        }
    }
}
