use crate::types::GhostMode;

pub const TICK_RATE: u32 = 60;

pub const TILE_SIZE: f32 = 16.0;

pub const PLAYER_SPEED: f32 = 1.5;
pub const GHOST_SPEED: f32 = 1.33;
pub const VULNERABLE_SPEED_RATIO: f32 = 0.5;
pub const AGGRESSIVE_SPEED_RATIO: f32 = 1.2;
pub const LEVEL_SPEED_SCALE: f32 = 1.1;

/// Inset from a tile edge that still lets the player take a turn early.
pub const PLAYER_CORNER_MARGIN: f32 = 4.0;

pub const VULNERABLE_DURATION_MS: u64 = 10_000;
pub const BLINK_WARNING_MS: u64 = 3_000;
pub const BLINK_INTERVAL_MS: u64 = 250;
pub const EATEN_HOLD_MS: u64 = 500;
pub const RESPAWN_DURATION_MS: u64 = 7_000;
pub const LIFE_LOST_DELAY_MS: u64 = 1_000;

pub const AGGRESSIVE_PICKUP_THRESHOLD: usize = 20;
pub const AMBUSHER_LEAD_TILES: i32 = 4;
pub const FLANKER_LEAD_TILES: i32 = 2;
pub const OPPORTUNIST_RETREAT_TILES: f32 = 8.0;
pub const COLLISION_RADIUS_RATIO: f32 = 0.8;

// Ghost steering credits.
pub const LOWER_HALF_VERTICAL_WEIGHT: f32 = 1.5;
pub const CONTINUE_BONUS: f32 = 0.5;
pub const INTERSECTION_VERTICAL_BONUS: f32 = 0.25;

pub const PICKUP_SCORE: u32 = 10;
pub const POWER_PICKUP_SCORE: u32 = 50;
pub const GHOST_SCORE: u32 = 200;
pub const STARTING_LIVES: u32 = 3;

pub const CLASSIC_LAYOUT: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.#####.##.#####.######",
    "######.#####.##.#####.######",
    "######.##..........##.######",
    "######.##.###==###.##.######",
    "######.##.#======#.##.######",
    "..........#======#..........",
    "######.##.#======#.##.######",
    "######.##.########.##.######",
    "######.##..........##.######",
    "######.##.########.##.######",
    "######.##.########.##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##................##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];
pub const CLASSIC_TUNNEL_ROW: i32 = 14;
pub const CLASSIC_PLAYER_SPAWN: (i32, i32) = (14, 23);
pub const CLASSIC_GHOST_SPAWNS: [(i32, i32); 4] = [(13, 11), (14, 11), (15, 11), (16, 11)];

/// Cumulative cutoffs in active milliseconds. Chase is permanent after the last one.
pub const DEFAULT_MODE_SCHEDULE: [(u64, GhostMode); 7] = [
    (7_000, GhostMode::Scatter),
    (27_000, GhostMode::Chase),
    (34_000, GhostMode::Scatter),
    (54_000, GhostMode::Chase),
    (59_000, GhostMode::Scatter),
    (79_000, GhostMode::Chase),
    (84_000, GhostMode::Scatter),
];

