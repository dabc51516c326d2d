use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right,
    Up,
    Left,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Right, Self::Up, Self::Left, Self::Down];
    /// Order used to break ties between equally ranked directions.
    pub const TIE_BREAK: [Direction; 4] = [Self::Up, Self::Left, Self::Down, Self::Right];

    fn index(self) -> usize {
        match self {
            Self::Right => 0,
            Self::Up => 1,
            Self::Left => 2,
            Self::Down => 3,
        }
    }

    pub fn rotate(self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }

    pub fn opposite(self) -> Self {
        self.rotate().rotate()
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Left => (-1, 0),
            Self::Down => (0, 1),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Integer tile coordinate. May lie outside the grid for targeting and tunnel travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction, tiles: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx * tiles,
            y: self.y + dy * tiles,
        }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Continuous position in pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PixelPos {
    pub x: f32,
    pub y: f32,
}

impl PixelPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: PixelPos) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Wall,
    Corridor,
    Pickup,
    PowerPickup,
    Eaten,
    PenFloor,
}

impl TileKind {
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Self::Wall),
            ' ' => Some(Self::Corridor),
            '.' => Some(Self::Pickup),
            'o' => Some(Self::PowerPickup),
            '_' => Some(Self::Eaten),
            '=' => Some(Self::PenFloor),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Corridor => ' ',
            Self::Pickup => '.',
            Self::PowerPickup => 'o',
            Self::Eaten => '_',
            Self::PenFloor => '=',
        }
    }

    /// The holding pen is closed to live actors; ghosts only ever leave it by respawning.
    pub fn blocks_movement(self) -> bool {
        matches!(self, Self::Wall | Self::PenFloor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Pickup,
    PowerPickup,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostMode {
    Scatter,
    Chase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostState {
    Inactive,
    Scatter,
    Chase,
    Vulnerable,
    Eaten,
    Respawning,
}

impl GhostState {
    pub fn from_mode(mode: GhostMode) -> Self {
        match mode {
            GhostMode::Scatter => Self::Scatter,
            GhostMode::Chase => Self::Chase,
        }
    }

    pub fn follows_schedule(self) -> bool {
        matches!(self, Self::Scatter | Self::Chase)
    }

    pub fn is_collidable(self) -> bool {
        matches!(self, Self::Scatter | Self::Chase | Self::Vulnerable)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Pursuer,
    Ambusher,
    Flanker,
    Opportunist,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Self::Pursuer,
        Self::Ambusher,
        Self::Flanker,
        Self::Opportunist,
    ];
}

#[derive(Clone, Debug, Serialize)]
pub struct WorldView {
    pub width: i32,
    pub height: i32,
    #[serde(rename = "tileSize")]
    pub tile_size: f32,
    #[serde(rename = "tunnelRow")]
    pub tunnel_row: Option<i32>,
    pub rows: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    #[serde(rename = "nextDir")]
    pub next_dir: Option<Direction>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub id: usize,
    pub strategy: Strategy,
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    pub state: GhostState,
    pub blinking: bool,
    pub aggressive: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    PickupConsumed {
        x: i32,
        y: i32,
    },
    PowerPickupConsumed {
        x: i32,
        y: i32,
    },
    GhostCaptured {
        #[serde(rename = "ghostId")]
        ghost_id: usize,
        strategy: Strategy,
    },
    LifeLost {
        #[serde(rename = "ghostId")]
        ghost_id: usize,
    },
    LevelCleared {
        level: u32,
    },
    ModeChanged {
        mode: GhostMode,
    },
    GameOver,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub paused: bool,
    pub mode: GhostMode,
    pub level: u32,
    #[serde(rename = "pickupsRemaining")]
    pub pickups_remaining: usize,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameSummary {
    pub score: u32,
    #[serde(rename = "bestScore")]
    pub best_score: u32,
    pub level: u32,
    pub lives: u32,
    pub ticks: u64,
    #[serde(rename = "pickupsConsumed")]
    pub pickups_consumed: u32,
    #[serde(rename = "ghostsCaptured")]
    pub ghosts_captured: u32,
    #[serde(rename = "livesLost")]
    pub lives_lost: u32,
}
