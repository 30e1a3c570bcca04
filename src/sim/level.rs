//! Level data: platforms, obstacles, patrolling hazards, decorations, goal
//!
//! Levels are hand-placed. `LevelBuilder` checks every structural
//! invariant once, at build time, so the tick never has to.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geom::Rect;
use crate::consts::*;

/// Which collection an offending entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Platform,
    Obstacle,
    Hazard,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Platform => "platform",
            EntityKind::Obstacle => "obstacle",
            EntityKind::Hazard => "hazard",
        };
        f.write_str(name)
    }
}

/// Structural problems found while building a level
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("level has no goal")]
    MissingGoal,
    #[error("world width {width} is narrower than the required {required}")]
    WorldTooNarrow { width: f32, required: f32 },
    #[error("goal at x={x} lies outside the world")]
    GoalOutOfWorld { x: f32 },
    #[error("{kind} #{index} lies outside [0, world width]")]
    OutOfWorld { kind: EntityKind, index: usize },
    #[error("hazard #{index} has an inverted patrol interval [{min}, {max}]")]
    InvertedPatrol { index: usize, min: f32, max: f32 },
    #[error("hazard #{index} spawns at x={x}, outside its patrol interval [{min}, {max}]")]
    SpawnOutsidePatrol {
        index: usize,
        x: f32,
        min: f32,
        max: f32,
    },
    #[error("hazard #{index} overlaps the goal")]
    HazardOverlapsGoal { index: usize },
    #[error("{kind} #{index} overlaps the player spawn")]
    SpawnBlocked { kind: EntityKind, index: usize },
    #[error("player spawn overlaps the goal")]
    SpawnOnGoal,
}

/// Closed horizontal interval a hazard walks back and forth over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub min: f32,
    pub max: f32,
}

impl Patrol {
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min && x <= self.max
    }
}

/// A patrolling enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub pos: Vec2,
    pub size: Vec2,
    pub patrol: Patrol,
    /// Walking speed (px/s)
    pub speed: f32,
    /// +1.0 walking right, -1.0 walking left
    pub dir: f32,
    /// Position within the blink cycle (s)
    pub blink_phase: f32,
}

impl Hazard {
    /// Square hazard starting at `(x, y)` walking right
    pub fn new(x: f32, y: f32, size: f32, min: f32, max: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::splat(size),
            patrol: Patrol { min, max },
            speed,
            dir: 1.0,
            blink_phase: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.size)
    }

    /// Walk along the patrol interval, turning around at either end
    pub fn patrol(&mut self, dt: f32) {
        self.pos.x += self.dir * self.speed * dt;
        if self.pos.x >= self.patrol.max {
            self.pos.x = self.patrol.max;
            self.dir = -1.0;
        } else if self.pos.x <= self.patrol.min {
            self.pos.x = self.patrol.min;
            self.dir = 1.0;
        }
    }

    /// Advance the cosmetic blink cycle
    pub fn advance_blink(&mut self, dt: f32, period: f32) {
        if period > 0.0 {
            self.blink_phase = (self.blink_phase + dt) % period;
        }
    }

    /// True during the short window at the start of each blink cycle
    pub fn is_blinking(&self, window: f32) -> bool {
        self.blink_phase < window
    }
}

/// Purely cosmetic scenery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationKind {
    Seashell,
    Starfish,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub pos: Vec2,
}

/// Size decorations are drawn at
pub const DECORATION_SIZE: f32 = 32.0;

/// The heart at the end of the level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub rect: Rect,
    /// Player is close enough for the goal to react (presentation only)
    pub near: bool,
}

/// A complete, validated level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// One-way platforms; index 0 is the floor spanning the whole world
    pub platforms: Vec<Rect>,
    pub obstacles: Vec<Rect>,
    pub hazards: Vec<Hazard>,
    pub decorations: Vec<Decoration>,
    pub goal: Goal,
    pub world_width: f32,
    /// Top-left corner of the player on spawn and after every reset
    pub spawn: Vec2,
}

impl Level {
    /// The hand-built level the game ships with
    pub fn canonical() -> Self {
        match canonical_builder().build_corrected() {
            Ok(level) => level,
            Err(err) => {
                log::error!("Canonical level failed validation: {}, using fallback", err);
                Self::fallback()
            }
        }
    }

    /// Bare floor with the goal at the far end
    pub fn fallback() -> Self {
        let goal_size = 56.0;
        LevelBuilder::new()
            .spawn(80.0, FLOOR_Y - PLAYER_H)
            .goal(Rect::new(
                MIN_WORLD_WIDTH - GOAL_MARGIN - goal_size,
                FLOOR_Y - goal_size,
                goal_size,
                goal_size,
            ))
            .assemble()
    }

    /// Player rectangle at the spawn point
    pub fn spawn_rect(&self) -> Rect {
        Rect::at(self.spawn, Vec2::new(PLAYER_W, PLAYER_H))
    }

    /// Minimum width that fits the goal plus its trailing margin
    pub fn required_width(goal: &Rect) -> f32 {
        goal.right() + GOAL_MARGIN
    }

    /// Check every structural invariant
    pub fn validate(&self) -> Result<(), LevelError> {
        let required = Self::required_width(&self.goal.rect);
        if self.world_width < required {
            return Err(LevelError::WorldTooNarrow {
                width: self.world_width,
                required,
            });
        }
        if !self.goal.rect.within_width(self.world_width) {
            return Err(LevelError::GoalOutOfWorld {
                x: self.goal.rect.x,
            });
        }

        for (index, platform) in self.platforms.iter().enumerate() {
            if !platform.within_width(self.world_width) {
                return Err(LevelError::OutOfWorld {
                    kind: EntityKind::Platform,
                    index,
                });
            }
        }

        let spawn = self.spawn_rect();
        if spawn.overlaps(&self.goal.rect) {
            return Err(LevelError::SpawnOnGoal);
        }

        for (index, obstacle) in self.obstacles.iter().enumerate() {
            if !obstacle.within_width(self.world_width) {
                return Err(LevelError::OutOfWorld {
                    kind: EntityKind::Obstacle,
                    index,
                });
            }
            if obstacle.overlaps(&spawn) {
                return Err(LevelError::SpawnBlocked {
                    kind: EntityKind::Obstacle,
                    index,
                });
            }
        }

        for (index, hazard) in self.hazards.iter().enumerate() {
            let Patrol { min, max } = hazard.patrol;
            if min > max {
                return Err(LevelError::InvertedPatrol { index, min, max });
            }
            if !hazard.patrol.contains(hazard.pos.x) {
                return Err(LevelError::SpawnOutsidePatrol {
                    index,
                    x: hazard.pos.x,
                    min,
                    max,
                });
            }
            // The hazard sweeps its whole interval, so check both extremes
            let sweep = Rect::new(min, hazard.pos.y, max - min + hazard.size.x, hazard.size.y);
            if min < 0.0 || sweep.right() > self.world_width {
                return Err(LevelError::OutOfWorld {
                    kind: EntityKind::Hazard,
                    index,
                });
            }
            if hazard.rect().overlaps(&self.goal.rect) {
                return Err(LevelError::HazardOverlapsGoal { index });
            }
            if hazard.rect().overlaps(&spawn) {
                return Err(LevelError::SpawnBlocked {
                    kind: EntityKind::Hazard,
                    index,
                });
            }
        }

        Ok(())
    }
}

/// Incremental level construction with build-time validation
#[derive(Debug, Clone)]
pub struct LevelBuilder {
    platforms: Vec<Rect>,
    obstacles: Vec<Rect>,
    hazards: Vec<Hazard>,
    decorations: Vec<Decoration>,
    goal: Option<Rect>,
    spawn: Vec2,
    world_width: Option<f32>,
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelBuilder {
    pub fn new() -> Self {
        Self {
            platforms: Vec::new(),
            obstacles: Vec::new(),
            hazards: Vec::new(),
            decorations: Vec::new(),
            goal: None,
            spawn: Vec2::new(80.0, 380.0),
            world_width: None,
        }
    }

    pub fn spawn(mut self, x: f32, y: f32) -> Self {
        self.spawn = Vec2::new(x, y);
        self
    }

    /// Force a world width instead of deriving it from the goal
    pub fn world_width(mut self, width: f32) -> Self {
        self.world_width = Some(width);
        self
    }

    pub fn platform(mut self, rect: Rect) -> Self {
        self.platforms.push(rect);
        self
    }

    pub fn obstacle(mut self, rect: Rect) -> Self {
        self.obstacles.push(rect);
        self
    }

    pub fn hazard(mut self, hazard: Hazard) -> Self {
        self.hazards.push(hazard);
        self
    }

    pub fn decoration(mut self, kind: DecorationKind, x: f32, y: f32) -> Self {
        self.decorations.push(Decoration {
            kind,
            pos: Vec2::new(x, y),
        });
        self
    }

    pub fn goal(mut self, rect: Rect) -> Self {
        self.goal = Some(rect);
        self
    }

    /// Build, rejecting any invariant violation
    pub fn build(self) -> Result<Level, LevelError> {
        if self.goal.is_none() {
            return Err(LevelError::MissingGoal);
        }
        let level = self.assemble();
        level.validate()?;
        Ok(level)
    }

    /// Build, first repairing what can be repaired without guessing intent
    ///
    /// Inverted patrol intervals are swapped, hazards spawning outside
    /// their interval are pulled onto it, and a forced world width that
    /// cannot fit the goal is widened. Everything else is still rejected.
    pub fn build_corrected(mut self) -> Result<Level, LevelError> {
        let Some(goal) = self.goal else {
            return Err(LevelError::MissingGoal);
        };

        for (index, hazard) in self.hazards.iter_mut().enumerate() {
            let Patrol { min, max } = hazard.patrol;
            if min > max {
                log::warn!("Hazard #{} patrol [{}, {}] inverted, swapping", index, min, max);
                hazard.patrol = Patrol { min: max, max: min };
            }
            if !hazard.patrol.contains(hazard.pos.x) {
                let x = hazard.pos.x.clamp(hazard.patrol.min, hazard.patrol.max);
                log::warn!("Hazard #{} spawn x={} outside patrol, moved to {}", index, hazard.pos.x, x);
                hazard.pos.x = x;
            }
        }

        let required = Level::required_width(&goal);
        if let Some(width) = self.world_width {
            if width < required {
                log::warn!("World width {} cannot fit the goal, widening to {}", width, required);
                self.world_width = Some(required);
            }
        }

        self.build()
    }

    /// Assemble without validation; prepends the floor
    fn assemble(self) -> Level {
        let goal = self.goal.unwrap_or_default();
        let world_width = self
            .world_width
            .unwrap_or_else(|| MIN_WORLD_WIDTH.max(Level::required_width(&goal)));

        let mut platforms = Vec::with_capacity(self.platforms.len() + 1);
        platforms.push(Rect::new(0.0, FLOOR_Y, world_width, FLOOR_H));
        platforms.extend(self.platforms);

        Level {
            platforms,
            obstacles: self.obstacles,
            hazards: self.hazards,
            decorations: self.decorations,
            goal: Goal {
                rect: goal,
                near: false,
            },
            world_width,
            spawn: self.spawn,
        }
    }
}

/// Standard platform thickness
const PLATFORM_H: f32 = 24.0;

/// The shipped layout
fn canonical_builder() -> LevelBuilder {
    let obstacle_w = 160.0;
    let obstacle_h = 48.0;

    // Starting ledge, twice an obstacle wide, with the first obstacle
    // butted against its right edge
    let start = Rect::new(60.0, 444.0, obstacle_w * 2.0, PLATFORM_H);
    let first_obstacle = Rect::new(
        start.right(),
        start.bottom() - obstacle_h / 2.0,
        obstacle_w,
        obstacle_h,
    );

    let ledges = [
        (420.0, 380.0, 220.0),
        (700.0, 340.0, 180.0),
        (980.0, 300.0, 150.0),
        (1220.0, 340.0, 200.0),
        (1480.0, 300.0, 140.0),
        (1740.0, 340.0, 180.0),
        (2000.0, 320.0, 160.0),
        (2260.0, 360.0, 220.0),
        (2620.0, 320.0, 160.0),
        (2880.0, 360.0, 180.0),
        (3180.0, 300.0, 220.0),
        (3500.0, 340.0, 220.0),
    ];

    let mut builder = LevelBuilder::new()
        .spawn(80.0, 380.0)
        .platform(start)
        .obstacle(first_obstacle)
        .obstacle(Rect::new(820.0, 506.0, 80.0, 48.0))
        .obstacle(Rect::new(1880.0, 286.0, 80.0, 48.0))
        .obstacle(Rect::new(2380.0, 326.0, 80.0, 48.0));

    for (x, y, w) in ledges {
        builder = builder.platform(Rect::new(x, y, w, PLATFORM_H));
    }

    // The ledge guard patrols the far half of the starting ledge
    builder = builder
        .hazard(Hazard::new(
            start.x + 200.0,
            start.y - 40.0,
            40.0,
            start.x + 140.0,
            start.right() - 40.0,
            50.0,
        ))
        .hazard(Hazard::new(760.0, 268.0, 36.0, 700.0, 820.0, 55.0))
        .hazard(Hazard::new(1500.0, 328.0, 36.0, 1480.0, 1640.0, 50.0))
        .hazard(Hazard::new(1900.0, 288.0, 36.0, 1840.0, 2060.0, 45.0))
        .hazard(Hazard::new(2500.0, 328.0, 36.0, 2420.0, 2780.0, 60.0))
        .hazard(Hazard::new(3100.0, 268.0, 36.0, 2920.0, 3300.0, 50.0));

    for (x, y) in [(320.0, 352.0), (1160.0, 324.0), (2560.0, 292.0), (3440.0, 312.0)] {
        builder = builder.decoration(DecorationKind::Seashell, x, y);
    }
    for (x, y) in [(640.0, 316.0), (2200.0, 336.0), (3120.0, 284.0)] {
        builder = builder.decoration(DecorationKind::Starfish, x, y);
    }

    builder.goal(Rect::new(3780.0, 284.0, 56.0, 56.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> LevelBuilder {
        LevelBuilder::new()
            .spawn(80.0, 380.0)
            .goal(Rect::new(1000.0, 400.0, 56.0, 56.0))
    }

    #[test]
    fn test_canonical_is_valid() {
        let level = Level::canonical();
        assert_eq!(level.validate(), Ok(()));
        assert_eq!(level.spawn, Vec2::new(80.0, 380.0));
        assert_eq!(level.hazards.len(), 6);
        assert_eq!(level.obstacles.len(), 4);
        // Floor plus start ledge plus twelve ledges
        assert_eq!(level.platforms.len(), 14);
        assert_eq!(level.decorations.len(), 7);
    }

    #[test]
    fn test_fallback_is_valid() {
        let level = Level::fallback();
        assert_eq!(level.validate(), Ok(()));
        assert_eq!(level.world_width, MIN_WORLD_WIDTH);
        assert_eq!(level.platforms.len(), 1);
        assert_eq!(level.spawn_rect().bottom(), FLOOR_Y);
    }

    #[test]
    fn test_canonical_floor_spans_world() {
        let level = Level::canonical();
        let floor = level.platforms[0];
        assert_eq!(floor.x, 0.0);
        assert_eq!(floor.y, FLOOR_Y);
        assert_eq!(floor.w, level.world_width);
    }

    #[test]
    fn test_canonical_world_fits_goal() {
        let level = Level::canonical();
        assert!(level.world_width >= level.goal.rect.right() + GOAL_MARGIN);
        assert!(level.goal.rect.within_width(level.world_width));
    }

    #[test]
    fn test_canonical_hazards_contain_spawn() {
        let level = Level::canonical();
        for hazard in &level.hazards {
            assert!(hazard.patrol.contains(hazard.pos.x));
            assert!(!hazard.rect().overlaps(&level.goal.rect));
            assert_eq!(hazard.dir, 1.0);
        }
    }

    #[test]
    fn test_canonical_is_deterministic() {
        assert_eq!(Level::canonical(), Level::canonical());
    }

    #[test]
    fn test_missing_goal_rejected() {
        let result = LevelBuilder::new().build();
        assert_eq!(result, Err(LevelError::MissingGoal));
    }

    #[test]
    fn test_spawn_outside_patrol_rejected() {
        let result = minimal()
            .hazard(Hazard::new(500.0, 300.0, 36.0, 600.0, 700.0, 50.0))
            .build();
        assert!(matches!(
            result,
            Err(LevelError::SpawnOutsidePatrol { index: 0, .. })
        ));
    }

    #[test]
    fn test_spawn_outside_patrol_corrected() {
        let level = minimal()
            .hazard(Hazard::new(500.0, 300.0, 36.0, 600.0, 700.0, 50.0))
            .build_corrected()
            .unwrap();
        assert_eq!(level.hazards[0].pos.x, 600.0);
    }

    #[test]
    fn test_inverted_patrol_rejected_then_corrected() {
        let builder = minimal().hazard(Hazard::new(650.0, 300.0, 36.0, 700.0, 600.0, 50.0));
        assert!(matches!(
            builder.clone().build(),
            Err(LevelError::InvertedPatrol { .. })
        ));
        let level = builder.build_corrected().unwrap();
        assert_eq!(level.hazards[0].patrol, Patrol { min: 600.0, max: 700.0 });
    }

    #[test]
    fn test_hazard_on_goal_rejected() {
        let result = minimal()
            .hazard(Hazard::new(1010.0, 410.0, 36.0, 900.0, 1100.0, 50.0))
            .build_corrected();
        assert_eq!(result, Err(LevelError::HazardOverlapsGoal { index: 0 }));
    }

    #[test]
    fn test_narrow_world_rejected_then_widened() {
        let builder = minimal().world_width(1200.0);
        assert!(matches!(
            builder.clone().build(),
            Err(LevelError::WorldTooNarrow { .. })
        ));
        let level = builder.build_corrected().unwrap();
        assert_eq!(level.world_width, 1056.0 + GOAL_MARGIN);
        assert_eq!(level.platforms[0].w, level.world_width);
    }

    #[test]
    fn test_obstacle_out_of_world_rejected() {
        let result = minimal().obstacle(Rect::new(-10.0, 500.0, 40.0, 20.0)).build();
        assert_eq!(
            result,
            Err(LevelError::OutOfWorld {
                kind: EntityKind::Obstacle,
                index: 0
            })
        );
    }

    #[test]
    fn test_obstacle_on_spawn_rejected() {
        let result = minimal().obstacle(Rect::new(100.0, 400.0, 40.0, 20.0)).build();
        assert_eq!(
            result,
            Err(LevelError::SpawnBlocked {
                kind: EntityKind::Obstacle,
                index: 0
            })
        );
    }

    #[test]
    fn test_spawn_on_goal_rejected() {
        let result = LevelBuilder::new()
            .spawn(1000.0, 400.0)
            .goal(Rect::new(1000.0, 400.0, 56.0, 56.0))
            .build();
        assert_eq!(result, Err(LevelError::SpawnOnGoal));
    }

    #[test]
    fn test_error_messages_name_the_entity() {
        let err = LevelError::SpawnBlocked {
            kind: EntityKind::Hazard,
            index: 2,
        };
        assert_eq!(err.to_string(), "hazard #2 overlaps the player spawn");
    }

    #[test]
    fn test_hazard_patrol_turns_at_bounds() {
        let mut hazard = Hazard::new(815.0, 0.0, 36.0, 700.0, 820.0, 55.0);
        hazard.patrol(0.2);
        assert_eq!(hazard.pos.x, 820.0);
        assert_eq!(hazard.dir, -1.0);

        let mut hazard = Hazard::new(705.0, 0.0, 36.0, 700.0, 820.0, 55.0);
        hazard.dir = -1.0;
        hazard.patrol(0.2);
        assert_eq!(hazard.pos.x, 700.0);
        assert_eq!(hazard.dir, 1.0);
    }

    #[test]
    fn test_hazard_blink_cycle() {
        let mut hazard = Hazard::new(760.0, 0.0, 36.0, 700.0, 820.0, 55.0);
        assert!(hazard.is_blinking(0.15));
        hazard.advance_blink(1.0, 3.0);
        assert!(!hazard.is_blinking(0.15));
        hazard.advance_blink(2.05, 3.0);
        assert!(hazard.is_blinking(0.15));
        assert!(hazard.blink_phase < 3.0);
    }
}
