//! Core Engine struct and main simulation loop

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;

use crate::ai::ConeFan;
use crate::core::{DebugInfo, EventQueue, GameEvent, LevelConfig, LevelError, Time};
use crate::ecs::World;
use crate::player::MoveInput;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Run title, shown in logs
    pub title: String,
    /// Simulation frames per second, sets the fixed step (0 falls back to 60)
    pub target_fps: u32,
    /// Stop after this many frames
    pub max_frames: Option<u64>,
    /// Start with the vision cone overlay on
    pub show_cones: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Stealth"),
            target_fps: 60,
            max_frames: None,
            show_cones: false,
        }
    }
}

impl EngineConfig {
    const FALLBACK_FPS: u32 = 60;

    /// Set the run title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Stop the run after `frames` frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Enable or disable the vision cone overlay
    pub fn with_cone_overlay(mut self, show: bool) -> Self {
        self.show_cones = show;
        self
    }

    /// Length of one simulation frame
    pub fn fixed_delta(&self) -> Duration {
        let fps = if self.target_fps == 0 {
            Self::FALLBACK_FPS
        } else {
            self.target_fps
        };
        Duration::from_secs_f64(1.0 / f64::from(fps))
    }
}

/// Game trait that users implement
pub trait Game: 'static {
    /// Called once before the first frame
    fn init(&mut self, _engine: &mut EngineContext) {}

    /// Movement intent for this frame
    fn input(&mut self, engine: &EngineContext) -> MoveInput;

    /// Called every frame after the world has stepped
    fn update(&mut self, engine: &mut EngineContext);

    /// Called every frame that did not request a quit
    fn render(&mut self, _engine: &EngineContext) {}

    /// Called when the run ends
    fn shutdown(&mut self, _engine: &mut EngineContext) {}
}

/// Context passed to game callbacks
pub struct EngineContext {
    /// Time tracking
    pub time: Time,
    /// Maze, player and guards
    pub world: World,
    /// Events from the previous frame
    pub events: EventQueue,
    /// Debug information and stats
    pub debug: DebugInfo,
    level: LevelConfig,
    rng: SmallRng,
    should_quit: bool,
    restart_requested: bool,
}

impl EngineContext {
    fn new(level: LevelConfig, show_cones: bool) -> Result<Self, LevelError> {
        let mut rng = level.rng();
        let world = level.build_world(&mut rng)?;
        let mut debug = DebugInfo::new();
        debug.show_cones = show_cones;

        Ok(Self {
            time: Time::new(),
            world,
            events: EventQueue::new(),
            debug,
            level,
            rng,
            should_quit: false,
            restart_requested: false,
        })
    }

    /// The level this context was built from
    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Check if engine should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Rebuild the level at the start of the next frame
    pub fn request_restart(&mut self) {
        self.restart_requested = true;
    }

    /// Rebuild the world from the level config right away
    ///
    /// Guards are placed with the context's RNG, so an unseeded level gets a
    /// fresh layout each time while a seeded one keeps drawing from the same
    /// stream. Events already swapped in for this frame stay readable; events
    /// pushed by the old world since then are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the level no longer builds; the old world is kept
    pub fn restart(&mut self) -> Result<(), LevelError> {
        self.restart_requested = false;
        self.world = self.level.build_world(&mut self.rng)?;
        self.events.clear_pending();
        self.events.push(GameEvent::LevelRestarted);
        log::info!("Level '{}' restarted", self.level.name);
        Ok(())
    }

    /// Step the world once with `input` over `dt` seconds
    pub fn step(&mut self, input: MoveInput, dt: f32) {
        let started = Instant::now();
        self.world.step(input, dt, &mut self.events);
        self.debug.record_frame(started.elapsed());
    }

    /// Vision cones to draw, empty while the overlay is off
    pub fn cone_fans(&self) -> Vec<ConeFan> {
        self.debug.cone_fans(&self.world)
    }
}

/// Main engine struct
pub struct Engine<G: Game> {
    config: EngineConfig,
    game: G,
    context: EngineContext,
    initialized: bool,
}

impl<G: Game> Engine<G> {
    /// Create a new engine running `level` with the given game
    ///
    /// # Errors
    ///
    /// Returns an error if the level cannot be built
    pub fn new(config: EngineConfig, level: LevelConfig, game: G) -> Result<Self, LevelError> {
        let context = EngineContext::new(level, config.show_cones)?;
        Ok(Self {
            config,
            game,
            context,
            initialized: false,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.context
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Rebuild the world from the level config
    ///
    /// # Errors
    ///
    /// Returns an error if the level no longer builds
    pub fn restart(&mut self) -> Result<(), LevelError> {
        self.context.restart()
    }

    /// Run a single frame. Returns `false` once the game asked to quit.
    pub fn frame(&mut self) -> bool {
        if !self.initialized {
            self.game.init(&mut self.context);
            self.initialized = true;
        }

        let delta = self.config.fixed_delta();
        self.context.time.advance(delta);
        self.context.events.swap();

        if self.context.restart_requested {
            if let Err(e) = self.context.restart() {
                log::error!("Restart failed: {e}");
            }
        }

        let input = self.game.input(&self.context);
        self.context.step(input, delta.as_secs_f32());

        self.game.update(&mut self.context);
        if self.context.should_quit() {
            return false;
        }

        self.game.render(&self.context);
        true
    }

    /// Run until the game quits or `max_frames` is reached
    pub fn run(mut self) -> Result<G, Box<dyn std::error::Error>> {
        // Ignore the error when a logger is already installed
        let _ = env_logger::try_init();
        log::info!(
            "Starting {}: level '{}', step {:?}",
            self.config.title,
            self.context.level.name,
            self.config.fixed_delta()
        );

        loop {
            if self
                .config
                .max_frames
                .is_some_and(|max| self.context.time.frame_count() >= max)
            {
                log::info!("Frame limit reached");
                break;
            }
            if !self.frame() {
                log::info!("Quit requested, shutting down");
                break;
            }
        }

        self.game.shutdown(&mut self.context);
        log::info!(
            "Stopped after {} frames ({:.2}s simulated). {}",
            self.context.time.frame_count(),
            self.context.time.elapsed_seconds(),
            self.context.debug.frame_stats.format_stats()
        );
        Ok(self.game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walks right forever and remembers every event it saw
    #[derive(Default)]
    struct Recorder {
        seen: Vec<GameEvent>,
        quit_after: Option<u64>,
        restart_on_frame: Option<u64>,
        rendered: u64,
    }

    impl Game for Recorder {
        fn input(&mut self, _engine: &EngineContext) -> MoveInput {
            MoveInput::new(1, 0)
        }

        fn update(&mut self, engine: &mut EngineContext) {
            self.seen.extend(engine.events.iter().cloned());
            let frame = engine.time.frame_count();
            if self.restart_on_frame == Some(frame) {
                engine.request_restart();
            }
            if self.quit_after.is_some_and(|n| frame >= n) {
                engine.quit();
            }
        }

        fn render(&mut self, _engine: &EngineContext) {
            self.rendered += 1;
        }
    }

    fn quiet_level() -> LevelConfig {
        LevelConfig {
            guard_count: 0,
            seed: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_fixed_delta() {
        let config = EngineConfig::default().with_target_fps(50);
        assert_eq!(config.fixed_delta(), Duration::from_millis(20));

        let config = EngineConfig::default().with_target_fps(0);
        assert_eq!(config.fixed_delta(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn test_run_stops_at_frame_limit() {
        let config = EngineConfig::default().with_max_frames(10);
        let engine = Engine::new(config, quiet_level(), Recorder::default()).unwrap();

        let game = engine.run().unwrap();
        assert_eq!(game.rendered, 10);
    }

    #[test]
    fn test_quit_skips_render() {
        let game = Recorder {
            quit_after: Some(3),
            ..Default::default()
        };
        let engine = Engine::new(EngineConfig::default(), quiet_level(), game).unwrap();

        let game = engine.run().unwrap();
        assert_eq!(game.rendered, 2);
    }

    #[test]
    fn test_restart_rebuilds_world() {
        let mut engine = Engine::new(EngineConfig::default(), quiet_level(), Recorder {
            restart_on_frame: Some(5),
            ..Default::default()
        })
        .unwrap();

        let start = engine.context().world.player().unwrap().position();
        for _ in 0..5 {
            assert!(engine.frame());
        }
        assert_ne!(engine.context().world.player().unwrap().position(), start);

        // Restart happens at the start of frame 6, so frame 7 reads the event
        assert!(engine.frame());
        assert!(engine.frame());
        assert!(engine.game().seen.contains(&GameEvent::LevelRestarted));
    }

    #[test]
    fn test_restart_keeps_previous_frame_events() {
        let mut engine = Engine::new(EngineConfig::default(), quiet_level(), Recorder {
            restart_on_frame: Some(1),
            ..Default::default()
        })
        .unwrap();

        assert!(engine.frame());
        let player = engine.context().world.player_entity().unwrap();
        let marker = GameEvent::PlayerCaught {
            guard: player,
            position: glam::Vec2::ZERO,
        };
        engine.context_mut().events.push(marker.clone());

        // Frame 2 restarts before the game reads last frame's events
        assert!(engine.frame());
        assert!(engine.game().seen.contains(&marker));
        assert!(!engine.game().seen.contains(&GameEvent::LevelRestarted));

        assert!(engine.frame());
        assert!(engine.game().seen.contains(&GameEvent::LevelRestarted));
    }

    #[test]
    fn test_restart_resets_player() {
        let mut engine =
            Engine::new(EngineConfig::default(), quiet_level(), Recorder::default()).unwrap();
        let start = engine.context().world.player().unwrap().position();

        engine.frame();
        engine.restart().unwrap();
        assert_eq!(engine.context().world.player().unwrap().position(), start);
    }

    #[test]
    fn test_cone_overlay_from_config() {
        let level = LevelConfig {
            guard_count: 2,
            seed: Some(4),
            ..Default::default()
        };
        let engine = Engine::new(
            EngineConfig::default().with_cone_overlay(true),
            level.clone(),
            Recorder::default(),
        )
        .unwrap();
        assert_eq!(engine.context().cone_fans().len(), 2);

        let engine = Engine::new(EngineConfig::default(), level, Recorder::default()).unwrap();
        assert!(engine.context().cone_fans().is_empty());
    }

    #[test]
    fn test_invalid_level_rejected() {
        let level = LevelConfig {
            tiles: Vec::new(),
            ..Default::default()
        };
        assert!(Engine::new(EngineConfig::default(), level, Recorder::default()).is_err());
    }
}
