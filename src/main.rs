//! Headless run of a stealth level with scripted keyboard input
//!
//! Usage: `stealth [LEVEL.ron|LEVEL.json]`. Without an argument the built-in
//! level is used. Set `RUST_LOG=debug` to see guard turns and state lines.

use std::env;
use std::error::Error;

use stealth::prelude::*;

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq)]
enum Outcome {
    Caught,
    Escaped,
}

/// Plays back key presses at fixed frames, the way a window would deliver them
struct ScriptedRun {
    input: Input,
    script: Vec<(u64, KeyCode, ElementState)>,
    outcome: Option<Outcome>,
}

impl ScriptedRun {
    /// Walk down the left corridor, then right along the second row
    fn corridor_walk() -> Self {
        Self {
            input: Input::new(),
            script: vec![
                (1, KeyCode::KeyC, ElementState::Pressed),
                (1, KeyCode::KeyS, ElementState::Pressed),
                (2, KeyCode::KeyC, ElementState::Released),
                (27, KeyCode::KeyS, ElementState::Released),
                (28, KeyCode::KeyD, ElementState::Pressed),
            ],
            outcome: None,
        }
    }
}

impl Game for ScriptedRun {
    fn init(&mut self, ctx: &mut EngineContext) {
        log::info!(
            "Running '{}' with {} guards",
            ctx.level().name,
            ctx.world.guard_count()
        );
    }

    fn input(&mut self, ctx: &EngineContext) -> MoveInput {
        let frame = ctx.time.frame_count();
        for &(_, key, state) in self.script.iter().filter(|(at, ..)| *at == frame) {
            self.input.process_keyboard(key, state);
        }
        self.input.move_input()
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        for event in ctx.events.iter() {
            match event {
                GameEvent::PlayerSpotted { guard, position } => {
                    log::info!("{guard:?} spotted the player at {position}");
                }
                GameEvent::PlayerLost { guard, .. } => {
                    log::info!("{guard:?} lost the player");
                }
                GameEvent::PatrolTurned { guard, toward } => {
                    log::debug!("{guard:?} turned toward {toward}");
                }
                GameEvent::PlayerCaught { guard, .. } => {
                    log::info!("Caught by {guard:?}");
                    self.outcome = Some(Outcome::Caught);
                }
                GameEvent::GoalReached { .. } => {
                    log::info!("Reached the goal");
                    self.outcome = Some(Outcome::Escaped);
                }
                GameEvent::LevelRestarted => log::info!("Level restarted"),
                _ => {}
            }
        }

        if self.input.cone_toggle_requested() {
            ctx.debug.toggle_cones();
        }
        if self.input.restart_requested() {
            ctx.request_restart();
        }
        if self.outcome.is_some() || self.input.quit_requested() {
            ctx.quit();
        }
    }

    fn render(&mut self, ctx: &EngineContext) {
        if ctx.time.frame_count() % 60 == 0 {
            for line in ctx.debug.all_lines(&ctx.world) {
                log::debug!("{line}");
            }
            let cones = ctx.cone_fans();
            if !cones.is_empty() {
                let triangles: usize = cones.iter().map(|fan| fan.triangles().count()).sum();
                log::debug!("{} cones, {triangles} triangles", cones.len());
            }
        }

        // Per-frame key state is cleared once the frame is presented
        self.input.update();
    }

    fn shutdown(&mut self, ctx: &mut EngineContext) {
        if let Some(player) = ctx.world.player() {
            log::info!("Player finished at {}", player.position());
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let level = match env::args().nth(1) {
        Some(path) => LevelConfig::load(&path)?,
        None => LevelConfig::default(),
    };

    let config = EngineConfig::default()
        .with_title("Stealth")
        .with_target_fps(60)
        .with_max_frames(60 * 60);

    let engine = Engine::new(config, level, ScriptedRun::corridor_walk())?;
    let game = engine.run()?;

    match game.outcome {
        Some(Outcome::Caught) => println!("Caught"),
        Some(Outcome::Escaped) => println!("Escaped"),
        None => println!("Time ran out"),
    }
    Ok(())
}
