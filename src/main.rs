//! Cosmo Runner headless demo
//!
//! Drives the simulation in real time at ~60 Hz with a tiny autopilot on
//! the controls, logging score milestones until the run ends. Useful for
//! watching pacing and balance without a presentation layer.
//!
//! Usage: `cosmo-runner [seed] [tuning.json]`

use std::time::{Duration, Instant};

use cosmo_runner::consts::{GROUND_Y, PLAYER_STAND_HEIGHT};
use cosmo_runner::sim::{GameEvent, ObstacleKind};
use cosmo_runner::{Driver, Tuning};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => match raw.parse() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("seed must be an unsigned integer, got {raw:?}");
                std::process::exit(2);
            }
        },
        None => seed_from_time(),
    };
    let tuning = match args.next() {
        Some(path) => load_tuning(&path),
        None => Tuning::default(),
    };

    let mut driver = Driver::with_tuning(seed, tuning);
    println!("cosmo-runner demo: seed {seed}, autopilot engaged");
    driver.start();

    let origin = Instant::now();
    let final_score = loop {
        autopilot(&mut driver);

        let now_ms = origin.elapsed().as_secs_f64() * 1000.0;
        let events = driver.tick(now_ms).to_vec();
        let mut run_ended = None;
        for event in events {
            match event {
                GameEvent::ScoreChanged(score) => log::info!("score {score}"),
                GameEvent::GameOver { final_score } => run_ended = Some(final_score),
            }
        }
        if let Some(score) = run_ended {
            break score;
        }

        std::thread::sleep(Duration::from_millis(16));
    };

    println!("game over: final score {final_score}");
}

/// Jump over whatever is about to reach the player. Craters are harmless
/// to a grounded run and high flyers pass over a standing player, so only
/// low obstacles trigger a hop.
fn autopilot(driver: &mut Driver) {
    let wants_jump = {
        let snapshot = driver.snapshot();
        let player = snapshot.player;
        let front = player.pos.x + player.size.x;
        snapshot.obstacles.iter().any(|obstacle| {
            let gap = obstacle.pos.x - front;
            let low = obstacle.pos.y + obstacle.size.y > GROUND_Y - PLAYER_STAND_HEIGHT;
            (-10.0..110.0).contains(&gap)
                && low
                && !matches!(obstacle.kind, ObstacleKind::Crater)
        })
    };
    if wants_jump {
        driver.jump_pressed();
    }
}

fn seed_from_time() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn load_tuning(path: &str) -> Tuning {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("failed to read {path}: {err}");
            std::process::exit(2);
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => tuning,
        Err(err) => {
            eprintln!("failed to load tuning from {path}: {err}");
            std::process::exit(2);
        }
    }
}
