//! Jumpy headless entry point
//!
//! Loads `<maps_dir>/<index>.json`, runs a scripted session with placeholder
//! assets and logs what happened. Usage: `jumpy [maps_dir] [ticks]`.

use std::path::{Path, PathBuf};

use glam::IVec2;

use jumpy::render::RecordingSurface;
use jumpy::sim::{GameEvent, GamePhase, Session, TickInput, tick};
use jumpy::{AssetTable, LevelData, LevelError, LevelProvider, NullAudio, SessionConfig};

/// Levels read from disk on every load
struct MapDir {
    dir: PathBuf,
    count: usize,
}

impl MapDir {
    /// Counts consecutive `0.json`, `1.json`, ... files
    fn open(dir: &Path) -> Self {
        let count = (0..)
            .take_while(|i| dir.join(format!("{i}.json")).is_file())
            .count();
        Self {
            dir: dir.to_path_buf(),
            count,
        }
    }
}

impl LevelProvider for MapDir {
    fn level_count(&self) -> usize {
        self.count
    }

    fn load(&self, index: usize) -> Result<LevelData, LevelError> {
        if index >= self.count {
            return Err(LevelError::MissingLevel(index));
        }
        let json = std::fs::read_to_string(self.dir.join(format!("{index}.json")))?;
        LevelData::from_json(&json)
    }
}

/// Run right, jumping every second and dashing every three
fn scripted_input(t: u32) -> TickInput {
    TickInput {
        movement: 1,
        jump: t % 60 == 0,
        dash: t % 180 == 90,
    }
}

fn run(maps_dir: &Path, ticks: u32) -> Result<(), Box<dyn std::error::Error>> {
    let maps = MapDir::open(maps_dir);
    log::info!("Found {} levels in {}", maps.count, maps_dir.display());

    let config = SessionConfig {
        level_count: maps.count.max(1),
        ..Default::default()
    };
    let mut session = Session::new(config, maps, AssetTable::placeholder()?)?;
    let mut surface = RecordingSurface::new(IVec2::new(640, 360), IVec2::new(16, 16));
    let mut audio = NullAudio;

    for t in 0..ticks {
        tick(&mut session, &scripted_input(t), &mut audio)?;
        for event in session.drain_events() {
            match event {
                GameEvent::EnemyKilled { pos } => log::debug!("tick {t}: enemy killed at {pos}"),
                other => log::info!("tick {t}: {other:?}"),
            }
        }
        if session.phase() == GamePhase::RunComplete {
            break;
        }
    }

    surface.clear();
    session.render(&mut surface);
    log::info!(
        "Stopped after {} ticks ({:?}), {} draw calls in last frame",
        session.time_ticks,
        session.phase(),
        surface.blits.len()
    );
    for line in session.hud().lines() {
        println!("{line}");
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Jumpy (headless) starting...");

    let mut args = std::env::args().skip(1);
    let maps_dir = PathBuf::from(args.next().unwrap_or_else(|| "data/maps".to_string()));
    let ticks = match args.next().map(|s| s.parse::<u32>()) {
        None => 3600,
        Some(Ok(ticks)) => ticks,
        Some(Err(e)) => {
            log::error!("Invalid tick count: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&maps_dir, ticks) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
