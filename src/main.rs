use folio_motion::anim::region::{scroll_target, Region};
use folio_motion::anim::reveal::{RandomGlyphs, RevealScheduler};
use folio_motion::anim::scene::{Scene, SceneLayout};
use folio_motion::anim::signal::ScrollSample;
use folio_motion::anim::typewriter::{Stage, Typewriter};
use folio_motion::config::MotionConfig;
use folio_motion::utils::clock::{Clock, ManualClock};
use folio_motion::utils::layout::Bounds;
use log::{error, info, LevelFilter};
use serde::Serialize;
use std::error::Error;
use std::path::Path;

// Simulated page
const VIEWPORT_HEIGHT: f32 = 900.0;
const SCROLL_STEP_PX: f32 = 150.0;
const FRAME_MS: u64 = 16;
const SPLASH_WORD: &str = "folio.";
const TAGLINE: &str = "I build things for the web.";
const PROJECT_CARDS: usize = 4;
const EXPERIENCE_TABS: usize = 3;

#[derive(Serialize)]
struct Line<'a, T: Serialize> {
    kind: &'a str,
    t: u64,
    state: T,
}

fn emit<T: Serialize>(kind: &str, t: u64, state: T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string(&Line { kind, t, state })?);
    Ok(())
}

fn page() -> (Vec<Region>, SceneLayout) {
    let sections = [
        ("home", "", 0.0, 900.0),
        ("about", "About", 900.0, 1200.0),
        ("experience", "Experience", 2100.0, 1200.0),
        ("projects", "Projects", 3300.0, 1200.0),
        ("contact", "Contact", 4500.0, 900.0),
    ];
    let regions = sections
        .iter()
        .enumerate()
        .map(|(i, (id, name, _, _))| Region::new(*id, *name, i as u32))
        .collect();
    let bounds: Vec<Bounds> = sections.iter().map(|(_, _, top, h)| Bounds::new(*top, *h)).collect();
    let layout = SceneLayout {
        deck: Some(bounds[3]),
        tabs: Some(bounds[2]),
        regions: bounds,
    };
    (regions, layout)
}

fn run(cfg: &MotionConfig) -> Result<(), Box<dyn Error>> {
    let clock = ManualClock::new(0);

    // --- Splash ---
    let tw = Typewriter::new(SPLASH_WORD, cfg.splash);
    loop {
        let t = clock.now_ms();
        let frame = tw.frame(t);
        emit("splash", t, (tw.text_at(t), frame))?;
        if frame.stage == Stage::Finished {
            break;
        }
        clock.advance(cfg.splash.type_interval_ms.max(FRAME_MS));
    }
    info!("Splash finished at {}ms.", tw.finished_at());

    // --- Hero tagline ---
    let mut reveal = RevealScheduler::new(RandomGlyphs::from_os(&cfg.reveal.alphabet), cfg.reveal.scramble_period_ms);
    reveal.schedule(TAGLINE, cfg.reveal.base_delay_ms, cfg.reveal.unit_interval_ms, clock.now_ms());
    while reveal.task().is_some_and(|task| !task.is_complete()) {
        let t = clock.advance(FRAME_MS);
        if reveal.advance(t) > 0 {
            if let Some(task) = reveal.task() {
                emit("reveal", t, task.display())?;
            }
        }
    }
    info!("Tagline revealed; {} timers left.", reveal.pending_timers());
    reveal.cancel();

    // --- Scroll session: down to the footer, then back up ---
    let (regions, layout) = page();
    for (r, b) in regions.iter().zip(&layout.regions) {
        info!("nav '{}' scrolls to {:.0}px", r.id, scroll_target(b.top, cfg.nav_header_offset));
    }
    let max_offset = layout.regions.last().map_or(0.0, |b| b.bottom() - VIEWPORT_HEIGHT);

    let mut scene = Scene::new(cfg, regions, PROJECT_CARDS, EXPERIENCE_TABS)?;
    scene.relayout(layout, VIEWPORT_HEIGHT);

    let steps = (max_offset / SCROLL_STEP_PX).ceil() as usize;
    let down = (0..=steps).map(|i| (i as f32 * SCROLL_STEP_PX).min(max_offset));
    let up = (0..=steps).rev().map(|i| (i as f32 * SCROLL_STEP_PX).min(max_offset));
    for offset in down.chain(up) {
        let t = clock.advance(FRAME_MS);
        let frame = scene.pump(&ScrollSample::new(offset, VIEWPORT_HEIGHT));
        emit("scroll", t, frame)?;
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // --- Logging Setup ---
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .filter_module("folio_motion::anim::scene", LevelFilter::Info)
        .filter_module("folio_motion::anim::reveal", LevelFilter::Info)
        .filter_module("folio_motion::anim::region", LevelFilter::Debug)
        .init();

    info!("Motion preview starting...");

    // --- Config ---
    let cfg = match std::env::args().nth(1) {
        Some(path) => MotionConfig::load_or_default(Path::new(&path)),
        None => MotionConfig::default(),
    };

    if let Err(e) = run(&cfg) {
        error!("Preview failed: {}", e);
        return Err(e);
    }

    info!("Preview finished.");
    Ok(())
}
