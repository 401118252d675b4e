//! Moto Mayhem entry point
//!
//! On the web the page drives `platform::web::WebGame`. Natively this runs a
//! headless autopilot ride so the simulation can be exercised from a shell:
//!
//! ```text
//! moto-mayhem [mode] [seed]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use moto_mayhem::hud::Hud;
    use moto_mayhem::sim::{GameState, LogSink, RunStatus, TickInput, Viewport, tick};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 180;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "standard".to_string());
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Bad seed ({}), using 1", e);
            1
        }
        None => 1,
    };

    let mut state = GameState::new(seed, Viewport::default());
    state.select_mode(&mode);
    state.start_run();

    let mut sink = LogSink;
    let mut frames = 0;
    while state.status == RunStatus::Running && frames < MAX_FRAMES {
        let input: TickInput = autopilot(&state);
        tick(&mut state, &input, FRAME_DT);
        state.dispatch_events(&mut sink);
        frames += 1;
    }

    let hud = Hud::from_snapshot(&state.snapshot());
    println!("mode:      {}", state.mode.as_str());
    println!("status:    {:?} after {:.1}s", state.status, state.elapsed);
    println!("distance:  {} (best {})", hud.distance, hud.best);
    println!("kills:     {}", hud.kills);
    println!("power-ups: {}", hud.powerups);
    if let Some(message) = hud.message {
        println!("{}", message);
    }
}

/// Hold the throttle and trigger, leaning to keep the bike level in the air
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(state: &moto_mayhem::sim::GameState) -> moto_mayhem::sim::TickInput {
    let bike = &state.bike;
    let level = !bike.on_ground && bike.rot.abs() > 0.3;
    moto_mayhem::sim::TickInput {
        up: true,
        fire: true,
        left: level && bike.rot > 0.0,
        right: level && bike.rot < 0.0,
        ..Default::default()
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
