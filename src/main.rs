//! Brick Breaker headless runner
//!
//! Plays a session with the autopilot, building every frame and logging the
//! host messages the game would post to its webview.
//!
//! Usage: `brick-breaker [settings.json|-] [ticks] [low|medium|high]`

#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TICKS: u64 = 10 * 60 * 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    use brick_breaker::consts::TICKS_PER_SECOND;
    use brick_breaker::renderer;
    use brick_breaker::sim::{GamePhase, GameState, tick};
    use brick_breaker::{Autopilot, Settings};

    env_logger::init();
    log::info!("Brick Breaker (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match Settings::from_args(
        args.first().map(String::as_str),
        args.get(2).map(String::as_str),
    ) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let ticks = match args.get(1).map(|t| t.parse::<u64>()) {
        Some(Ok(ticks)) => ticks,
        Some(Err(e)) => {
            log::error!("Invalid tick count: {}", e);
            return ExitCode::FAILURE;
        }
        None => DEFAULT_TICKS,
    };

    log::info!(
        "Canvas {}x{}, quality {}",
        settings.canvas_width,
        settings.canvas_height,
        settings.quality.as_str()
    );
    match settings.to_json() {
        Ok(json) => log::debug!("Effective settings: {}", json),
        Err(e) => log::warn!("Failed to encode settings: {}", e),
    }

    let mut state = GameState::new(&settings);
    let pilot = Autopilot;
    let mut games = 0u32;
    let mut best_score = 0u64;
    let mut triangles = 0usize;

    for frame_index in 0..ticks {
        let input = pilot.input(&state);
        if state.phase != GamePhase::Playing && input.launch {
            games += 1;
        }
        tick(&mut state, &input);

        let frame = renderer::render(&state, frame_index as f32 / TICKS_PER_SECOND as f32);
        triangles = triangles.max(frame.triangle_count());

        for event in state.drain_events() {
            match event.to_host_message() {
                Ok(message) => log::debug!("host <- {}", message),
                Err(e) => log::warn!("Failed to encode {:?}: {}", event, e),
            }
        }
        best_score = best_score.max(state.score);
    }

    println!(
        "Played {} ticks (seed {}): {} game(s), best score {}, now level {} with {} lives",
        ticks, state.seed, games, best_score, state.level, state.lives
    );
    println!("Peak frame size: {} triangles", triangles);
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly; nothing to run here
}
