use anyhow::Result;
use tokio::task::LocalSet;
use tracing::info;

use algoviz_core::{
    generate_checked, step::ArrayState, AnimationEngine, Algorithm, AppConfig, DisplayConfig,
    GeneratorInput, Mood, PlaybackConfig, PlaybackPhase, Step,
};

use crate::render::render_step;

pub async fn run(
    algorithm: Algorithm,
    input: GeneratorInput,
    config: &AppConfig,
    mood: Option<Mood>,
    speed: Option<f64>,
) -> Result<()> {
    let steps = generate_checked(algorithm, &input)?;

    // Command-line pace beats the config file; a mood beats a raw speed
    let mut playback = config.playback.clone();
    if let Some(mood) = mood {
        playback.mood = Some(mood);
    } else if let Some(speed) = speed {
        playback.mood = None;
        playback.speed = speed;
    }

    // The engine is single-threaded; its tick timer needs a LocalSet
    let local = LocalSet::new();
    local
        .run_until(play_session(
            algorithm,
            steps,
            ArrayState::new(input.values),
            playback,
            config.display.clone(),
        ))
        .await
}

async fn play_session(
    algorithm: Algorithm,
    steps: Vec<Step>,
    initial: ArrayState,
    playback: PlaybackConfig,
    display: DisplayConfig,
) -> Result<()> {
    let engine = AnimationEngine::from_config(steps, initial.into(), &playback);
    let (_subscription, mut snapshots) = engine.subscribe_channel();

    let state = engine.state();
    println!(
        "{}: {} steps at {}x ({} ms per step). Ctrl-C to stop.\n",
        algorithm.display_name(),
        state.total_steps,
        state.speed,
        engine.tick_interval().as_millis()
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_rendered = None;
    engine.play();

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Received interrupt, stopping playback");
                println!("\nStopped.");
                break;
            }

            snapshot = snapshots.recv() => {
                let Some(state) = snapshot else {
                    break;
                };

                if last_rendered != Some(state.current_step) {
                    if let Some(step) = state.current() {
                        println!("{}", render_step(step, state.current_step, state.total_steps, &display));
                    }
                    last_rendered = Some(state.current_step);
                }

                if state.phase() == PlaybackPhase::Finished {
                    break;
                }
            }
        }
    }

    let final_state = engine.state();
    engine.destroy();

    if let Some(step) = final_state.current() {
        println!(
            "Done after {}/{} steps: {} comparisons, {} swaps.",
            final_state.current_step + 1,
            final_state.total_steps,
            step.metrics.comparisons,
            step.metrics.swaps
        );
    }

    Ok(())
}
