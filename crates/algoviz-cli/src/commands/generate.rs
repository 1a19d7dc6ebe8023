use std::path::Path;

use anyhow::Result;

use algoviz_core::{generate_checked, step, Algorithm, DisplayConfig, GeneratorInput};

use crate::render::render_step;

pub fn run(
    algorithm: Algorithm,
    input: &GeneratorInput,
    json: bool,
    output: Option<&Path>,
    display: &DisplayConfig,
) -> Result<()> {
    let steps = generate_checked(algorithm, input)?;
    tracing::info!("Generated {} steps for {}", steps.len(), algorithm.display_name());

    if json || output.is_some() {
        let content = step::to_json(&steps)?;
        match output {
            Some(path) => {
                std::fs::write(path, content)?;
                println!("Wrote {} steps to {}", steps.len(), path.display());
            }
            None => println!("{}", content),
        }
        return Ok(());
    }

    println!("{} ({} steps)\n", algorithm.display_name(), steps.len());
    for (index, step) in steps.iter().enumerate() {
        println!("{}", render_step(step, index, steps.len(), display));
    }

    Ok(())
}
