use anyhow::Result;

use algoviz_core::{Algorithm, Mood};

pub fn run() -> Result<()> {
    println!("Algorithms ({}):\n", Algorithm::ALL.len());

    for algorithm in Algorithm::ALL {
        println!("  {:<16} {}", algorithm.slug(), algorithm.display_name());
        println!("    needs: {}", algorithm.requirements());
    }

    println!("\nMoods:\n");
    for mood in Mood::ALL {
        println!("  {:<16} {}x speed", mood.to_string().to_lowercase(), mood.speed());
    }

    println!("\nTo play one, run:");
    println!("  algoviz play -a bubble -v 5,2,4,6,1,3 -m chill");

    Ok(())
}
