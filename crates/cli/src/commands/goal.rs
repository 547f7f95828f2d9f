use anyhow::Result;
use colored::*;
use yeti_build_core::goals::{DocGoal, Goal};
use yeti_build_core::{BuildSession, SessionConfig};

pub fn execute(config: SessionConfig, goals: &[Box<dyn Goal>]) -> Result<()> {
    let mut session = BuildSession::load(config)
        .map_err(|e| anyhow::anyhow!("Failed to load project: {}", e))?;

    println!(
        "{} {}",
        "Building".bold(),
        session.project.name.cyan()
    );

    for goal in goals {
        println!("{} {}", "▶".blue().bold(), goal.name().bold());
        session.run(goal.as_ref())?;

        if goal.name() == "doc" {
            let report = DocGoal::report(&session.settings);
            println!(
                "  {} {} {}",
                report.name.green(),
                "->".dimmed(),
                report.report_output_directory.display()
            );
        }
    }

    println!();
    println!(
        "{} {}",
        "✓".green().bold(),
        "All goals completed successfully!".green().bold()
    );

    Ok(())
}
