use anyhow::Result;
use colored::*;
use yeti_build_core::artifact::Coordinate;
use yeti_build_core::classpath::ClasspathBuilder;
use yeti_build_core::{BuildSession, SessionConfig};

pub fn execute(config: SessionConfig, coordinate: &str, include_transitive: bool) -> Result<()> {
    let coordinate: Coordinate = coordinate.parse()?;
    let session = BuildSession::load(config)
        .map_err(|e| anyhow::anyhow!("Failed to load project: {}", e))?;

    let mut builder = ClasspathBuilder::new(session.repository());
    builder
        .add_artifact(&coordinate, include_transitive)
        .map_err(|e| anyhow::anyhow!("Failed to resolve {}: {}", coordinate, e))?;

    println!("{}", "Dependency Tree:".bold().underline());
    for (depth, node) in builder.dependency_tree(&coordinate) {
        let label = node.to_string();
        if depth == 0 {
            println!("{}", label.blue().bold());
        } else {
            println!("{}{}", "  ".repeat(depth), label);
        }
    }

    let cycles = builder.cycles();
    if !cycles.is_empty() {
        let cycles_description = cycles
            .iter()
            .map(|cycle| {
                let mut path = cycle.clone();
                if let Some(first) = path.first().cloned() {
                    path.push(first);
                }
                path.join(" -> ")
            })
            .collect::<Vec<_>>()
            .join("; ");

        println!(
            "{} {}",
            "Warning:".yellow().bold(),
            format!("Circular dependencies detected: {}", cycles_description).yellow()
        );
    }

    println!();
    println!("{}", "Classpath:".bold().underline());
    for entry in builder.classpath().iter() {
        println!("  {}", entry.display());
    }

    Ok(())
}
