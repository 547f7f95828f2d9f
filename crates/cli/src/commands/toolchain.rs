use std::path::Path;

use anyhow::Result;
use colored::*;
use yeti_build_core::platform::PlatformInfo;
use yeti_build_core::toolchain::DylibToolchain;
use yeti_toolchain_protocol::Toolchain;

pub fn execute(path: &Path) -> Result<()> {
    println!("{} {}", "Checking toolchain".bold(), path.display());

    if !path.exists() {
        anyhow::bail!("Toolchain library does not exist: {}", path.display());
    }

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let expected = PlatformInfo::current_extension();
    if extension != expected {
        println!(
            "{} {}",
            "Warning:".yellow().bold(),
            format!(
                "File extension '{}' doesn't match the platform extension '{}'",
                extension, expected
            )
            .yellow()
        );
    }

    let toolchain = DylibToolchain::from_dylib(path)?.ok_or_else(|| {
        anyhow::anyhow!(
            "{} does not export the toolchain entry point (export it with export_toolchain!)",
            path.display()
        )
    })?;

    println!(
        "{} {} {}",
        "✓".green().bold(),
        "Found toolchain".green(),
        toolchain.name().cyan().bold()
    );
    if let Some(platform) = PlatformInfo::current() {
        println!(
            "  {} {}-{{VERSION}}-{}.{}",
            "publish as".dimmed(),
            toolchain.name(),
            platform.target,
            platform.extension
        );
    }

    Ok(())
}
