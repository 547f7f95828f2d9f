use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use yeti_build_core::goals::{
    default_lifecycle, AddSourceGoal, CompileGoal, DocGoal, Goal, ReplGoal,
};
use yeti_build_core::settings::SettingsOverrides;
use yeti_build_core::SessionConfig;

mod commands;

/// yeti-build - Compile, document and run Yeti projects
#[derive(Parser)]
#[command(name = "yeti-build")]
#[command(about = "Build tool for Yeti projects")]
#[command(version)]
struct Cli {
    /// Path to the project root (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Local artifact repository (overrides `repository` in yeti.yml)
    #[arg(long, global = true)]
    repository: Option<PathBuf>,

    /// Log the toolchain command line and classpath before each call
    #[arg(long, global = true)]
    display_cmd: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the Yeti source directories with the project
    AddSource,
    /// Compile the main Yeti sources
    Compile,
    /// Compile the test Yeti sources
    TestCompile {
        /// Skip compiling test sources
        #[arg(long)]
        skip_tests: bool,
    },
    /// Generate HTML API documentation
    Doc,
    /// Start the interactive Yeti shell
    Repl {
        /// Initialization script, statements separated by ';;'
        #[arg(long)]
        commands: Option<String>,
    },
    /// Run add-source, compile and test-compile
    Build {
        /// Skip compiling test sources
        #[arg(long)]
        skip_tests: bool,
    },
    /// Resolve an artifact and show its dependency tree and classpath
    Classpath {
        /// Artifact coordinate as group:artifact:version[:classifier]
        coordinate: String,
        /// Only resolve the artifact itself
        #[arg(long)]
        no_transitive: bool,
    },
    /// Check that a dynamic library exports a Yeti toolchain
    Toolchain {
        /// Path to the toolchain library
        path: PathBuf,
    },
    /// Print the JSON schema of yeti.yml
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let mut session_config = SessionConfig {
        project_dir: cli.project,
        repository: cli.repository,
        overrides: SettingsOverrides {
            display_cmd: cli.display_cmd.then_some(true),
            ..SettingsOverrides::default()
        },
    };

    let goals: Vec<Box<dyn Goal>> = match cli.command {
        Commands::AddSource => vec![Box::new(AddSourceGoal)],
        Commands::Compile => vec![Box::new(CompileGoal::main())],
        Commands::TestCompile { skip_tests } => {
            session_config.overrides.skip_tests = skip_tests.then_some(true);
            vec![Box::new(CompileGoal::test())]
        }
        Commands::Doc => vec![Box::new(DocGoal)],
        Commands::Repl { commands } => {
            session_config.overrides.commands = commands;
            vec![Box::new(ReplGoal)]
        }
        Commands::Build { skip_tests } => {
            session_config.overrides.skip_tests = skip_tests.then_some(true);
            default_lifecycle()
        }
        Commands::Classpath {
            coordinate,
            no_transitive,
        } => return commands::classpath::execute(session_config, &coordinate, !no_transitive),
        Commands::Toolchain { path } => return commands::toolchain::execute(&path),
        Commands::Schema => return commands::schema::execute(),
    };

    commands::goal::execute(session_config, &goals)
}
