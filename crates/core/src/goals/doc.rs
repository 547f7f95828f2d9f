use std::time::Instant;

use tracing::{debug, info, warn};
use yeti_toolchain_protocol::{DocRequest, Invocation};

use crate::classpath::ClasspathBuilder;
use crate::file_matcher::{match_sources, SourceFilter};
use crate::goals::{directory_argument, invoke_toolchain, Goal};
use crate::session::BuildSession;
use crate::settings::YetiSettings;
use crate::source_locator::locate_source_roots;
use crate::types::{YetiError, YetiResult};

pub const REPORT_CATEGORY: &str = "Project Reports";

/// How the generated documentation is presented as a project report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocReport {
    pub title: String,
    pub name: String,
    pub description: String,
    pub category: &'static str,
    /// Report page relative to the reporting output directory, without extension
    pub output_name: String,
    pub report_output_directory: std::path::PathBuf,
}

/// Generates HTML API documentation for the Yeti sources of the project
pub struct DocGoal;

impl DocGoal {
    pub fn report(settings: &YetiSettings) -> DocReport {
        DocReport {
            title: settings.doc.title.clone(),
            name: settings.doc.name.clone(),
            description: settings.doc.description.clone(),
            category: REPORT_CATEGORY,
            output_name: format!("{}/index", settings.doc.output_directory),
            report_output_directory: settings.doc.report_output_directory.clone(),
        }
    }
}

impl Goal for DocGoal {
    fn name(&self) -> &'static str {
        "doc"
    }

    fn execute(&self, session: &mut BuildSession) -> YetiResult<()> {
        let started = Instant::now();
        let settings = &session.settings;
        let project = &session.project;

        let version = settings.version.as_deref().ok_or_else(|| {
            YetiError::Configuration(
                "Generating documentation requires the toolchain version (yeti.version)"
                    .to_string(),
            )
        })?;

        let source_roots =
            locate_source_roots(&settings.source_dir, project.compile_source_roots());
        let filter = SourceFilter::new(settings.includes.clone(), settings.excludes.clone());
        let source_files: Vec<String> = match_sources(&source_roots, &filter)?
            .into_iter()
            .map(|file| file.relative)
            .collect();

        if source_files.is_empty() {
            warn!("No source files found");
            return Ok(());
        }

        let mut builder = ClasspathBuilder::new(session.repository());
        for component in [
            &settings.artifacts.compiler,
            &settings.artifacts.loader,
            &settings.artifacts.doc_generator,
        ] {
            builder.add_artifact(&component.at(version), true)?;
        }
        let mut classpath = builder.into_classpath();
        classpath.union(project.compile_classpath());

        let report_dir = &settings.doc.report_output_directory;
        std::fs::create_dir_all(report_dir)?;

        for root in &source_roots {
            debug!("{}", root.display());
        }

        let prepared = Instant::now();
        info!(
            "Generating documentation for {} source files to {}",
            source_files.len(),
            report_dir.display()
        );

        let request = DocRequest {
            classpath: project.compile_classpath().to_strings(),
            source_roots: source_roots
                .iter()
                .map(|root| root.display().to_string())
                .collect(),
            verbose: settings.display_cmd,
            source_files,
            output_dir: directory_argument(report_dir),
        };
        invoke_toolchain(session, classpath, &Invocation::HtmlDoc(request))?;

        info!(
            "prepare-compile in {} s",
            prepared.duration_since(started).as_secs()
        );
        info!("compile in {} s", prepared.elapsed().as_secs());
        Ok(())
    }
}
