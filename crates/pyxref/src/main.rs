//! The `pyxref` binary: wires the bundled `Oracle`, `FileProvider`,
//! `PackageDiscovery` and `DocExtractor` implementations into
//! `pyxref_core::Orchestrator`, driven by `clap`-parsed arguments layered
//! over an optional `pyxref.toml`.

mod cli;
mod config;
mod provider;
mod revision;
mod sink;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use rayon::prelude::*;

use pyxref_core::model::PackageInfo;
use pyxref_core::orchestrator::{FileProvider, Orchestrator, OrchestratorConfig};
use pyxref_core::package::{NoThirdPartyPackages, PackageDiscovery};
use pyxref_doc::TreeSitterDocExtractor;
use pyxref_oracle::{SyntacticOracle, TreeSitterFileProvider, TreeStore};
use pyxref_package::InstalledPackageDiscovery;

use cli::{Cli, Command, IndexArgs};
use provider::ExcludingFileProvider;
use sink::JsonLinesSink;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Command::Index(args) = cli.command;

    init_logging(args.verbose, args.quiet);

    match run_index(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else {
        match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new().filter_level(level).format_timestamp(None).init();
}

/// Resolves the third-party package discovery implementation. One concrete
/// enum rather than a trait object: `Orchestrator` is generic over its
/// `PackageDiscovery`, and a fixed set of two bundled choices doesn't need
/// dynamic dispatch to pick between them.
enum Discovery {
    Installed(InstalledPackageDiscovery),
    None(NoThirdPartyPackages),
}

impl PackageDiscovery for Discovery {
    fn package_for(&self, module_name: &str) -> Option<PackageInfo> {
        match self {
            Discovery::Installed(discovery) => discovery.package_for(module_name),
            Discovery::None(discovery) => discovery.package_for(module_name),
        }
    }
}

fn run_index(args: IndexArgs) -> anyhow::Result<()> {
    let project_root = args
        .project_root
        .canonicalize()
        .unwrap_or_else(|_| args.project_root.clone());

    let config = config::Config::load(&project_root)?;

    let project_name = args
        .project_name
        .or(config.project_name)
        .or_else(|| project_root.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".to_string());

    let project_version = args
        .project_version
        .or(config.project_version)
        .unwrap_or_else(|| revision::default_project_version(&project_root));

    let workspace_root = args.workspace_root.unwrap_or_else(|| project_root.clone());
    let site_packages = args.site_packages.or(config.site_packages);
    let stdlib_root = args.stdlib_root.or(config.stdlib_root);
    let exclude = config.exclude;

    let store = TreeStore::new();
    let oracle = SyntacticOracle::new(store.clone(), project_root.clone());
    let files = ExcludingFileProvider::new(
        TreeSitterFileProvider::new(store.clone(), project_root.clone()),
        &exclude,
    );
    let discovery = match &site_packages {
        Some(path) => Discovery::Installed(InstalledPackageDiscovery::scan(path)),
        None => Discovery::None(NoThirdPartyPackages),
    };
    let docs = TreeSitterDocExtractor::new(store.clone());

    log_source_size(&files, &project_root)?;

    let orchestrator_config = OrchestratorConfig {
        project_root: project_root.clone(),
        project_name,
        project_version,
        workspace_root,
    };

    let sink = build_sink(args.output.as_deref())?;

    let orchestrator = Orchestrator::new(
        orchestrator_config,
        oracle,
        files,
        discovery,
        docs,
        sink,
        stdlib_root,
        args.python_version,
    );

    orchestrator.run(|| false)?;
    Ok(())
}

/// Logs the total line count across discovered files before the (necessarily
/// single-threaded) walk starts. `TreeStore` is `Rc`+`RefCell`-backed and
/// never crosses a thread boundary, but raw file reads are independent of it,
/// so this is the one place in the pipeline where `rayon` earns its keep.
fn log_source_size(files: &impl FileProvider, project_root: &Path) -> anyhow::Result<()> {
    let paths = files.discover_python_files(project_root)?;
    let total_lines: usize = paths
        .par_iter()
        .map(|path: &PathBuf| std::fs::read_to_string(path).map(|text| text.lines().count()).unwrap_or(0))
        .sum();
    log::info!("discovered {} Python file(s), {total_lines} source line(s)", paths.len());
    Ok(())
}

enum OutputSink {
    Stdout(JsonLinesSink<std::io::Stdout>),
    File(JsonLinesSink<BufWriter<File>>),
}

impl pyxref_core::sink::DocumentSink for OutputSink {
    fn write_metadata(&mut self, metadata: pyxref_core::model::Metadata) -> pyxref_core::error::Result<()> {
        match self {
            OutputSink::Stdout(sink) => sink.write_metadata(metadata),
            OutputSink::File(sink) => sink.write_metadata(metadata),
        }
    }

    fn write_document(&mut self, document: pyxref_core::model::Document) -> pyxref_core::error::Result<()> {
        match self {
            OutputSink::Stdout(sink) => sink.write_document(document),
            OutputSink::File(sink) => sink.write_document(document),
        }
    }
}

fn build_sink(output: Option<&Path>) -> anyhow::Result<OutputSink> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|err| anyhow::anyhow!("failed to create {}: {err}", path.display()))?;
            Ok(OutputSink::File(JsonLinesSink::new(BufWriter::new(file))))
        }
        None => Ok(OutputSink::Stdout(JsonLinesSink::new(std::io::stdout()))),
    }
}

