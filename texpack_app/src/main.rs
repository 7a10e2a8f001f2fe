//! Demo CLI for the materializer library.
//!
//! Drives the full import flow against the in-memory host: classify a
//! source, list its resolutions, extract a chosen resolution, and build
//! the PBR material graph (or an environment world with `--world`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};

use materializer::graph::MemoryHost;
use materializer::prelude::*;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let matches = Command::new("texpack")
        .about("Classifies a texture pack and builds a PBR material graph")
        .arg(
            Arg::new("source")
                .value_name("PATH")
                .help("Source to import: a zip archive, a directory, or an image file")
                .required(true),
        )
        .arg(
            Arg::new("resolution")
                .short('r')
                .long("resolution")
                .value_name("TAG")
                .help("Resolution to materialize, e.g. '2' or '2k' (defaults to the smallest available)"),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .help("Directory extracted textures are placed in (defaults to the configured textures dir)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Import configuration TOML file"),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .action(ArgAction::SetTrue)
                .help("Only list available resolutions and diagnostics"),
        )
        .arg(
            Arg::new("world")
                .long("world")
                .action(ArgAction::SetTrue)
                .help("Treat the source as an environment image and build a world graph"),
        )
        .get_matches();

    let source = PathBuf::from(matches.get_one::<String>("source").unwrap());

    let config = match matches.get_one::<String>("config") {
        Some(path) => ImportConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => ImportConfig::default(),
    };

    if matches.get_flag("world") {
        return build_world(&source);
    }

    if !MaterialFactory::can_import(&source, &config) {
        bail!("unsupported source: {}", source.display());
    }

    let session = MaterialFactory::classify(&source, &config)
        .with_context(|| format!("failed to classify {}", source.display()))?;

    print_diagnostics(session.diagnostics());

    let resolutions = session.resolutions();
    if resolutions.is_empty() {
        println!("no maps found in {}", source.display());
        return Ok(());
    }

    println!("available resolutions:");
    for resolution in &resolutions {
        let maps: Vec<String> = session
            .texture_set()
            .maps_for(*resolution)
            .map(|maps| maps.keys().map(ToString::to_string).collect())
            .unwrap_or_default();
        println!(
            "  {} ({}): {}",
            resolution.label(),
            resolution.description(),
            maps.join(", ")
        );
    }

    if matches.get_flag("list") {
        return Ok(());
    }

    let resolution = match matches.get_one::<String>("resolution") {
        Some(tag) => Resolution::from_tag(tag)
            .with_context(|| format!("unknown resolution tag '{tag}'"))?,
        None => resolutions[0],
    };
    if !resolutions.contains(&resolution) {
        bail!("resolution {} not present in source", resolution.label());
    }

    let out_dir = matches
        .get_one::<String>("out-dir")
        .map_or_else(|| PathBuf::from(&config.textures_dir), PathBuf::from);

    let maps = session
        .materialize(resolution, &out_dir)
        .context("extraction failed")?;
    print_diagnostics(maps.diagnostics());

    println!("materialized {} map(s) into {}:", maps.paths().len(), out_dir.display());
    for (map_type, path) in maps.paths() {
        println!("  {map_type}: {}", path.display());
    }

    let name = material_name(&source);
    let mut host = MemoryHost::new();
    let diagnostics = MaterialFactory::create_material(&mut host, &name, &maps)
        .with_context(|| format!("failed to build material '{name}'"))?;
    print_diagnostics(&diagnostics);

    print_graph(&host);
    Ok(())
}

fn build_world(source: &Path) -> Result<()> {
    let mut host = MemoryHost::new();
    host.set_graph_name(&material_name(source));

    let diagnostics = WorldFactory::load_environment_image(&mut host, source)
        .context("failed to build world")?;
    print_diagnostics(&diagnostics);

    print_graph(&host);
    Ok(())
}

/// Material name from the source file's base name.
fn material_name(source: &Path) -> String {
    source
        .file_stem()
        .map_or_else(|| "material".to_string(), |stem| stem.to_string_lossy().into_owned())
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        println!("warning: {diagnostic}");
    }
}

fn print_graph(host: &MemoryHost) {
    println!(
        "graph '{}': {} nodes, {} links",
        host.name(),
        host.node_count(),
        host.link_count()
    );
    for line in host.topology() {
        println!("  {line}");
    }
}
