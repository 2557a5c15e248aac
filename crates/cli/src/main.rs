use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use graphgeom::api::{
    cluster_hulls, draw_nodes, layout_clusters, remove_module_overlaps, remove_overlaps, HullCfg,
    Node, NodeCfg, OverlapCfg, VoronoiCfg, WeightedSite,
};
use graphgeom::gen::ReplayToken;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

use io::{read_json, write_json, AreaDto, HullDto, NodeDto, SiteDto, VoronoiDto};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Cluster layout geometry runner")]
struct Cmd {
    /// Optional run label; propagated to logs and provenance
    #[arg(long, global = true)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Remove node overlaps; with --areas, fit each module into its rectangle
    Overlap {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        areas: Option<PathBuf>,
        #[arg(long, default_value_t = 0.0)]
        padding: f64,
    },
    /// Smoothed boundary polygon per module
    Hulls {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Minimum interior angle in degrees
        #[arg(long, default_value_t = 90.0)]
        threshold: f64,
    },
    /// Weighted Voronoi regions inside a disk
    Voronoi {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        radius: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Generate a seeded node fixture and run overlap removal on it
    Demo {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 50)]
        nodes: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let tag = cmd.tag;
    match cmd.action {
        Action::Overlap {
            input,
            out,
            areas,
            padding,
        } => overlap(&input, &out, areas.as_deref(), padding, tag),
        Action::Hulls {
            input,
            out,
            threshold,
        } => hulls(&input, &out, threshold, tag),
        Action::Voronoi { input, radius, out } => voronoi(&input, radius, &out, tag),
        Action::Demo { seed, nodes, out } => demo(seed, nodes, &out, tag),
        Action::Report => report(tag),
    }
}

fn read_nodes(path: &Path) -> Result<Vec<Node>> {
    let dtos: Vec<NodeDto> = read_json(path)?;
    Ok(dtos.iter().map(Node::from).collect())
}

fn write_nodes(path: &Path, nodes: &[Node]) -> Result<()> {
    let dtos: Vec<NodeDto> = nodes.iter().map(NodeDto::from).collect();
    write_json(path, &dtos)
}

fn overlap(
    input: &Path,
    out: &Path,
    areas: Option<&Path>,
    padding: f64,
    tag: Option<String>,
) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), padding, tag = ?tag, "overlap");
    let mut nodes = read_nodes(input)?;
    let cfg = OverlapCfg {
        padding,
        ..OverlapCfg::default()
    };
    match areas {
        Some(path) => {
            let dtos: Vec<AreaDto> = read_json(path)?;
            let mut rects = BTreeMap::new();
            for a in &dtos {
                rects.insert(a.module, a.to_rect()?);
            }
            remove_module_overlaps(&mut nodes, &rects, &cfg).context("module overlap removal")?;
        }
        None => remove_overlaps(&mut nodes, None, &cfg).context("overlap removal")?,
    }
    write_nodes(out, &nodes)?;
    let params = json!({
        "command": "overlap",
        "input": input.display().to_string(),
        "areas": areas.map(|p| p.display().to_string()),
        "padding": padding,
        "nodes": nodes.len(),
    });
    write_sidecar(out, Payload::new(params).tagged(tag))?;
    Ok(())
}

fn hulls(input: &Path, out: &Path, threshold: f64, tag: Option<String>) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), threshold, tag = ?tag, "hulls");
    let nodes = read_nodes(input)?;
    let adjusted = cluster_hulls(&nodes, threshold, &HullCfg::default());
    let unconverged = adjusted.values().filter(|a| !a.converged).count();
    if unconverged > 0 {
        tracing::warn!(unconverged, "some hulls kept sharp angles");
    }
    let dtos: Vec<HullDto> = adjusted.iter().map(|(&m, a)| HullDto::new(m, a)).collect();
    write_json(out, &dtos)?;
    let params = json!({
        "command": "hulls",
        "input": input.display().to_string(),
        "threshold_deg": threshold,
        "modules": dtos.len(),
        "unconverged": unconverged,
    });
    write_sidecar(out, Payload::new(params).tagged(tag))?;
    Ok(())
}

fn voronoi(input: &Path, radius: f64, out: &Path, tag: Option<String>) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), radius, tag = ?tag, "voronoi");
    let dtos: Vec<SiteDto> = read_json(input)?;
    let sites: Vec<WeightedSite> = dtos.iter().map(WeightedSite::from).collect();
    let layout = layout_clusters(&sites, radius, &VoronoiCfg::default())
        .context("weighted voronoi layout")?;
    tracing::info!(
        iterations = layout.iterations,
        area_error = layout.area_error,
        converged = layout.converged,
        "voronoi_done"
    );
    let result = VoronoiDto::new(&sites, &layout);
    write_json(out, &result)?;
    let params = json!({
        "command": "voronoi",
        "input": input.display().to_string(),
        "radius": radius,
        "sites": sites.len(),
        "iterations": layout.iterations,
        "area_error": layout.area_error,
    });
    write_sidecar(out, Payload::new(params).tagged(tag))?;
    Ok(())
}

fn demo(seed: u64, count: usize, out: &Path, tag: Option<String>) -> Result<()> {
    tracing::info!(seed, nodes = count, out = %out.display(), tag = ?tag, "demo");
    let cfg = NodeCfg {
        count,
        ..NodeCfg::default()
    };
    let mut nodes = draw_nodes(cfg, ReplayToken::new(seed, 0));
    remove_overlaps(&mut nodes, None, &OverlapCfg::default()).context("overlap removal")?;
    write_nodes(out, &nodes)?;
    let params = json!({
        "command": "demo",
        "seed": seed,
        "nodes": count,
        "modules": cfg.modules,
    });
    write_sidecar(out, Payload::new(params).tagged(tag))?;
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "graphgeom_version": graphgeom::VERSION,
        "tag": tag,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
