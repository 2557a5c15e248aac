//! JSON schemas for CLI inputs and outputs, plus conversions to library types.

use anyhow::{Context, Result};
use graphgeom::api::{HullAdjustment, Node, Rect, VoronoiLayout, WeightedSite};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NodeDto {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    #[serde(default)]
    pub fixed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<i32>,
}

impl From<&NodeDto> for Node {
    fn from(d: &NodeDto) -> Self {
        let mut n = Node::new(d.id.clone(), d.x, d.y, d.size);
        n.fixed = d.fixed;
        n.module = d.module;
        n
    }
}

impl From<&Node> for NodeDto {
    fn from(n: &Node) -> Self {
        Self {
            id: n.id.clone(),
            x: n.position.x,
            y: n.position.y,
            size: n.size,
            fixed: n.fixed,
            module: n.module,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AreaDto {
    pub module: i32,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AreaDto {
    pub fn to_rect(&self) -> Result<Rect> {
        Rect::new(self.x_min, self.x_max, self.y_min, self.y_max)
            .with_context(|| format!("area of module {}", self.module))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteDto {
    pub id: i32,
    pub weight: f64,
    pub x: f64,
    pub y: f64,
}

impl From<&SiteDto> for WeightedSite {
    fn from(d: &SiteDto) -> Self {
        WeightedSite::new(d.id, d.weight, d.x, d.y)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HullDto {
    pub module: i32,
    pub points: Vec<[f64; 2]>,
    pub converged: bool,
    pub insertions: usize,
}

impl HullDto {
    pub fn new(module: i32, adj: &HullAdjustment) -> Self {
        Self {
            module,
            points: adj.hull.iter().map(|p| [p.x, p.y]).collect(),
            converged: adj.converged,
            insertions: adj.insertions,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CellDto {
    pub id: i32,
    /// Caller's weight, as read from the input.
    pub weight: f64,
    /// Relaxed power weight of the cell.
    pub power_weight: f64,
    pub x: f64,
    pub y: f64,
    pub area: f64,
    /// Empty for a site whose cell vanished.
    pub polygon: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoronoiDto {
    pub iterations: usize,
    pub area_error: f64,
    pub converged: bool,
    pub cells: Vec<CellDto>,
}

impl VoronoiDto {
    /// `input` are the sites the layout was computed from, in the same order.
    pub fn new(input: &[WeightedSite], l: &VoronoiLayout) -> Self {
        let cells = l
            .sites
            .iter()
            .zip(input)
            .zip(&l.cells)
            .enumerate()
            .map(|(i, ((s, orig), cell))| CellDto {
                id: s.id,
                weight: orig.weight,
                power_weight: s.weight,
                x: s.position.x,
                y: s.position.y,
                area: l.cell_area(i),
                polygon: cell
                    .as_ref()
                    .map(|c| c.vertices().iter().map(|p| [p.x, p.y]).collect())
                    .unwrap_or_default(),
            })
            .collect();
        Self {
            iterations: l.iterations,
            area_error: l.area_error,
            converged: l.converged,
            cells,
        }
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}
