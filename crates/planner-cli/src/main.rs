use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use planner_core::dag::ChildSlot;
use planner_core::geom::point::Point;
use planner_core::geom::polygon::Polygon;
use planner_core::{Planner, Rect};
use serde::Deserialize;
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

#[derive(Parser)]
#[command(name = "planner-cli")]
#[command(about = "Scripted runner for the motion-planning geometry core")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build the trapezoidal map and DAG for a scenario, writing a diagnostic JSON.
    Build {
        #[arg(long)]
        scenario: String,
        #[arg(long)]
        out: String,
    },
    /// Build a scenario, then plan a path between two points.
    Plan {
        #[arg(long)]
        scenario: String,
        #[arg(long, value_parser = parse_point)]
        start: Point,
        #[arg(long, value_parser = parse_point)]
        goal: Point,
    },
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw.split_once(',').ok_or_else(|| format!("expected \"x,y\", got {raw:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("{e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("{e}"))?;
    Ok(Point::new(x, y))
}

#[derive(Deserialize)]
struct Scenario {
    bounds: ScenarioRect,
    seed: u64,
    #[serde(default)]
    vehicle: Vec<(f64, f64)>,
    #[serde(default)]
    obstacles: Vec<Vec<(f64, f64)>>,
}

#[derive(Deserialize)]
struct ScenarioRect {
    min: (f64, f64),
    max: (f64, f64),
}

fn load_scenario(path: &str) -> Result<(Planner, Scenario)> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading scenario {path}"))?;
    let scenario: Scenario = serde_json::from_str(&raw).with_context(|| format!("parsing scenario {path}"))?;

    let bounds = Rect::from_corners(scenario.bounds.min.0, scenario.bounds.min.1, scenario.bounds.max.0, scenario.bounds.max.1);
    let mut planner = Planner::new(bounds, scenario.seed);

    let obstacles: Vec<Polygon> = scenario
        .obstacles
        .iter()
        .map(|verts| Polygon::new(verts.iter().map(|&(x, y)| Point::new(x, y)).collect()))
        .collect();
    planner.set_obstacles(&obstacles);

    if !scenario.vehicle.is_empty() {
        let vehicle = Polygon::new(scenario.vehicle.iter().map(|&(x, y)| Point::new(x, y)).collect());
        planner.set_vehicle(&vehicle);
    }

    Ok((planner, scenario))
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Build { scenario, out } => build(scenario, out),
        Action::Plan { scenario, start, goal } => plan(scenario, start, goal),
    }
}

fn build(scenario_path: String, out: String) -> Result<()> {
    let (mut planner, scenario) = load_scenario(&scenario_path)?;
    tracing::info!(scenario = scenario_path, obstacles = scenario.obstacles.len(), "build");
    planner.build()?;

    let trapezoids: Vec<Vec<(f64, f64)>> = planner
        .trapezoid_polygons()
        .iter()
        .map(|p| p.vertices.iter().map(|v| (v.x, v.y)).collect())
        .collect();

    let dag_edges: Vec<_> = planner
        .dag_edges()
        .into_iter()
        .map(|d| {
            json!({
                "node": d.node,
                "kind": d.kind,
                "true_child": child_slot_json(d.true_child),
                "false_child": child_slot_json(d.false_child),
            })
        })
        .collect();

    let doc = json!({
        "trapezoid_count": planner.trapezoid_count(),
        "trapezoids": trapezoids,
        "dag_edges": dag_edges,
    });

    let out_path = Path::new(&out);
    write_with_dirs(out_path, &serde_json::to_vec_pretty(&doc)?)?;
    provenance::write_sidecar(
        out_path,
        provenance::Payload::new(json!({
            "scenario": scenario_path,
            "seed": scenario.seed,
        })),
    )?;
    Ok(())
}

fn plan(scenario_path: String, start: Point, goal: Point) -> Result<()> {
    let (mut planner, _scenario) = load_scenario(&scenario_path)?;
    planner.build()?;

    match planner.plan(start, goal) {
        Ok(path) => {
            let waypoints: Vec<(f64, f64)> = path.iter().map(|p| (p.x, p.y)).collect();
            println!("{}", serde_json::to_string_pretty(&json!({ "path": waypoints }))?);
            Ok(())
        }
        Err(err) => bail!("{err}"),
    }
}

fn child_slot_json(slot: ChildSlot) -> serde_json::Value {
    match slot {
        ChildSlot::Empty => json!({ "kind": "empty" }),
        ChildSlot::Failure => json!({ "kind": "failure" }),
        ChildSlot::Trapezoid(idx) => json!({ "kind": "trapezoid", "index": idx }),
        ChildSlot::Node(id) => json!({ "kind": "node", "id": id }),
    }
}

fn write_with_dirs(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {}", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
