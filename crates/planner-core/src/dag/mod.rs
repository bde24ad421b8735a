//! The point-location search DAG: X-nodes (point decisions), Y-nodes
//! (segment decisions), and leaves (a trapezoid index or "failure").
//!
//! References
//! - TH: `original_source/src/point_location.py` (`Query`, `PointQuery`,
//!   `SegmentQuery`, `PointLocator`).

use crate::error::BuildError;
use crate::geom::point::{interp, Point, Segment};

pub type NodeId = usize;

/// What a node's child slot currently points at. `Empty` is only a valid
/// state mid-patch, while a split's children are being assembled; by the
/// time a build step finishes every reachable slot is `Trapezoid` or
/// `Failure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildSlot {
    Empty,
    Trapezoid(usize),
    Failure,
    Node(NodeId),
}

/// A node's identity and child slots, flattened for diagnostic consumers
/// that don't need the full `Node` (e.g. the CLI's diagnostic JSON).
#[derive(Debug, Clone, Copy)]
pub struct DagEdgeDescriptor {
    pub node: NodeId,
    pub kind: &'static str,
    pub true_child: ChildSlot,
    pub false_child: ChildSlot,
}

#[derive(Debug, Clone)]
pub enum Node {
    /// "does the query point satisfy `p.x <= x`?"
    X {
        x: f64,
        true_child: ChildSlot,
        false_child: ChildSlot,
    },
    /// "is `p.y` above `segment` at `x = p.x`?" (true = above)
    Y {
        segment: Segment,
        true_child: ChildSlot,
        false_child: ChildSlot,
    },
}

/// Owning arena of DAG nodes. Nodes are never reclaimed during a build —
/// only leaf pointers are rewritten as trapezoids split and merge.
#[derive(Debug, Clone)]
pub struct Dag {
    nodes: Vec<Node>,
    pub root: NodeId,
}

impl Dag {
    /// Seed the DAG with its root: an X-node at the bounds' left edge whose
    /// true-child (at or left of the boundary) is `Failure` and whose
    /// false-child is the single initial trapezoid.
    pub fn new(bounds_left_x: f64, start_trap_idx: usize) -> Self {
        let root_node = Node::X {
            x: bounds_left_x,
            true_child: ChildSlot::Failure,
            false_child: ChildSlot::Trapezoid(start_trap_idx),
        };
        Dag {
            nodes: vec![root_node],
            root: 0,
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn push_x(&mut self, x: f64, true_child: ChildSlot, false_child: ChildSlot) -> NodeId {
        self.nodes.push(Node::X { x, true_child, false_child });
        self.nodes.len() - 1
    }

    pub fn push_y(&mut self, segment: Segment, true_child: ChildSlot, false_child: ChildSlot) -> NodeId {
        self.nodes.push(Node::Y {
            segment,
            true_child,
            false_child,
        });
        self.nodes.len() - 1
    }

    /// Fill whichever child slot of `node` is currently `Empty`. Errors if
    /// neither slot is empty — a sign of a corrupted patch.
    pub fn set_value(&mut self, node: NodeId, child: ChildSlot) -> Result<(), BuildError> {
        let (true_child, false_child) = match &mut self.nodes[node] {
            Node::X { true_child, false_child, .. } => (true_child, false_child),
            Node::Y { true_child, false_child, .. } => (true_child, false_child),
        };
        if *true_child == ChildSlot::Empty {
            *true_child = child;
        } else if *false_child == ChildSlot::Empty {
            *false_child = child;
        } else {
            return Err(BuildError::Internal(format!("node {node} has no empty child slot")));
        }
        Ok(())
    }

    /// Detach trapezoid `trap_idx` from `parent`'s child slot, leaving it
    /// `Empty` for a later `set_value`. Errors if `parent` doesn't actually
    /// point at `trap_idx`.
    pub fn detach_leaf(&mut self, parent: NodeId, trap_idx: usize) -> Result<(), BuildError> {
        let (true_child, false_child) = match &mut self.nodes[parent] {
            Node::X { true_child, false_child, .. } => (true_child, false_child),
            Node::Y { true_child, false_child, .. } => (true_child, false_child),
        };
        if *true_child == ChildSlot::Trapezoid(trap_idx) {
            *true_child = ChildSlot::Empty;
        } else if *false_child == ChildSlot::Trapezoid(trap_idx) {
            *false_child = ChildSlot::Empty;
        } else {
            return Err(BuildError::Internal(format!(
                "parent {parent} does not have child {trap_idx}"
            )));
        }
        Ok(())
    }

    /// Flat view of every node for diagnostic read-outs (visualization,
    /// the CLI's `build` diagnostic JSON). Node identity and slot values
    /// only; no client should need more to draw the DAG.
    pub fn edge_descriptors(&self) -> Vec<DagEdgeDescriptor> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| match n {
                Node::X { true_child, false_child, .. } => DagEdgeDescriptor {
                    node: i,
                    kind: "x",
                    true_child: *true_child,
                    false_child: *false_child,
                },
                Node::Y { true_child, false_child, .. } => DagEdgeDescriptor {
                    node: i,
                    kind: "y",
                    true_child: *true_child,
                    false_child: *false_child,
                },
            })
            .collect()
    }

    /// Walk from the root to a leaf for `p`. Returns `ChildSlot::Trapezoid`
    /// or `ChildSlot::Failure`; never `Empty` or `Node` for a well-formed
    /// DAG.
    pub fn query(&self, p: Point, eps: f64) -> ChildSlot {
        let mut current = ChildSlot::Node(self.root);
        loop {
            let id = match current {
                ChildSlot::Node(id) => id,
                leaf => return leaf,
            };
            current = match &self.nodes[id] {
                Node::X { x, true_child, false_child } => {
                    if p.x <= *x {
                        *true_child
                    } else {
                        *false_child
                    }
                }
                Node::Y { segment, true_child, false_child } => {
                    let y = interp(segment.left, segment.right, p.x, eps);
                    if p.y > y {
                        *true_child
                    } else {
                        *false_child
                    }
                }
            };
        }
    }
}
