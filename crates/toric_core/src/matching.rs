//! Minimum-weight perfect matching solvers.
//!
//! The decoder only needs a pairing of graph vertices that covers every vertex
//! once at minimum total weight. How that pairing is found is left to an
//! implementation of [`MatchingSolver`]; [`BlossomSolver`] provides one on top
//! of the fusion-blossom primal-dual solver.

use crate::QecError;
use crate::graph::MatchingGraph;
use fusion_blossom::mwpm_solver::{PrimalDualSolver, SolverSerial};
use fusion_blossom::util::{SolverInitializer, SyndromePattern, VertexIndex, Weight};
use log::trace;

/// A solver for minimum-weight perfect matching on a weighted graph.
///
/// Implementations return vertex-index pairs covering every vertex of the graph
/// exactly once with minimal summed edge weight. Ties between equally light
/// matchings may be broken arbitrarily. A graph with no vertices yields an
/// empty matching; a graph for which no perfect matching exists is an error.
pub trait MatchingSolver {
    /// Pairs every vertex of `graph` at minimum total edge weight.
    fn minimum_weight_perfect_matching(
        &mut self,
        graph: &MatchingGraph,
    ) -> Result<Vec<(usize, usize)>, QecError>;
}

/// Matching solver backed by the fusion-blossom serial solver.
///
/// Every vertex of the input graph is loaded as a defect and the solver
/// returns a minimum-weight edge subgraph in which every vertex has odd
/// degree. That subgraph is then split into vertex pairs along its spanning
/// forest. On a metric graph, such as the toroidal distance graph, the direct
/// edge between a pair is never heavier than the path connecting it, so the
/// resulting pairing is itself minimum weight.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlossomSolver;

impl BlossomSolver {
    /// Creates a solver; all solver state is rebuilt on every call.
    pub fn new() -> Self {
        Self
    }
}

impl MatchingSolver for BlossomSolver {
    fn minimum_weight_perfect_matching(
        &mut self,
        graph: &MatchingGraph,
    ) -> Result<Vec<(usize, usize)>, QecError> {
        let num_nodes = graph.num_nodes();
        if num_nodes == 0 {
            return Ok(Vec::new());
        }
        if num_nodes % 2 == 1 {
            return Err(QecError::MatchingSolverFailure(format!(
                "no perfect matching on {} vertices",
                num_nodes
            )));
        }

        // fusion-blossom requires even weights.
        let weighted_edges: Vec<(VertexIndex, VertexIndex, Weight)> = graph
            .edges()
            .iter()
            .map(|e| (e.u as VertexIndex, e.v as VertexIndex, (2 * e.weight) as Weight))
            .collect();
        let initializer = SolverInitializer::new(num_nodes, weighted_edges, Vec::new());
        let mut solver = SolverSerial::new(&initializer);

        let defects: Vec<VertexIndex> = (0..num_nodes).map(|v| v as VertexIndex).collect();
        solver.solve(&SyndromePattern::new_vertices(defects));
        let subgraph = solver.subgraph();
        solver.clear();

        let selected: Vec<(usize, usize)> = subgraph
            .iter()
            .map(|&edge_idx| {
                let edge = &graph.edges()[edge_idx as usize];
                (edge.u, edge.v)
            })
            .collect();
        trace!(
            "blossom subgraph: {} edges over {} vertices",
            selected.len(),
            num_nodes
        );

        pair_along_forest(num_nodes, &selected)
    }
}

/// Splits an odd-degree edge subgraph into vertex pairs.
///
/// Walks a spanning forest of the subgraph and, from the leaves up, hands each
/// vertex that is still waiting for a partner to its parent. Two waiting
/// vertices meeting at the same node are paired. Each forest edge carries at
/// most one waiting vertex, so the tree paths between paired vertices are edge
/// disjoint.
///
/// # Errors
///
/// Returns `MatchingSolverFailure` if a connected component has an odd number
/// of vertices, which leaves one vertex unpaired.
fn pair_along_forest(
    num_nodes: usize,
    edges: &[(usize, usize)],
) -> Result<Vec<(usize, usize)>, QecError> {
    let mut adjacency = vec![Vec::new(); num_nodes];
    for &(u, v) in edges {
        adjacency[u].push(v);
        adjacency[v].push(u);
    }

    let mut visited = vec![false; num_nodes];
    let mut parent: Vec<Option<usize>> = vec![None; num_nodes];
    let mut waiting: Vec<Option<usize>> = (0..num_nodes).map(Some).collect();
    let mut pairs = Vec::with_capacity(num_nodes / 2);

    for root in 0..num_nodes {
        if visited[root] {
            continue;
        }

        let mut order = Vec::new();
        let mut stack = vec![root];
        visited[root] = true;
        while let Some(v) = stack.pop() {
            order.push(v);
            for &w in &adjacency[v] {
                if !visited[w] {
                    visited[w] = true;
                    parent[w] = Some(v);
                    stack.push(w);
                }
            }
        }

        for &v in order.iter().rev() {
            let Some(p) = parent[v] else {
                if let Some(left_over) = waiting[v] {
                    return Err(QecError::MatchingSolverFailure(format!(
                        "vertex {} left unpaired",
                        left_over
                    )));
                }
                continue;
            };
            if let Some(carried) = waiting[v].take() {
                match waiting[p].take() {
                    Some(other) => pairs.push((other, carried)),
                    None => waiting[p] = Some(carried),
                }
            }
        }
    }

    Ok(pairs)
}
