//! Explicit graph formulation of row segmentation.
//!
//! Solves the same problem as [segment](crate::segment) with Dijkstra's algorithm over
//! column nodes. It is slower and only meant as an independent check of the dynamic
//! program; ties may resolve to a different tiling with the same total cost.
use crate::cost::MatchParams;
use crate::segmenter::{edge_cost, Choice, Segmentation, Span};
use crate::table::CostTable;
use crate::Error;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, PartialEq)]
struct State {
    cost: f32,
    node: usize,
}

impl Eq for State {}

impl Ord for State {
    // reversed for a min-heap
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn edges(table: &CostTable, x: usize, fallback: f32) -> Result<Vec<Span>, Error> {
    let width = table.row_width();
    let mut out = vec![Span {
        x,
        width: 1,
        choice: Choice::Blank,
        cost: fallback,
    }];
    for entry in table.entries() {
        let w = entry.width();
        if w == 0 || x + w > width {
            continue;
        }
        if let Some(m) = entry.get(x) {
            out.push(Span {
                x,
                width: w,
                choice: Choice::Glyph(m.glyph),
                cost: edge_cost(m.cost, x, w)?,
            });
        }
    }
    Ok(out)
}

/// Shortest path from column 0 to the row end.
pub fn shortest_path(table: &CostTable, params: &MatchParams) -> Result<Segmentation, Error> {
    params.validate()?;
    let width = table.row_width();
    let mut dist: Vec<Option<f32>> = vec![None; width + 1];
    let mut prev: Vec<Option<Span>> = vec![None; width + 1];
    let mut heap = BinaryHeap::new();

    dist[0] = Some(0.0);
    heap.push(State { cost: 0.0, node: 0 });
    while let Some(State { cost, node }) = heap.pop() {
        if node == width {
            break;
        }
        if matches!(dist[node], Some(d) if cost > d) {
            continue;
        }
        for edge in edges(table, node, params.fallback_penalty)? {
            let next = node + edge.width;
            let candidate = cost + edge.cost;
            if dist[next].map_or(true, |d| candidate < d) {
                dist[next] = Some(candidate);
                prev[next] = Some(edge);
                heap.push(State {
                    cost: candidate,
                    node: next,
                });
            }
        }
    }

    let total_cost = dist[width].ok_or_else(|| {
        Error::InvariantViolation(format!("row end {} is unreachable", width))
    })?;
    let mut spans = Vec::new();
    let mut node = width;
    while node > 0 {
        let span = prev[node].ok_or_else(|| {
            Error::InvariantViolation(format!("column {} has no predecessor", node))
        })?;
        spans.push(span);
        node = span.x;
    }
    spans.reverse();
    Ok(Segmentation::new(spans, total_cost))
}
