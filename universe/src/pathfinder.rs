//! Breadth-first search over the warp graph.
//!
//! The search only reads the model. It expands nodes in discovery order and
//! each node's warps in the order they were recorded.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::world_state::{Sector, Universe};

type MatchFn = Arc<dyn Fn(&Sector, u32) -> bool + Send + Sync>;

/// Predicate over a sector and its distance from the search origin.
#[derive(Clone)]
pub enum NodeMatcher {
    All,
    None,
    NotAvoided,
    Unexplored,
    Sector(u32),
    AtDistance(u32),
    And(Box<NodeMatcher>, Box<NodeMatcher>),
    Or(Box<NodeMatcher>, Box<NodeMatcher>),
    Not(Box<NodeMatcher>),
    Custom(MatchFn),
}

impl NodeMatcher {
    pub fn custom(f: impl Fn(&Sector, u32) -> bool + Send + Sync + 'static) -> Self {
        NodeMatcher::Custom(Arc::new(f))
    }

    pub fn and(self, other: NodeMatcher) -> Self {
        NodeMatcher::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: NodeMatcher) -> Self {
        NodeMatcher::Or(Box::new(self), Box::new(other))
    }

    pub fn matches(&self, sector: &Sector, distance: u32) -> bool {
        match self {
            NodeMatcher::All => true,
            NodeMatcher::None => false,
            NodeMatcher::NotAvoided => !sector.is_avoided(),
            NodeMatcher::Unexplored => !sector.is_explored(),
            NodeMatcher::Sector(n) => sector.number() == *n,
            NodeMatcher::AtDistance(d) => distance == *d,
            NodeMatcher::And(a, b) => a.matches(sector, distance) && b.matches(sector, distance),
            NodeMatcher::Or(a, b) => a.matches(sector, distance) || b.matches(sector, distance),
            NodeMatcher::Not(inner) => !inner.matches(sector, distance),
            NodeMatcher::Custom(f) => f(sector, distance),
        }
    }
}

impl std::ops::Not for NodeMatcher {
    type Output = NodeMatcher;

    fn not(self) -> NodeMatcher {
        NodeMatcher::Not(Box::new(self))
    }
}

impl std::fmt::Debug for NodeMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeMatcher::All => write!(f, "All"),
            NodeMatcher::None => write!(f, "None"),
            NodeMatcher::NotAvoided => write!(f, "NotAvoided"),
            NodeMatcher::Unexplored => write!(f, "Unexplored"),
            NodeMatcher::Sector(n) => write!(f, "Sector({n})"),
            NodeMatcher::AtDistance(d) => write!(f, "AtDistance({d})"),
            NodeMatcher::And(a, b) => write!(f, "And({a:?}, {b:?})"),
            NodeMatcher::Or(a, b) => write!(f, "Or({a:?}, {b:?})"),
            NodeMatcher::Not(inner) => write!(f, "Not({inner:?})"),
            NodeMatcher::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// A sector reached by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    pub sector: u32,
    /// `None` only for the origin.
    pub parent: Option<u32>,
    pub distance: u32,
}

/// Nodes collected by [`search`], in discovery order.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    nodes: Vec<SearchNode>,
    index: HashMap<u32, usize>,
    target: Option<SearchNode>,
}

impl SearchResult {
    fn push(&mut self, node: SearchNode) {
        self.index.insert(node.sector, self.nodes.len());
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SearchNode] {
        &self.nodes
    }

    pub fn includes(&self, sector: u32) -> bool {
        self.index.contains_key(&sector)
    }

    pub fn node(&self, sector: u32) -> Option<&SearchNode> {
        self.index.get(&sector).map(|i| &self.nodes[*i])
    }

    pub fn target_found(&self) -> bool {
        self.target.is_some()
    }

    /// The node that satisfied the target matcher, whether or not it was
    /// added to the result.
    pub fn target_node(&self) -> Option<&SearchNode> {
        self.target.as_ref()
    }

    /// Sectors from the origin to `destination` inclusive, or `None` if the
    /// destination is not in the result.
    pub fn plot_course(&self, destination: u32) -> Option<Vec<u32>> {
        let mut node = self.node(destination)?;
        let mut course = vec![node.sector];
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            course.push(node.sector);
        }
        course.reverse();
        Some(course)
    }
}

/// Breadth-first search from `origin`.
///
/// Sectors failing `include` are neither collected nor expanded. The search
/// stops at the first sector matching `target`, which is added to the result
/// only when `include_target` is set, or once `limit` sectors are collected
/// (0 means no limit).
pub fn search(
    universe: &Universe,
    origin: u32,
    limit: usize,
    include: &NodeMatcher,
    target: &NodeMatcher,
    include_target: bool,
) -> Result<SearchResult> {
    let mut result = SearchResult::default();
    let start = universe.sector(origin)?;
    let origin_node = SearchNode {
        sector: origin,
        parent: None,
        distance: 0,
    };
    if target.matches(start, 0) {
        if include_target {
            result.push(origin_node);
        }
        result.target = Some(origin_node);
        return Ok(result);
    }
    if !include.matches(start, 0) {
        return Ok(result);
    }

    let size = universe.size() as usize;
    let limit = if limit == 0 { size } else { limit.min(size) };
    let mut considered = vec![false; size + 1];
    considered[origin as usize] = true;
    result.push(origin_node);

    let mut next = 0;
    while next < result.nodes.len() && result.nodes.len() < limit {
        let parent = result.nodes[next];
        next += 1;
        for to in universe.sector(parent.sector)?.warps_out_unordered() {
            let seen = &mut considered[to as usize];
            if *seen {
                continue;
            }
            *seen = true;

            let sector = universe.sector(to)?;
            let node = SearchNode {
                sector: to,
                parent: Some(parent.sector),
                distance: parent.distance + 1,
            };
            if target.matches(sector, node.distance) {
                if include_target {
                    result.push(node);
                }
                result.target = Some(node);
                return Ok(result);
            }
            if include.matches(sector, node.distance) {
                result.push(node);
                if result.nodes.len() >= limit {
                    return Ok(result);
                }
            }
        }
    }
    Ok(result)
}

impl Universe {
    /// Shortest known course from `from` to `to`, avoiding avoided sectors
    /// unless `ignore_avoids` is set. `Ok(None)` means no known route.
    pub fn plot_course(&self, from: u32, to: u32, ignore_avoids: bool) -> Result<Option<Vec<u32>>> {
        let include = if ignore_avoids {
            NodeMatcher::All
        } else {
            NodeMatcher::NotAvoided
        };
        let result = search(self, from, 0, &include, &NodeMatcher::Sector(to), true)?;
        Ok(result.plot_course(to))
    }
}
