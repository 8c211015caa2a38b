//! Succession forest: trees of periods linked by `defined` connectors.
//!
//! Periods live in an arena addressed by their input index. A period with several parents is
//! owned by exactly one tree (the one whose root starts earliest), decided by an explicit
//! ancestor walk before any tree is materialized, so DAGs and stray cycles never duplicate or
//! loop.

use crate::input::{Link, PeriodSpan};
use rustc_hash::FxHashMap;

/// Child/parent adjacency over `defined` links, indexed by period position.
#[derive(Debug, Clone)]
pub struct SuccessionGraph {
    pub children: Vec<Vec<usize>>,
    pub parents: Vec<Vec<usize>>,
}

impl SuccessionGraph {
    pub fn new(periods: &[PeriodSpan], links: &[Link]) -> Self {
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, p) in periods.iter().enumerate() {
            index.entry(p.id.as_str()).or_insert(i);
        }

        let n = periods.len();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut parents: Vec<Vec<usize>> = vec![Vec::new(); n];
        for link in links.iter().filter(|l| l.is_defined()) {
            let (Some(&from), Some(&to)) =
                (index.get(link.from.as_str()), index.get(link.to.as_str()))
            else {
                tracing::warn!(
                    from = %link.from,
                    to = %link.to,
                    "ignoring connector with unknown endpoint"
                );
                continue;
            };
            if from == to || children[from].contains(&to) {
                continue;
            }
            children[from].push(to);
            parents[to].push(from);
        }

        Self { children, parents }
    }

    pub fn is_root(&self, v: usize) -> bool {
        self.parents[v].is_empty()
    }

    /// Roots reachable by walking parent edges up from `v`, in discovery order.
    pub fn ancestor_roots(&self, v: usize) -> Vec<usize> {
        let mut roots = Vec::new();
        let mut seen = vec![false; self.parents.len()];
        let mut stack = vec![v];
        while let Some(cur) = stack.pop() {
            if std::mem::replace(&mut seen[cur], true) {
                continue;
            }
            if self.is_root(cur) {
                roots.push(cur);
                continue;
            }
            // Reverse so the first parent is expanded first.
            stack.extend(self.parents[cur].iter().rev().copied());
        }
        roots
    }
}

/// Maps each multi-parent period to the root of the tree that owns it.
pub fn resolve_owners(periods: &[PeriodSpan], graph: &SuccessionGraph) -> Vec<Option<usize>> {
    let mut owners = vec![None; periods.len()];
    for (v, parents) in graph.parents.iter().enumerate() {
        if parents.len() < 2 {
            continue;
        }
        let mut best: Option<usize> = None;
        for &parent in parents {
            for root in graph.ancestor_roots(parent) {
                if best.is_none_or(|b| periods[root].start < periods[b].start) {
                    best = Some(root);
                }
            }
        }
        owners[v] = best;
    }
    owners
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub period: usize,
    /// Arena indices, sorted by child start time.
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Forest {
    pub nodes: Vec<TreeNode>,
    /// Arena indices of tree roots, oldest root first.
    pub roots: Vec<usize>,
    /// Periods outside every tree, in input order.
    pub unconnected: Vec<usize>,
}

impl Forest {
    pub fn build(periods: &[PeriodSpan], links: &[Link]) -> Self {
        let graph = SuccessionGraph::new(periods, links);
        let owners = resolve_owners(periods, &graph);
        let mut builder = ForestBuilder {
            periods,
            graph: &graph,
            owners: &owners,
            in_tree: vec![false; periods.len()],
            nodes: Vec::new(),
        };

        let mut roots = Vec::new();
        for v in 0..periods.len() {
            if !graph.is_root(v) || graph.children[v].is_empty() {
                continue;
            }
            let node = builder.attach(v);
            if builder.nodes[node].children.is_empty() {
                // Every child went to an older tree; a lone root is laid out as unconnected.
                builder.nodes.truncate(node);
                builder.in_tree[v] = false;
                continue;
            }
            roots.push(node);
        }

        let nodes = builder.nodes;
        roots.sort_by(|&a, &b| {
            periods[nodes[a].period]
                .start
                .total_cmp(&periods[nodes[b].period].start)
        });

        let unconnected = (0..periods.len())
            .filter(|&v| !builder.in_tree[v])
            .collect();

        Self {
            nodes,
            roots,
            unconnected,
        }
    }

    pub fn period(&self, node: usize) -> usize {
        self.nodes[node].period
    }

    pub fn children(&self, node: usize) -> &[usize] {
        &self.nodes[node].children
    }

    /// Arena indices of the tree under `root`, parents before children.
    pub fn preorder(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n].children.iter().rev().copied());
        }
        out
    }

    /// Latest end time anywhere in each node's subtree.
    pub fn lineage_ends(&self, periods: &[PeriodSpan]) -> Vec<f64> {
        let mut ends: Vec<f64> = self
            .nodes
            .iter()
            .map(|n| periods[n.period].end)
            .collect();
        // Children are always pushed after their parent, so a reverse sweep is a post-order.
        for n in (0..self.nodes.len()).rev() {
            for &c in &self.nodes[n].children {
                ends[n] = ends[n].max(ends[c]);
            }
        }
        ends
    }
}

struct ForestBuilder<'a> {
    periods: &'a [PeriodSpan],
    graph: &'a SuccessionGraph,
    owners: &'a [Option<usize>],
    in_tree: Vec<bool>,
    nodes: Vec<TreeNode>,
}

impl ForestBuilder<'_> {
    /// Materializes the tree under `root` in pre-order and returns the root's arena index.
    fn attach(&mut self, root: usize) -> usize {
        let idx = self.push(root);
        let mut stack = self.pending_children(root, idx);
        while let Some((child, parent)) = stack.pop() {
            // An earlier sibling's subtree may already have taken a shared descendant.
            if self.in_tree[child] || self.owners[child].is_some_and(|o| o != root) {
                continue;
            }
            let node = self.push(child);
            self.nodes[parent].children.push(node);
            stack.extend(self.pending_children(child, node));
        }
        idx
    }

    fn push(&mut self, period: usize) -> usize {
        self.in_tree[period] = true;
        self.nodes.push(TreeNode {
            period,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// `(child, parent node)` pairs in stack order, so the earliest-starting child pops first.
    fn pending_children(&self, period: usize, node: usize) -> Vec<(usize, usize)> {
        let mut kids = self.graph.children[period].clone();
        kids.sort_by(|&a, &b| self.periods[a].start.total_cmp(&self.periods[b].start));
        kids.into_iter().rev().map(|child| (child, node)).collect()
    }
}
