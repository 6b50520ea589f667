//! Layered layout for the category graph view.
//!
//! Nodes are arranged in horizontal layers by a breadth-first walk along
//! forward edges, starting from the used categories. Everything the walk
//! does not reach within the layer budget lands in a single overflow layer,
//! so every node is placed exactly once regardless of cycles or
//! disconnected components.

use serde::Serialize;

/// Geometry and traversal limits for the layered layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Horizontal distance between nodes of the same layer
    pub h_spacing: f64,
    /// Vertical distance between layers
    pub v_spacing: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    /// Horizontal shift applied per layer index
    pub layer_skew: f64,
    /// Maximum number of layers produced by the walk, overflow excluded
    pub max_layers: usize,
    /// Roots taken by in-degree when no node is used
    pub fallback_roots: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            h_spacing: 250.0,
            v_spacing: 150.0,
            origin_x: 100.0,
            origin_y: 100.0,
            layer_skew: 50.0,
            max_layers: 10,
            fallback_roots: 5,
        }
    }
}

/// A node position in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl LayoutConfig {
    /// Position of the `index`-th node of a layer holding `count` nodes.
    ///
    /// Layers are centred on `origin_x` and shifted right by `layer_skew`
    /// per layer.
    ///
    /// ```rust
    /// use clientscope::view::LayoutConfig;
    ///
    /// let config = LayoutConfig::default();
    /// let pos = config.position(1, 0, 3);
    /// assert_eq!(pos.x, 100.0 - 250.0 + 50.0);
    /// assert_eq!(pos.y, 250.0);
    /// ```
    pub fn position(&self, layer: usize, index: usize, count: usize) -> Position {
        let span = count.saturating_sub(1) as f64 * self.h_spacing / 2.0;
        Position {
            x: self.origin_x - span + index as f64 * self.h_spacing + layer as f64 * self.layer_skew,
            y: self.origin_y + layer as f64 * self.v_spacing,
        }
    }
}

/// Splits nodes `0..node_count` into layers.
///
/// `forward[n]` lists the forward neighbors of node `n` in edge order,
/// `in_degree[n]` its incoming edge count and `is_used[n]` whether it seeds
/// the walk. Node indices are expected in identifier order; ties keep that
/// order.
pub(crate) fn assign_layers(
    forward: &[Vec<usize>],
    in_degree: &[usize],
    is_used: &[bool],
    config: &LayoutConfig,
) -> Vec<Vec<usize>> {
    let node_count = forward.len();
    let mut layers: Vec<Vec<usize>> = Vec::new();
    if node_count == 0 {
        return layers;
    }

    let mut roots: Vec<usize> = (0..node_count).filter(|&n| is_used[n]).collect();
    roots.sort_by(|&a, &b| in_degree[b].cmp(&in_degree[a]));
    if roots.is_empty() {
        roots = (0..node_count).collect();
        roots.sort_by(|&a, &b| in_degree[b].cmp(&in_degree[a]));
        roots.truncate(config.fallback_roots);
    }

    let mut discovered = vec![false; node_count];
    let mut layered = vec![false; node_count];
    for &root in &roots {
        discovered[root] = true;
    }

    let mut current = roots;
    while !current.is_empty() && layers.len() < config.max_layers {
        let mut next = Vec::new();
        for &node in &current {
            for &target in &forward[node] {
                if !discovered[target] {
                    discovered[target] = true;
                    next.push(target);
                }
            }
        }
        for &node in &current {
            layered[node] = true;
        }
        layers.push(current);
        current = next;
    }

    let overflow: Vec<usize> = (0..node_count).filter(|&n| !layered[n]).collect();
    if !overflow.is_empty() {
        layers.push(overflow);
    }

    layers
}
