use contracts::shared::territory::{TerritoryLevel, TerritoryNode, UNSPECIFIED_TERRITORY};
use std::collections::HashMap;

/// Grouping key and level metrics of one hierarchy level of a flat row
pub struct LevelSelector<R, M> {
    pub level: TerritoryLevel,
    pub key: fn(&R) -> Option<&str>,
    /// Called only when the node is created (first-write-wins)
    pub metrics: fn(&R) -> M,
}

/// Grouping key and counter writer of one level for the second pass
pub struct CounterSelector<R, M> {
    pub level: TerritoryLevel,
    pub key: fn(&R) -> Option<&str>,
    /// Called on every visit (last-write-wins)
    pub apply: fn(&R, &mut M),
}

/// Maps a raw key to the node name. Blank keys go to the sentinel bucket;
/// the flag tells whether that happened.
pub fn normalize_key(raw: Option<&str>) -> (&str, bool) {
    match raw {
        Some(key) if !key.trim().is_empty() => (key, false),
        _ => (UNSPECIFIED_TERRITORY, true),
    }
}

struct BuildNode<M> {
    name: String,
    level: TerritoryLevel,
    metrics: M,
    children: ChildIndex<M>,
}

/// Children of one parent in insertion order, with a name lookup
struct ChildIndex<M> {
    positions: HashMap<String, usize>,
    nodes: Vec<BuildNode<M>>,
}

impl<M> ChildIndex<M> {
    fn new() -> Self {
        Self {
            positions: HashMap::new(),
            nodes: Vec::new(),
        }
    }

    fn get_or_insert(
        &mut self,
        name: &str,
        level: TerritoryLevel,
        init: impl FnOnce() -> M,
    ) -> &mut BuildNode<M> {
        let index = match self.positions.get(name) {
            Some(&index) => index,
            None => {
                let index = self.nodes.len();
                self.positions.insert(name.to_string(), index);
                self.nodes.push(BuildNode {
                    name: name.to_string(),
                    level,
                    metrics: init(),
                    children: ChildIndex::new(),
                });
                index
            }
        };
        &mut self.nodes[index]
    }

    fn from_tree(tree: Vec<TerritoryNode<M>>) -> Self {
        let mut index = ChildIndex::new();
        for node in tree {
            index.positions.insert(node.name.clone(), index.nodes.len());
            index.nodes.push(BuildNode {
                name: node.name,
                level: node.level,
                metrics: node.metrics,
                children: ChildIndex::from_tree(node.children),
            });
        }
        index
    }

    fn into_tree(self) -> Vec<TerritoryNode<M>> {
        self.nodes
            .into_iter()
            .map(|node| TerritoryNode {
                name: node.name,
                level: node.level,
                metrics: node.metrics,
                children: node.children.into_tree(),
            })
            .collect()
    }
}

/// Folds flat warehouse rows into a territory tree.
///
/// Every row is walked top-down through the levels. Nodes are scoped under
/// their parent, keep first-seen order, and take their metrics from the
/// first row that creates them.
pub struct TreeBuilder<M> {
    roots: ChildIndex<M>,
    unspecified_rows: usize,
}

impl<M> TreeBuilder<M> {
    pub fn new() -> Self {
        Self {
            roots: ChildIndex::new(),
            unspecified_rows: 0,
        }
    }

    /// Continues building on top of an existing tree
    pub fn from_tree(tree: Vec<TerritoryNode<M>>) -> Self {
        Self {
            roots: ChildIndex::from_tree(tree),
            unspecified_rows: 0,
        }
    }

    pub fn insert_row<R>(&mut self, row: &R, levels: &[LevelSelector<R, M>]) {
        let mut siblings = &mut self.roots;
        let mut unspecified = false;

        for selector in levels {
            let (name, blank) = normalize_key((selector.key)(row));
            unspecified |= blank;
            let node = siblings.get_or_insert(name, selector.level, || (selector.metrics)(row));
            siblings = &mut node.children;
        }

        if unspecified {
            self.unspecified_rows += 1;
        }
    }

    /// Second pass: creates missing nodes with default metrics and
    /// overwrites their counters.
    pub fn merge_row<R>(&mut self, row: &R, selectors: &[CounterSelector<R, M>])
    where
        M: Default,
    {
        let mut siblings = &mut self.roots;
        let mut unspecified = false;

        for selector in selectors {
            let (name, blank) = normalize_key((selector.key)(row));
            unspecified |= blank;
            let node = siblings.get_or_insert(name, selector.level, M::default);
            (selector.apply)(row, &mut node.metrics);
            siblings = &mut node.children;
        }

        if unspecified {
            self.unspecified_rows += 1;
        }
    }

    /// Rows that had at least one blank key
    pub fn unspecified_rows(&self) -> usize {
        self.unspecified_rows
    }

    pub fn build(self) -> Vec<TerritoryNode<M>> {
        if self.unspecified_rows > 0 {
            tracing::warn!(
                "{} row(s) with a blank territory key grouped under \"{}\"",
                self.unspecified_rows,
                UNSPECIFIED_TERRITORY
            );
        }
        self.roots.into_tree()
    }
}

impl<M> Default for TreeBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a tree from flat rows, first-write-wins on level metrics.
pub fn aggregate<'r, R: 'r, M>(
    rows: impl IntoIterator<Item = &'r R>,
    levels: &[LevelSelector<R, M>],
) -> Vec<TerritoryNode<M>> {
    let mut builder = TreeBuilder::new();
    for row in rows {
        builder.insert_row(row, levels);
    }
    builder.build()
}

/// Merges counters from a second row source into an existing tree.
pub fn merge_counters<'r, R: 'r, M: Default>(
    tree: Vec<TerritoryNode<M>>,
    rows: impl IntoIterator<Item = &'r R>,
    selectors: &[CounterSelector<R, M>],
) -> Vec<TerritoryNode<M>> {
    let mut builder = TreeBuilder::from_tree(tree);
    for row in rows {
        builder.merge_row(row, selectors);
    }
    builder.build()
}
