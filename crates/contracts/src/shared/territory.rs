use serde::{Deserialize, Serialize};

/// Name used for a territory whose key is missing in the warehouse row.
pub const UNSPECIFIED_TERRITORY: &str = "(unspecified)";

/// Level of the administrative territory hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerritoryLevel {
    Region,
    Branch,
    Subbranch,
    Cluster,
    Kabupaten,
    /// FMC counterpart of the subbranch level
    Wok,
    /// FMC counterpart of the cluster level, terminal in the FMC hierarchy
    Sto,
}

impl TerritoryLevel {
    /// Column/alias fragment used by warehouse queries (e.g. `rev_mtd_wok`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TerritoryLevel::Region => "region",
            TerritoryLevel::Branch => "branch",
            TerritoryLevel::Subbranch => "subbranch",
            TerritoryLevel::Cluster => "cluster",
            TerritoryLevel::Kabupaten => "kabupaten",
            TerritoryLevel::Wok => "wok",
            TerritoryLevel::Sto => "sto",
        }
    }
}

/// Region → Branch → Subbranch → Cluster → Kabupaten
pub const REVENUE_HIERARCHY: [TerritoryLevel; 5] = [
    TerritoryLevel::Region,
    TerritoryLevel::Branch,
    TerritoryLevel::Subbranch,
    TerritoryLevel::Cluster,
    TerritoryLevel::Kabupaten,
];

/// Region → Branch → WOK → STO
pub const FMC_HIERARCHY: [TerritoryLevel; 4] = [
    TerritoryLevel::Region,
    TerritoryLevel::Branch,
    TerritoryLevel::Wok,
    TerritoryLevel::Sto,
];

/// One node of a territory tree.
///
/// `metrics` is flattened into the node so a serialized node reads as
/// `{ "name": .., "level": .., <metric fields>, "children": [..] }`.
/// Terminal nodes serialize without `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryNode<M> {
    pub name: String,
    pub level: TerritoryLevel,
    #[serde(flatten)]
    pub metrics: M,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TerritoryNode<M>>,
}

impl<M> TerritoryNode<M> {
    pub fn leaf(name: impl Into<String>, level: TerritoryLevel, metrics: M) -> Self {
        Self {
            name: name.into(),
            level,
            metrics,
            children: Vec::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&TerritoryNode<M>> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Number of nodes in this subtree, including the node itself
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Rebuilds the subtree with a different payload, keeping names, levels and order.
    pub fn map_metrics<N, F>(self, f: &F) -> TerritoryNode<N>
    where
        F: Fn(M) -> N,
    {
        TerritoryNode {
            name: self.name,
            level: self.level,
            metrics: f(self.metrics),
            children: self
                .children
                .into_iter()
                .map(|c| c.map_metrics(f))
                .collect(),
        }
    }
}

/// Total number of nodes in a forest of territory trees
pub fn count_nodes<M>(tree: &[TerritoryNode<M>]) -> usize {
    tree.iter().map(|n| n.node_count()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Amount {
        amount: f64,
    }

    #[test]
    fn test_terminal_node_serializes_without_children() {
        let node = TerritoryNode::leaf("AMBON", TerritoryLevel::Kabupaten, Amount { amount: 5.0 });
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["name"], "AMBON");
        assert_eq!(json["level"], "kabupaten");
        assert_eq!(json["amount"], 5.0);
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_map_metrics_keeps_shape() {
        let mut root = TerritoryNode::leaf("PUMA", TerritoryLevel::Region, Amount { amount: 10.0 });
        root.children
            .push(TerritoryNode::leaf("AMBON", TerritoryLevel::Branch, Amount { amount: 4.0 }));
        root.children
            .push(TerritoryNode::leaf("SORONG", TerritoryLevel::Branch, Amount { amount: 6.0 }));

        let doubled = root.map_metrics(&|m: Amount| m.amount * 2.0);

        assert_eq!(doubled.metrics, 20.0);
        assert_eq!(doubled.children[0].name, "AMBON");
        assert_eq!(doubled.children[1].metrics, 12.0);
        assert_eq!(doubled.node_count(), 3);
    }

    #[test]
    fn test_node_round_trips_through_json() {
        let mut root = TerritoryNode::leaf("PUMA", TerritoryLevel::Region, Amount { amount: 1.0 });
        root.children
            .push(TerritoryNode::leaf("JAYAPURA", TerritoryLevel::Branch, Amount::default()));

        let json = serde_json::to_string(&root).unwrap();
        let back: TerritoryNode<Amount> = serde_json::from_str(&json).unwrap();

        assert_eq!(back, root);
        assert!(back.child("JAYAPURA").is_some());
    }
}
