use serde::{Deserialize, Serialize};

use crate::shared::territory::TerritoryNode;

/// Master-data payload of a territory node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaInfo {
    /// Primary key in the master table of the node's level
    pub id: String,
}

pub type AreaNode = TerritoryNode<AreaInfo>;

/// Query string of the area endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AreaQuery {
    /// Restrict the tree to one region
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaTreeResponse {
    pub tree: Vec<AreaNode>,
    pub node_count: usize,
}
