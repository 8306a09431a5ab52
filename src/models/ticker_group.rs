use crate::constants::{EUROPEAN_INDICES, US_INDICES};
use serde::{Deserialize, Serialize};

/// A named index with its quote symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedIndex {
    pub name: String,
    pub symbol: String,
}

/// Indices organized by region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexGroup {
    pub region: String,
    pub indices: Vec<NamedIndex>,
}

impl IndexGroup {
    pub fn from_pairs(region: &str, pairs: &[(&str, &str)]) -> Self {
        Self {
            region: region.to_string(),
            indices: pairs
                .iter()
                .map(|(name, symbol)| NamedIndex {
                    name: name.to_string(),
                    symbol: symbol.to_string(),
                })
                .collect(),
        }
    }
}

/// US and European index groups shown on the global indices page
pub fn global_index_groups() -> Vec<IndexGroup> {
    vec![
        IndexGroup::from_pairs("US", US_INDICES),
        IndexGroup::from_pairs("Europe", EUROPEAN_INDICES),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_groups_structure() {
        let groups = global_index_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].region, "US");
        assert_eq!(groups[1].region, "Europe");
        assert!(groups[0].indices.iter().any(|i| i.name == "Nasdaq" && i.symbol == "^IXIC"));
        assert!(groups[1].indices.iter().any(|i| i.symbol == "^FTSE"));
    }
}
