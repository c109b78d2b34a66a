use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyType {
    Dependency,
    DevDependency,
}

/// One declared manifest entry. The version is the raw range expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDependency {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub dep_type: DependencyType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedManifest {
    pub dependencies: Vec<ParsedDependency>,
    pub total_count: usize,
    pub was_truncated: bool,
}

impl ParsedDependency {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, version: V, dep_type: DependencyType) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dep_type,
        }
    }

    pub fn is_dev(&self) -> bool {
        self.dep_type == DependencyType::DevDependency
    }
}
