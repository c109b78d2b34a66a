use crate::error::DepScanError;
use crate::models::{DependencyType, ParsedDependency, ParsedManifest};
use serde_json::Value;

/// Upper bound on the number of dependencies analyzed per manifest.
pub const MAX_DEPENDENCIES: usize = 50;

/// Parses `package.json` text into the ordered, capped dependency list.
///
/// `dependencies` come before `devDependencies`, each in declaration order.
/// Only the first [`MAX_DEPENDENCIES`] entries are returned; `total_count`
/// always reflects the full declared count.
pub fn parse_manifest(content: &str) -> Result<ParsedManifest, DepScanError> {
    let parsed: Value = serde_json::from_str(content).map_err(|_| {
        DepScanError::InvalidInput(
            "Invalid JSON: could not parse the provided content as JSON".to_string(),
        )
    })?;

    let package = parsed.as_object().ok_or_else(|| {
        DepScanError::InvalidInput("Invalid JSON: expected a JSON object".to_string())
    })?;

    let mut all_deps = extract_entries(package.get("dependencies"), DependencyType::Dependency);
    all_deps.extend(extract_entries(
        package.get("devDependencies"),
        DependencyType::DevDependency,
    ));

    if all_deps.is_empty() {
        return Err(DepScanError::NoDependencies);
    }

    let total_count = all_deps.len();
    let was_truncated = total_count > MAX_DEPENDENCIES;
    all_deps.truncate(MAX_DEPENDENCIES);

    tracing::debug!(
        total = total_count,
        analyzed = all_deps.len(),
        truncated = was_truncated,
        "parsed manifest"
    );

    Ok(ParsedManifest {
        dependencies: all_deps,
        total_count,
        was_truncated,
    })
}

fn extract_entries(section: Option<&Value>, dep_type: DependencyType) -> Vec<ParsedDependency> {
    let Some(entries) = section.and_then(Value::as_object) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(name, version)| {
            version
                .as_str()
                .map(|v| ParsedDependency::new(name.as_str(), v, dep_type))
        })
        .collect()
}
