//! Types for the package catalog (formulae and casks).

use serde::{Deserialize, Serialize};

/// The two package kinds, distinguished by field shape and identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    Formula,
    Cask,
}

impl PackageType {
    /// Stable string form used in index keys and API paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Formula => "formula",
            PackageType::Cask => "cask",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "formula" => Some(PackageType::Formula),
            "cask" => Some(PackageType::Cask),
            _ => None,
        }
    }
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable versions block of a formula as published by the remote index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormulaVersions {
    #[serde(default)]
    pub stable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    #[serde(default)]
    pub bottle: bool,
}

/// A formula record from the remote index.
///
/// Only the fields the explorer consumes are modeled; unknown remote
/// fields are ignored on deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Formula {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub tap: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub versions: FormulaVersions,
    /// Runtime dependencies.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub build_dependencies: Vec<String>,
    #[serde(default)]
    pub optional_dependencies: Vec<String>,
    #[serde(default)]
    pub keg_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keg_only_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveats: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_reason: Option<String>,
}

/// Dependency block of a cask (`depends_on` in the remote JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaskDependsOn {
    #[serde(default)]
    pub formula: Vec<String>,
    #[serde(default)]
    pub cask: Vec<String>,
}

/// A cask record from the remote index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cask {
    pub token: String,
    #[serde(default)]
    pub full_token: String,
    #[serde(default)]
    pub tap: String,
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub depends_on: CaskDependsOn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveats: Option<String>,
    #[serde(default)]
    pub auto_updates: Option<bool>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_reason: Option<String>,
}

/// How a dependency is required by its parent package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    Runtime,
    Build,
    Optional,
}

/// A flattened, type-tagged dependency edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: String,
    pub kind: DependencyKind,
}

/// Unified read-side view over either package kind.
///
/// This is what the query engine scores and what API consumers page
/// through; `id` is the formula `name` or the cask `token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub package_type: PackageType,
    pub desc: Option<String>,
    pub version: String,
    pub homepage: String,
    pub dependencies: Vec<Dependency>,
    pub deprecated: bool,
    pub disabled: bool,
}

impl PackageRecord {
    /// Index key shared with the favorite/tag maps ("type:id").
    pub fn key(&self) -> String {
        package_key(&self.id, self.package_type)
    }
}

/// Index key for the favorite/tag maps ("type:id").
pub fn package_key(id: &str, package_type: PackageType) -> String {
    format!("{}:{}", package_type, id)
}

impl From<&Formula> for PackageRecord {
    fn from(formula: &Formula) -> Self {
        let mut dependencies = Vec::with_capacity(
            formula.dependencies.len()
                + formula.build_dependencies.len()
                + formula.optional_dependencies.len(),
        );
        for id in &formula.dependencies {
            dependencies.push(Dependency {
                id: id.clone(),
                kind: DependencyKind::Runtime,
            });
        }
        for id in &formula.build_dependencies {
            dependencies.push(Dependency {
                id: id.clone(),
                kind: DependencyKind::Build,
            });
        }
        for id in &formula.optional_dependencies {
            dependencies.push(Dependency {
                id: id.clone(),
                kind: DependencyKind::Optional,
            });
        }

        Self {
            id: formula.name.clone(),
            package_type: PackageType::Formula,
            desc: formula.desc.clone(),
            version: formula.versions.stable.clone().unwrap_or_default(),
            homepage: formula.homepage.clone(),
            dependencies,
            deprecated: formula.deprecated,
            disabled: formula.disabled,
        }
    }
}

impl From<&Cask> for PackageRecord {
    fn from(cask: &Cask) -> Self {
        let mut dependencies =
            Vec::with_capacity(cask.depends_on.formula.len() + cask.depends_on.cask.len());
        for id in &cask.depends_on.formula {
            dependencies.push(Dependency {
                id: id.clone(),
                kind: DependencyKind::Runtime,
            });
        }
        for id in &cask.depends_on.cask {
            dependencies.push(Dependency {
                id: id.clone(),
                kind: DependencyKind::Runtime,
            });
        }

        Self {
            id: cask.token.clone(),
            package_type: PackageType::Cask,
            desc: cask.desc.clone(),
            version: cask.version.clone(),
            homepage: cask.homepage.clone(),
            dependencies,
            deprecated: cask.deprecated,
            disabled: cask.disabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_type_roundtrip() {
        assert_eq!(PackageType::parse("formula"), Some(PackageType::Formula));
        assert_eq!(PackageType::parse("cask"), Some(PackageType::Cask));
        assert_eq!(PackageType::parse("bottle"), None);
        assert_eq!(PackageType::Formula.to_string(), "formula");
    }

    #[test]
    fn test_formula_deserialize_ignores_unknown_fields() {
        let json = r#"{
            "name": "wget",
            "full_name": "wget",
            "tap": "homebrew/core",
            "desc": "Internet file retriever",
            "license": "GPL-3.0-or-later",
            "homepage": "https://www.gnu.org/software/wget/",
            "versions": {"stable": "1.25.0", "head": "HEAD", "bottle": true},
            "dependencies": ["libidn2", "openssl@3"],
            "build_dependencies": ["pkgconf"],
            "deprecated": false,
            "disabled": false,
            "revision": 1,
            "bottle": {"stable": {}}
        }"#;
        let formula: Formula = serde_json::from_str(json).unwrap();
        assert_eq!(formula.name, "wget");
        assert_eq!(formula.versions.stable.as_deref(), Some("1.25.0"));
        assert_eq!(formula.dependencies.len(), 2);
        assert_eq!(formula.build_dependencies, vec!["pkgconf"]);
    }

    #[test]
    fn test_formula_deserialize_minimal() {
        let formula: Formula = serde_json::from_str(r#"{"name": "tiny"}"#).unwrap();
        assert_eq!(formula.name, "tiny");
        assert!(formula.versions.stable.is_none());
        assert!(!formula.deprecated);
    }

    #[test]
    fn test_formula_to_record_flattens_tagged_dependencies() {
        let formula = Formula {
            name: "wget".to_string(),
            desc: Some("Internet file retriever".to_string()),
            versions: FormulaVersions {
                stable: Some("1.25.0".to_string()),
                ..Default::default()
            },
            dependencies: vec!["libidn2".to_string()],
            build_dependencies: vec!["pkgconf".to_string()],
            optional_dependencies: vec!["pcre2".to_string()],
            ..Default::default()
        };

        let record = PackageRecord::from(&formula);
        assert_eq!(record.id, "wget");
        assert_eq!(record.package_type, PackageType::Formula);
        assert_eq!(record.version, "1.25.0");
        assert_eq!(record.dependencies.len(), 3);
        assert_eq!(record.dependencies[0].kind, DependencyKind::Runtime);
        assert_eq!(record.dependencies[1].kind, DependencyKind::Build);
        assert_eq!(record.dependencies[2].kind, DependencyKind::Optional);
    }

    #[test]
    fn test_cask_to_record() {
        let cask = Cask {
            token: "firefox".to_string(),
            desc: Some("Web browser".to_string()),
            version: "142.0".to_string(),
            depends_on: CaskDependsOn {
                formula: vec!["python@3.13".to_string()],
                cask: vec!["some-helper".to_string()],
            },
            deprecated: true,
            ..Default::default()
        };

        let record = PackageRecord::from(&cask);
        assert_eq!(record.id, "firefox");
        assert_eq!(record.package_type, PackageType::Cask);
        assert_eq!(record.dependencies.len(), 2);
        assert!(record
            .dependencies
            .iter()
            .all(|d| d.kind == DependencyKind::Runtime));
        assert!(record.deprecated);
    }

    #[test]
    fn test_package_key() {
        assert_eq!(package_key("wget", PackageType::Formula), "formula:wget");
        assert_eq!(package_key("firefox", PackageType::Cask), "cask:firefox");
    }

    #[test]
    fn test_record_serializes_type_field() {
        let record = PackageRecord {
            id: "wget".to_string(),
            package_type: PackageType::Formula,
            desc: None,
            version: "1.0".to_string(),
            homepage: String::new(),
            dependencies: vec![],
            deprecated: false,
            disabled: false,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""type":"formula""#));
    }
}
