//! Quay.toml manifest parsing and schema.
//!
//! The manifest declares a project's direct dependency constraints. Each
//! `[[constraint]]` names a project by import root and pins it to a semver
//! range, a branch, or an exact revision. `[[override]]` entries share the
//! shape and apply across the whole graph; `required` and `ignored` add or
//! remove import roots regardless of what the source tree references.

use std::collections::HashSet;

use semver::VersionReq;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::util::hash::sha256_str;

/// Fixed file name of the project manifest.
pub const MANIFEST_NAME: &str = "Quay.toml";

/// Error produced when a manifest fails to parse or validate.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The TOML grammar failed; the source error carries line and column.
    #[error(transparent)]
    Syntax(#[from] toml::de::Error),

    /// A constraint with an empty `name`.
    #[error("constraint with an empty name")]
    EmptyName,

    /// The same import root constrained twice in one table.
    #[error("`{name}` is declared more than once")]
    DuplicateConstraint { name: String },

    /// More than one of version, branch, and revision on one constraint.
    #[error("`{name}` specifies more than one of version, branch, and revision")]
    ConflictingProperties { name: String },

    /// The version field is not a parseable semver range.
    #[error("`{name}` has an invalid version requirement `{req}`")]
    InvalidVersionReq {
        name: String,
        req: String,
        #[source]
        source: semver::Error,
    },

    /// The source field is not a parseable URL.
    #[error("`{name}` has an invalid source `{url}`")]
    InvalidSource {
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// A single dependency constraint (or override).
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Import root of the constrained project, e.g. `github.com/pkg/errors`.
    pub name: String,

    /// Semver range the selected version must satisfy.
    pub version: Option<VersionReq>,

    /// Branch whose tip should be followed.
    pub branch: Option<String>,

    /// Exact revision to pin to.
    pub revision: Option<String>,

    /// Alternate location to fetch from, when it differs from the import
    /// root itself.
    pub source: Option<Url>,
}

/// The parsed Quay.toml manifest.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Direct dependency constraints, in declaration order.
    pub constraints: Vec<Constraint>,

    /// Constraint overrides applied across the whole dependency graph.
    pub overrides: Vec<Constraint>,

    /// Import roots to include even when nothing references them.
    pub required: Vec<String>,

    /// Import roots to exclude from the graph.
    pub ignored: Vec<String>,
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    constraint: Vec<RawConstraint>,

    #[serde(default, rename = "override")]
    overrides: Vec<RawConstraint>,

    #[serde(default)]
    required: Vec<String>,

    #[serde(default)]
    ignored: Vec<String>,
}

/// Raw constraint from TOML (before validation).
#[derive(Debug, Default, Deserialize)]
struct RawConstraint {
    #[serde(default)]
    name: String,

    #[serde(default)]
    version: Option<String>,

    #[serde(default)]
    branch: Option<String>,

    #[serde(default)]
    revision: Option<String>,

    #[serde(default)]
    source: Option<String>,
}

impl Manifest {
    /// Parse manifest content.
    ///
    /// An empty document is a valid manifest with no constraints.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let raw: RawManifest = toml::from_str(content)?;

        Ok(Manifest {
            constraints: convert_constraints(raw.constraint)?,
            overrides: convert_constraints(raw.overrides)?,
            required: raw.required,
            ignored: raw.ignored,
        })
    }

    /// Look up a direct constraint by import root.
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Look up an override by import root.
    pub fn override_for(&self, name: &str) -> Option<&Constraint> {
        self.overrides.iter().find(|c| c.name == name)
    }

    /// Whether an import root is excluded from the graph.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.iter().any(|i| i == name)
    }

    /// Digest of the constraint-affecting content, in normalized form.
    ///
    /// Stable across whitespace, comments, and declaration order; a lock
    /// records this value as its memo so staleness is content-based rather
    /// than timestamp-based.
    pub fn fingerprint(&self) -> String {
        fn entries(constraints: &[Constraint]) -> serde_json::Value {
            let mut sorted: Vec<&Constraint> = constraints.iter().collect();
            sorted.sort_by(|a, b| a.name.cmp(&b.name));
            sorted
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "name": c.name,
                        "version": c.version.as_ref().map(|v| v.to_string()),
                        "branch": c.branch,
                        "revision": c.revision,
                        "source": c.source.as_ref().map(|u| u.to_string()),
                    })
                })
                .collect::<Vec<_>>()
                .into()
        }

        let mut required = self.required.clone();
        required.sort();
        let mut ignored = self.ignored.clone();
        ignored.sort();

        let normalized = serde_json::json!({
            "constraints": entries(&self.constraints),
            "overrides": entries(&self.overrides),
            "required": required,
            "ignored": ignored,
        });

        sha256_str(&normalized.to_string())
    }
}

fn convert_constraints(raw: Vec<RawConstraint>) -> Result<Vec<Constraint>, ManifestError> {
    let mut seen = HashSet::new();
    let mut constraints = Vec::with_capacity(raw.len());

    for rc in raw {
        if rc.name.is_empty() {
            return Err(ManifestError::EmptyName);
        }
        if !seen.insert(rc.name.clone()) {
            return Err(ManifestError::DuplicateConstraint { name: rc.name });
        }

        let properties = [
            rc.version.is_some(),
            rc.branch.is_some(),
            rc.revision.is_some(),
        ];
        if properties.iter().filter(|p| **p).count() > 1 {
            return Err(ManifestError::ConflictingProperties { name: rc.name });
        }

        let version = match rc.version {
            Some(req) => Some(req.parse::<VersionReq>().map_err(|source| {
                ManifestError::InvalidVersionReq {
                    name: rc.name.clone(),
                    req,
                    source,
                }
            })?),
            None => None,
        };

        let source = match rc.source {
            Some(url) => Some(Url::parse(&url).map_err(|source| {
                ManifestError::InvalidSource {
                    name: rc.name.clone(),
                    url,
                    source,
                }
            })?),
            None => None,
        };

        constraints.push(Constraint {
            name: rc.name,
            version,
            branch: rc.branch,
            revision: rc.revision,
            source,
        });
    }

    Ok(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_manifest() {
        let content = r#"
required = ["github.com/tools/generate"]
ignored = ["github.com/legacy/attic"]

[[constraint]]
name = "github.com/pkg/errors"
version = "^0.8.0"

[[constraint]]
name = "github.com/sirupsen/logrus"
branch = "master"

[[override]]
name = "github.com/pkg/errors"
revision = "645ef00459ed84a119197bfb8d8205042c6df63d"
"#;
        let manifest = Manifest::parse(content).unwrap();
        assert_eq!(manifest.constraints.len(), 2);
        assert_eq!(manifest.overrides.len(), 1);

        let errors = manifest.constraint("github.com/pkg/errors").unwrap();
        assert!(errors.version.is_some());
        assert!(errors.branch.is_none());

        let logrus = manifest.constraint("github.com/sirupsen/logrus").unwrap();
        assert_eq!(logrus.branch.as_deref(), Some("master"));

        assert!(manifest.override_for("github.com/pkg/errors").is_some());
        assert!(manifest.is_ignored("github.com/legacy/attic"));
        assert!(!manifest.is_ignored("github.com/pkg/errors"));
    }

    #[test]
    fn test_empty_manifest_is_valid() {
        let manifest = Manifest::parse("").unwrap();
        assert!(manifest.constraints.is_empty());
        assert!(manifest.overrides.is_empty());
    }

    #[test]
    fn test_syntax_error_carries_position() {
        let err = Manifest::parse("[[constraint]\nname = \"x\"").unwrap_err();
        match err {
            ManifestError::Syntax(e) => {
                assert!(e.to_string().contains("line 1"), "{}", e);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_conflicting_properties_rejected() {
        let content = r#"
[[constraint]]
name = "github.com/pkg/errors"
version = "^0.8.0"
branch = "master"
"#;
        let err = Manifest::parse(content).unwrap_err();
        assert!(matches!(
            err,
            ManifestError::ConflictingProperties { name } if name == "github.com/pkg/errors"
        ));
    }

    #[test]
    fn test_duplicate_constraint_rejected() {
        let content = r#"
[[constraint]]
name = "github.com/pkg/errors"

[[constraint]]
name = "github.com/pkg/errors"
"#;
        let err = Manifest::parse(content).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateConstraint { .. }));
    }

    #[test]
    fn test_invalid_version_requirement() {
        let content = r#"
[[constraint]]
name = "github.com/pkg/errors"
version = "not-a-range"
"#;
        let err = Manifest::parse(content).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidVersionReq { .. }));
    }

    #[test]
    fn test_invalid_source_url() {
        let content = r#"
[[constraint]]
name = "github.com/pkg/errors"
source = "not a url"
"#;
        let err = Manifest::parse(content).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidSource { .. }));
    }

    #[test]
    fn test_fingerprint_ignores_formatting_and_order() {
        let a = Manifest::parse(
            r#"
[[constraint]]
name = "github.com/a/a"
version = "^1.0"

[[constraint]]
name = "github.com/b/b"
branch = "main"
"#,
        )
        .unwrap();

        // Comments, spacing, and constraint order differ.
        let b = Manifest::parse(
            r#"
# pinned for the release train

[[constraint]]
name  = "github.com/b/b"
branch = "main"

[[constraint]]
name = "github.com/a/a"
version = "^1.0"
"#,
        )
        .unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = Manifest::parse(
            r#"
[[constraint]]
name = "github.com/a/a"
version = "^2.0"
"#,
        )
        .unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
