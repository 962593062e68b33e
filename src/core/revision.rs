//! Version-control revision descriptors.
//!
//! A checked-out dependency is always at some exact commit; that commit
//! may additionally coincide with a tag or sit at the tip of a branch.
//! The type is a closed sum so every consumer matches exhaustively.

use std::fmt;

use semver::Version;

/// The version-control state of a checked-out directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Revision {
    /// An exact commit with no symbolic name attached.
    Plain {
        /// Commit identifier (full object name).
        id: String,
    },
    /// A tag pointing at a commit.
    Tag {
        /// Tag name as written, e.g. `v1.2.3`.
        name: String,
        /// Commit the tag resolves to.
        id: String,
    },
    /// A branch whose tip is the commit.
    Branch {
        /// Branch name, e.g. `feature-x`.
        name: String,
        /// Commit at the branch tip.
        id: String,
    },
}

impl Revision {
    /// A bare commit.
    pub fn plain(id: impl Into<String>) -> Self {
        Revision::Plain { id: id.into() }
    }

    /// A tag paired with the commit it resolves to.
    pub fn tag(name: impl Into<String>, id: impl Into<String>) -> Self {
        Revision::Tag {
            name: name.into(),
            id: id.into(),
        }
    }

    /// A branch paired with the commit at its tip.
    pub fn branch(name: impl Into<String>, id: impl Into<String>) -> Self {
        Revision::Branch {
            name: name.into(),
            id: id.into(),
        }
    }

    /// The exact commit identifier, whatever the variant.
    pub fn id(&self) -> &str {
        match self {
            Revision::Plain { id } => id,
            Revision::Tag { id, .. } => id,
            Revision::Branch { id, .. } => id,
        }
    }

    /// The symbolic name paired with the commit, if any.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Revision::Plain { .. } => None,
            Revision::Tag { name, .. } => Some(name),
            Revision::Branch { name, .. } => Some(name),
        }
    }

    /// Parse a tag name as a semantic version.
    ///
    /// A leading `v` is tolerated (`v1.2.3` and `1.2.3` both qualify).
    /// Branches and bare commits never carry a semantic version.
    pub fn semver(&self) -> Option<Version> {
        match self {
            Revision::Tag { name, .. } => {
                name.strip_prefix('v').unwrap_or(name).parse().ok()
            }
            Revision::Plain { .. } | Revision::Branch { .. } => None,
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Plain { id } => write!(f, "{}", id),
            Revision::Tag { name, .. } => write!(f, "{}", name),
            Revision::Branch { name, .. } => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "645ef00459ed84a119197bfb8d8205042c6df63d";

    #[test]
    fn test_id_and_symbol() {
        assert_eq!(Revision::plain(ID).id(), ID);
        assert_eq!(Revision::plain(ID).symbol(), None);

        let tag = Revision::tag("v0.8.0", ID);
        assert_eq!(tag.id(), ID);
        assert_eq!(tag.symbol(), Some("v0.8.0"));

        let branch = Revision::branch("feature-x", ID);
        assert_eq!(branch.symbol(), Some("feature-x"));
    }

    #[test]
    fn test_semver_classification() {
        assert_eq!(
            Revision::tag("v1.2.3", ID).semver(),
            Some(Version::new(1, 2, 3))
        );
        assert_eq!(
            Revision::tag("1.2.3", ID).semver(),
            Some(Version::new(1, 2, 3))
        );
        assert_eq!(Revision::tag("release-candidate", ID).semver(), None);
        assert_eq!(Revision::branch("v1.2.3", ID).semver(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Revision::plain(ID).to_string(), ID);
        assert_eq!(Revision::tag("v0.8.0", ID).to_string(), "v0.8.0");
        assert_eq!(Revision::branch("main", ID).to_string(), "main");
    }
}
