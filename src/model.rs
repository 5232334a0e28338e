//! In-memory records loaded from the source directory.
//!
//! All records are read once at startup and never mutated. Optional fields are
//! `Option`s: a field missing from the YAML file is `None`, never an empty
//! placeholder.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A record that can be looked up and sorted by its display name.
pub trait Named {
    /// Display name of the record.
    fn name(&self) -> &str;
}

/// An ordered list of label names with constant-time membership tests.
///
/// Order is kept for rendering badges; the set answers "does this project
/// belong to label X" without caring where X sits in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl LabelSet {
    /// Returns true if `name` is one of the labels (exact string match).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    /// Iterates over labels in their original order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns true if there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(ordered: Vec<String>) -> Self {
        let members = ordered.iter().cloned().collect();
        Self { ordered, members }
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(set: LabelSet) -> Self {
        set.ordered
    }
}

impl<const N: usize> From<[&str; N]> for LabelSet {
    fn from(names: [&str; N]) -> Self {
        names.iter().map(|s| (*s).to_string()).collect::<Vec<_>>().into()
    }
}

/// A software project entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project name
    pub name: String,

    /// One-line description
    #[serde(default)]
    pub description: String,

    /// Homepage
    pub website_url: String,

    /// Source code repository
    pub source_code_url: Option<String>,

    /// Live demo
    pub demo_url: Option<String>,

    /// Clients or companion software
    pub related_software_url: Option<String>,

    /// License identifiers
    pub licenses: LabelSet,

    /// Category names
    pub tags: LabelSet,

    /// Platform names
    pub platforms: Option<LabelSet>,

    /// Whether the project depends on a third-party service
    pub depends_3rdparty: Option<bool>,

    /// Last update date, `YYYY-MM-DD`
    pub updated_at: Option<String>,
}

impl Project {
    /// Creates a project with only the required fields set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        website_url: impl Into<String>,
        licenses: impl Into<LabelSet>,
        tags: impl Into<LabelSet>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            website_url: website_url.into(),
            source_code_url: None,
            demo_url: None,
            related_software_url: None,
            licenses: licenses.into(),
            tags: tags.into(),
            platforms: None,
            depends_3rdparty: None,
            updated_at: None,
        }
    }

    /// Returns true if any of the project's licenses is in `excluded`.
    #[must_use]
    pub fn has_any_license(&self, excluded: &HashSet<String>) -> bool {
        self.licenses.iter().any(|license| excluded.contains(license))
    }

    /// Returns true if the project depends on a third-party service.
    #[must_use]
    pub fn depends_on_third_party(&self) -> bool {
        self.depends_3rdparty.unwrap_or(false)
    }
}

impl Named for Project {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A titled external link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Link text
    pub title: String,
    /// Target URL
    pub url: String,
}

/// A category (tag) grouping projects by purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name
    pub name: String,

    /// Category description
    #[serde(default)]
    pub description: String,

    /// Names of related categories
    pub related_tags: Option<Vec<String>>,

    /// "See also" links
    pub external_links: Option<Vec<Link>>,

    /// Replacement pages when this category is deprecated
    pub redirect: Option<Vec<Link>>,
}

impl Category {
    /// Creates a category with only a name and description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            related_tags: None,
            external_links: None,
            redirect: None,
        }
    }
}

impl Named for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A platform (language or deployment target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Platform name
    pub name: String,

    /// Platform description
    #[serde(default)]
    pub description: String,
}

impl Platform {
    /// Creates a platform.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl Named for Platform {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A license entry from the licenses list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// SPDX-style identifier, e.g. `MIT`
    pub identifier: String,
    /// Full name
    pub name: String,
    /// License text URL
    pub url: String,
}
