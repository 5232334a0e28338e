//! License-based project exclusion.
//!
//! The index and every collection page apply the same exclusion list, so both
//! go through a single [`LicenseFilter`].

use crate::model::Project;
use std::collections::HashSet;
use tracing::debug;

/// Drops projects carrying any excluded license identifier.
#[derive(Debug, Clone, Default)]
pub struct LicenseFilter {
    excluded: HashSet<String>,
}

impl LicenseFilter {
    /// Creates a filter from a list of license identifiers.
    #[must_use]
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `identifier` is on the exclusion list.
    #[must_use]
    pub fn excludes_license(&self, identifier: &str) -> bool {
        self.excluded.contains(identifier)
    }

    /// Returns true if the project must be left out of every page.
    #[must_use]
    pub fn is_excluded(&self, project: &Project) -> bool {
        project.has_any_license(&self.excluded)
    }

    /// Returns the projects that survive the filter, in input order.
    ///
    /// Each skipped project is logged at debug level.
    pub fn retain<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects
            .iter()
            .filter(|project| {
                if self.is_excluded(project) {
                    debug!(
                        "{} has a license listed in exclude_licenses, skipping",
                        project.name
                    );
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    /// Number of excluded projects in `projects`.
    #[must_use]
    pub fn count_excluded(&self, projects: &[Project]) -> usize {
        projects.iter().filter(|p| self.is_excluded(p)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects() -> Vec<Project> {
        vec![
            Project::new("Foo", "https://foo.example", ["MIT", "Proprietary"], ["Wikis"]),
            Project::new("Bar", "https://bar.example", ["GPL-3.0"], ["Wikis"]),
            Project::new("Baz", "https://baz.example", ["Apache-2.0"], ["Analytics"]),
        ]
    }

    #[test]
    fn test_excludes_on_any_matching_license() {
        let filter = LicenseFilter::new(["Proprietary"]);
        let all = projects();
        let kept: Vec<_> = filter.retain(&all).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(kept, vec!["Bar", "Baz"]);
    }

    #[test]
    fn test_unrelated_exclusion_keeps_project() {
        let filter = LicenseFilter::new(["BUSL-1.1"]);
        let all = projects();
        assert_eq!(filter.retain(&all).len(), 3);
        assert_eq!(filter.count_excluded(&all), 0);
    }

    #[test]
    fn test_gpl_exclusion() {
        let filter = LicenseFilter::new(vec!["GPL-3.0".to_string()]);
        let all = projects();
        assert!(!filter.is_excluded(&all[0]));
        assert!(filter.is_excluded(&all[1]));
        assert_eq!(filter.count_excluded(&all), 1);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = LicenseFilter::default();
        let all = projects();
        assert_eq!(filter.retain(&all).len(), all.len());
        assert!(!filter.excludes_license("MIT"));
    }
}
