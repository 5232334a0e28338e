//! Category and platform pages.
//!
//! A collection page is a header built from the label's own fields followed by
//! the fragments of every matching project. Category pages live in
//! `categories/` and platform pages in `platforms/`, so each kind links to its
//! own siblings with `./` and to the other kind with `../<other>/`.

use crate::{
    error::{Error, Result},
    filter::LicenseFilter,
    model::{Category, Named, Platform, Project},
    record::{LinkBases, RecordRenderer},
    slug,
    template::{self, TemplateEngine},
};
use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};
use tera::Context;
use tracing::debug;

/// Extension of every generated page.
pub const PAGE_EXTENSION: &str = "md";

/// Kind of collection page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Projects grouped by category (tag)
    Category,
    /// Projects grouped by platform
    Platform,
}

impl PageKind {
    /// Output subdirectory of this kind, relative to the pages root.
    #[must_use]
    pub const fn subdir(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Platform => "platforms",
        }
    }

    const fn header_template(self) -> &'static str {
        match self {
            Self::Category => template::CATEGORY_HEADER,
            Self::Platform => template::PLATFORM_HEADER,
        }
    }

    /// Field list placed before the header when the page lists projects.
    const fn preamble(self) -> &'static str {
        match self {
            Self::Category => "",
            Self::Platform => ":orphan:\n:nosearch:\n",
        }
    }

    /// Link bases for fragments rendered on a page of this kind.
    #[must_use]
    pub(crate) fn link_bases(self, extension: &str, index_page: &str) -> LinkBases {
        let (categories, platforms) = match self {
            Self::Category => ("./".to_string(), "../platforms/".to_string()),
            Self::Platform => ("../categories/".to_string(), "./".to_string()),
        };
        LinkBases {
            categories,
            platforms,
            licenses: format!("../{}.{extension}#list-of-licenses", page_stem(index_page)),
            extension: extension.to_string(),
        }
    }

    /// Page path of `name`, relative to the pages root.
    #[must_use]
    pub fn page_path(self, name: &str) -> PathBuf {
        PathBuf::from(self.subdir()).join(format!("{}.{PAGE_EXTENSION}", slug::normalize(name)))
    }
}

fn page_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category => write!(f, "category"),
            Self::Platform => write!(f, "platform"),
        }
    }
}

/// A label a collection page can be rendered for.
///
/// The kind of page is implied by the label type, so a page for an unknown
/// kind cannot be requested.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Label<'a> {
    /// A category
    Category(&'a Category),
    /// A platform
    Platform(&'a Platform),
}

impl Label<'_> {
    /// Kind of page this label produces.
    #[must_use]
    pub(crate) const fn kind(&self) -> PageKind {
        match self {
            Self::Category(_) => PageKind::Category,
            Self::Platform(_) => PageKind::Platform,
        }
    }

    /// Label name.
    #[must_use]
    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Category(c) => &c.name,
            Self::Platform(p) => &p.name,
        }
    }

    /// Returns true if `project` references this label by exact name.
    #[must_use]
    pub(crate) fn matches(&self, project: &Project) -> bool {
        match self {
            Self::Category(c) => project.tags.contains(&c.name),
            Self::Platform(p) => project
                .platforms
                .as_ref()
                .is_some_and(|platforms| platforms.contains(&p.name)),
        }
    }

    fn insert_into(&self, context: &mut Context) {
        match self {
            Self::Category(c) => context.insert("label", c),
            Self::Platform(p) => context.insert("label", p),
        }
    }
}

/// A rendered page and where it goes, relative to the pages root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Page {
    /// Path relative to the pages root
    pub(crate) path: PathBuf,
    /// Page text
    pub(crate) content: String,
}

/// Renders collection pages for categories and platforms.
pub(crate) struct CollectionPageRenderer<'e> {
    engine: &'e TemplateEngine,
    records: &'e RecordRenderer<'e>,
    filter: &'e LicenseFilter,
    link_extension: &'e str,
    index_page: &'e str,
}

impl<'e> CollectionPageRenderer<'e> {
    pub(crate) const fn new(
        engine: &'e TemplateEngine,
        records: &'e RecordRenderer<'e>,
        filter: &'e LicenseFilter,
        link_extension: &'e str,
        index_page: &'e str,
    ) -> Self {
        Self {
            engine,
            records,
            filter,
            link_extension,
            index_page,
        }
    }

    /// Renders the page of one label.
    ///
    /// Projects are kept in input order. A label no project references still
    /// gets a page holding only its header.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render or a matching project
    /// carries an invalid date.
    pub(crate) fn render(&self, label: Label<'_>, projects: &[Project]) -> Result<Page> {
        let kind = label.kind();
        debug!("Rendering page for {} {}", kind, label.name());

        let mut context = Context::new();
        label.insert_into(&mut context);
        let header = self.engine.render(kind.header_template(), &context)?;

        let bases = kind.link_bases(self.link_extension, self.index_page);
        let mut fragments = String::new();
        for project in self.filter.retain(projects) {
            if label.matches(project) {
                fragments.push_str(&self.records.render(project, &bases)?);
            }
        }

        let content = if fragments.is_empty() {
            header
        } else {
            let mut page = String::with_capacity(header.len() + fragments.len() + 512);
            page.push_str(kind.preamble());
            page.push_str(&header);
            page.push_str(&self.content_header(kind)?);
            page.push_str(&fragments);
            page
        };

        Ok(Page {
            path: kind.page_path(label.name()),
            content,
        })
    }

    fn content_header(&self, kind: PageKind) -> Result<String> {
        match kind {
            PageKind::Category => {
                let mut context = Context::new();
                context.insert("index_page", self.index_page);
                self.engine.render(template::CATEGORY_ENTRIES, &context)
            }
            PageKind::Platform => Ok(template::PLATFORM_ENTRIES_TEXT.to_string()),
        }
    }
}

/// Fails if a label has an empty slug or two labels normalize to the same slug.
///
/// Colliding labels would overwrite each other's page, and an empty slug would
/// produce a hidden `.md` file. A name listed twice counts as a collision too.
///
/// # Errors
///
/// Returns [`Error::EmptySlug`] or [`Error::SlugCollision`] for the first
/// offending label.
pub fn ensure_unique_slugs<T: Named>(kind: PageKind, labels: &[T]) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(labels.len());
    for label in labels {
        let name = label.name();
        let slug = slug::normalize(name);
        if slug.is_empty() {
            return Err(Error::EmptySlug {
                kind: kind.to_string(),
                name: name.to_string(),
            });
        }
        if let Some(first) = seen.get(&slug) {
            return Err(Error::SlugCollision {
                kind: kind.to_string(),
                slug,
                first: (*first).to_string(),
                second: name.to_string(),
            });
        }
        seen.insert(slug, name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Link;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn projects() -> Vec<Project> {
        let mut foo = Project::new("Foo", "https://foo.example", ["MIT"], ["Wikis"]);
        foo.platforms = Some(["Python"].into());
        let mut bar = Project::new("Bar", "https://bar.example", ["GPL-3.0"], ["Wikis", "Analytics"]);
        bar.platforms = Some(["Go"].into());
        let secret = Project::new("Secret", "https://secret.example", ["MIT", "Proprietary"], ["Wikis"]);
        vec![foo, bar, secret]
    }

    fn render_with(label: Label<'_>, projects: &[Project], excluded: &[&str]) -> Page {
        let engine = TemplateEngine::new().unwrap();
        let records = RecordRenderer::new(&engine, today());
        let filter = LicenseFilter::new(excluded.iter().copied());
        CollectionPageRenderer::new(&engine, &records, &filter, "html", "index.md")
            .render(label, projects)
            .unwrap()
    }

    #[test]
    fn test_category_page_lists_matching_projects_in_order() {
        let wikis = Category::new("Wikis", "Wiki software.");
        let page = render_with(Label::Category(&wikis), &projects(), &[]);

        assert_eq!(page.path, PathBuf::from("categories/wikis.md"));
        assert!(page.content.contains("# Wikis"));
        assert!(page.content.contains("## Software"));
        assert!(page.content.contains("[index of all projects](../index.md)"));
        let foo = page.content.find("### Foo").unwrap();
        let bar = page.content.find("### Bar").unwrap();
        assert!(foo < bar);
    }

    #[test]
    fn test_excluded_license_is_skipped() {
        let wikis = Category::new("Wikis", "Wiki software.");

        let page = render_with(Label::Category(&wikis), &projects(), &["Proprietary"]);
        assert!(!page.content.contains("### Secret"));

        let page = render_with(Label::Category(&wikis), &projects(), &["GPL-3.0"]);
        assert!(page.content.contains("### Secret"));
        assert!(!page.content.contains("### Bar"));
    }

    #[test]
    fn test_category_page_link_bases() {
        let wikis = Category::new("Wikis", "Wiki software.");
        let page = render_with(Label::Category(&wikis), &projects(), &[]);

        assert!(page.content.contains("<a href=\"./wikis.html\">"));
        assert!(page.content.contains("<a href=\"./analytics.html\">"));
        assert!(page.content.contains("<a href=\"../platforms/python.html\">"));
        assert!(page.content.contains("href=\"../index.html#list-of-licenses\""));
    }

    #[test]
    fn test_platform_page_link_bases() {
        let python = Platform::new("Python", "The Python language.");
        let page = render_with(Label::Platform(&python), &projects(), &[]);

        assert_eq!(page.path, PathBuf::from("platforms/python.md"));
        assert!(page.content.starts_with(":orphan:\n:nosearch:\n"));
        assert!(page.content.contains("### Foo"));
        assert!(!page.content.contains("### Bar"));
        assert!(page.content.contains("<a href=\"./python.html\">"));
        assert!(page.content.contains("<a href=\"../categories/wikis.html\">"));
        assert!(page.content.contains("deployment platform"));
    }

    #[test]
    fn test_empty_page_has_only_header() {
        let empty = Category::new("Games", "Game servers.");
        let page = render_with(Label::Category(&empty), &projects(), &[]);

        assert_eq!(page.path, PathBuf::from("categories/games.md"));
        assert!(page.content.contains("# Games"));
        assert!(page.content.contains("Game servers."));
        assert!(!page.content.contains("## Software"));
        assert!(!page.content.contains("###"));
    }

    #[test]
    fn test_empty_platform_page_has_no_preamble() {
        let rust = Platform::new("Rust", "The Rust language.");
        let page = render_with(Label::Platform(&rust), &projects(), &[]);
        assert!(!page.content.contains(":orphan:"));
        assert!(page.content.contains("# Rust"));
    }

    #[test]
    fn test_redirect_notice() {
        let mut old = Category::new("Old Wikis", "Deprecated.");
        old.redirect = Some(vec![Link {
            title: "Wikis".to_string(),
            url: "wikis.html".to_string(),
        }]);
        let page = render_with(Label::Category(&old), &projects(), &[]);
        assert!(page.content.contains("**Please visit [Wikis](wikis.html) instead**"));
    }

    #[test]
    fn test_link_bases_follow_index_name() {
        let bases = PageKind::Platform.link_bases("html", "all.md");
        assert_eq!(bases.licenses, "../all.html#list-of-licenses");
        assert_eq!(bases.categories, "../categories/");
        assert_eq!(bases.platforms, "./");
    }

    #[test]
    fn test_unique_slugs() {
        let ok = vec![Category::new("Wikis", ""), Category::new("Analytics", "")];
        assert!(ensure_unique_slugs(PageKind::Category, &ok).is_ok());

        let clash = vec![Platform::new("C/C++", ""), Platform::new("C C", "")];
        let err = ensure_unique_slugs(PageKind::Platform, &clash).unwrap_err();
        assert!(matches!(err, Error::SlugCollision { ref slug, .. } if slug == "c-c"));
    }

    #[test]
    fn test_name_without_alphanumerics_is_rejected() {
        for name in ["⊘", "---", ""] {
            let labels = vec![Category::new("Wikis", ""), Category::new(name, "")];
            let err = ensure_unique_slugs(PageKind::Category, &labels).unwrap_err();
            assert!(
                matches!(err, Error::EmptySlug { name: ref found, .. } if found == name),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn test_duplicate_name_is_a_collision() {
        let dup = vec![Category::new("Wikis", ""), Category::new("Wikis", "")];
        assert!(ensure_unique_slugs(PageKind::Category, &dup).is_err());
    }

    #[test]
    fn test_label_matching_is_exact() {
        let wikis = Category::new("wikis", "");
        let project = Project::new("Foo", "https://foo.example", ["MIT"], ["Wikis"]);
        assert!(!Label::Category(&wikis).matches(&project));

        let python = Platform::new("Python", "");
        assert!(!Label::Platform(&python).matches(&project));
    }
}
