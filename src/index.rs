//! The root page listing every project.

use crate::{
    error::Result,
    filter::LicenseFilter,
    model::{Category, License, Project},
    page::PageKind,
    record::{LinkBases, RecordRenderer},
    template::{self, TemplateEngine},
};
use tera::Context;
use tracing::debug;

/// Field list limiting the table of contents depth of the index.
const TOC_DEPTH_DIRECTIVE: &str = ":tocdepth: 2\n";

/// Everything the index is assembled from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexInputs<'a> {
    /// Categories, in navigation order
    pub(crate) categories: &'a [Category],
    /// All projects, in listing order
    pub(crate) projects: &'a [Project],
    /// Full, unfiltered license list
    pub(crate) licenses: &'a [License],
    /// Text placed after the depth directive
    pub(crate) header: &'a str,
    /// Text placed at the very end
    pub(crate) footer: &'a str,
}

/// Builds the root index page.
pub(crate) struct IndexAssembler<'e> {
    engine: &'e TemplateEngine,
    records: &'e RecordRenderer<'e>,
    filter: &'e LicenseFilter,
    link_extension: &'e str,
}

impl<'e> IndexAssembler<'e> {
    pub(crate) const fn new(
        engine: &'e TemplateEngine,
        records: &'e RecordRenderer<'e>,
        filter: &'e LicenseFilter,
        link_extension: &'e str,
    ) -> Self {
        Self {
            engine,
            records,
            filter,
            link_extension,
        }
    }

    /// Assembles the index text.
    ///
    /// Sections, in order: depth directive, header, entries intro, navigation
    /// manifest, project fragments, licenses summary, footer.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render or a project carries an
    /// invalid date.
    pub(crate) fn render(&self, inputs: &IndexInputs<'_>) -> Result<String> {
        let mut index = String::new();
        index.push_str(TOC_DEPTH_DIRECTIVE);
        index.push_str(inputs.header);
        index.push_str(template::INDEX_ENTRIES_TEXT);
        index.push_str(&navigation_manifest(inputs.categories));

        let bases = LinkBases::root(self.link_extension);
        for project in self.filter.retain(inputs.projects) {
            index.push_str(&self.records.render(project, &bases)?);
        }

        index.push_str(&self.render_licenses(inputs.licenses)?);
        index.push_str(inputs.footer);
        Ok(index)
    }

    /// Renders the licenses summary, leaving out excluded identifiers.
    fn render_licenses(&self, licenses: &[License]) -> Result<String> {
        let listed: Vec<&License> = licenses
            .iter()
            .filter(|license| {
                let excluded = self.filter.excludes_license(&license.identifier);
                if excluded {
                    debug!("License {} is in exclude_licenses, skipping", license.identifier);
                }
                !excluded
            })
            .collect();

        let mut context = Context::new();
        context.insert("licenses", &listed);
        self.engine.render(template::LICENSES, &context)
    }
}

/// Hidden toctree listing every category page, in input order.
#[must_use]
pub fn navigation_manifest(categories: &[Category]) -> String {
    debug!("Rendering navigation manifest for {} categories", categories.len());
    let mut manifest = String::from("\n```{toctree}\n:maxdepth: 1\n:hidden:\n");
    for category in categories {
        let path = PageKind::Category.page_path(&category.name);
        manifest.push_str(&path.to_string_lossy().replace('\\', "/"));
        manifest.push('\n');
    }
    manifest.push_str("```\n\n");
    manifest
}
