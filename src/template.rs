use crate::{
    error::{Error, Result},
    slug,
};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use tera::{Context, Tera, Value};
use tracing::trace;

/// Project fragment.
pub(crate) const RECORD: &str = "record.md";
/// Category page header.
pub(crate) const CATEGORY_HEADER: &str = "category_header.md";
/// Platform page header.
pub(crate) const PLATFORM_HEADER: &str = "platform_header.md";
/// Intro placed above the project list on category pages.
pub(crate) const CATEGORY_ENTRIES: &str = "category_entries.md";
/// Licenses summary block at the bottom of the index.
pub(crate) const LICENSES: &str = "licenses.md";

/// Intro placed above the project list on the index.
pub(crate) const INDEX_ENTRIES_TEXT: &str = include_str!("../templates/index_entries.md");
/// Intro placed above the project list on platform pages.
pub(crate) const PLATFORM_ENTRIES_TEXT: &str = include_str!("../templates/platform_entries.md");
/// Stylesheet copied to the assets directory.
pub(crate) const STYLESHEET: &str = include_str!("../templates/custom.css");

static ENGINE: OnceCell<TemplateEngine> = OnceCell::new();

/// Template engine holding every built-in page template.
pub(crate) struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Returns the process-wide engine, compiling the templates on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in template fails to compile.
    pub(crate) fn global() -> Result<&'static Self> {
        ENGINE.get_or_try_init(Self::new)
    }

    /// Creates a new template engine.
    ///
    /// # Errors
    ///
    /// Returns an error if template registration fails.
    pub(crate) fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Register built-in templates
        Self::register_builtin_templates(&mut tera)?;

        // Register custom filters
        Self::register_filters(&mut tera);

        Ok(Self { tera })
    }

    /// Registers built-in templates.
    fn register_builtin_templates(tera: &mut Tera) -> Result<()> {
        let templates = [
            (RECORD, include_str!("../templates/record.md.tera")),
            (CATEGORY_HEADER, include_str!("../templates/category_header.md.tera")),
            (PLATFORM_HEADER, include_str!("../templates/platform_header.md.tera")),
            (CATEGORY_ENTRIES, include_str!("../templates/category_entries.md.tera")),
            (LICENSES, include_str!("../templates/licenses.md.tera")),
        ];

        for (name, source) in templates {
            tera.add_raw_template(name, source)
                .map_err(|e| Error::template(name, &e))?;
        }

        Ok(())
    }

    /// Registers custom Tera filters.
    fn register_filters(tera: &mut Tera) {
        tera.register_filter("slug", Self::slug_filter);
    }

    /// Slug filter implementation.
    fn slug_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        value.as_str().map_or_else(
            || Err(tera::Error::msg(format!("slug filter expects a string, got {value}"))),
            |s| Ok(Value::String(slug::normalize(s))),
        )
    }

    /// Renders a named template.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub(crate) fn render(&self, template: &str, context: &Context) -> Result<String> {
        trace!("Rendering template {}", template);
        self.tera
            .render(template, context)
            .map_err(|e| Error::template(template, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, License, Link};

    #[test]
    fn test_template_engine_creation() {
        assert!(TemplateEngine::new().is_ok());
    }

    #[test]
    fn test_global_engine_is_shared() {
        let a = TemplateEngine::global().unwrap();
        let b = TemplateEngine::global().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_slug_filter() {
        let value = Value::String("Note-taking & Editors".to_string());
        let result = TemplateEngine::slug_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(result.as_str().unwrap(), "note-taking-editors");
    }

    #[test]
    fn test_slug_filter_rejects_non_string() {
        let value = Value::Bool(true);
        assert!(TemplateEngine::slug_filter(&value, &HashMap::new()).is_err());
    }

    #[test]
    fn test_category_header_blocks() {
        let engine = TemplateEngine::new().unwrap();
        let mut category = Category::new("Wikis", "Wiki software.");
        category.related_tags = Some(vec!["Note-taking & Editors".to_string()]);
        category.external_links = Some(vec![Link {
            title: "awesome-wikis".to_string(),
            url: "https://example.org/awesome-wikis".to_string(),
        }]);
        category.redirect = Some(vec![
            Link {
                title: "Knowledge Bases".to_string(),
                url: "knowledge-bases.html".to_string(),
            },
            Link {
                title: "Note-taking".to_string(),
                url: "note-taking.html".to_string(),
            },
        ]);

        let mut context = Context::new();
        context.insert("label", &category);
        let rendered = engine.render(CATEGORY_HEADER, &context).unwrap();

        assert!(rendered.contains("# Wikis"));
        assert!(rendered.contains("Wiki software."));
        assert!(rendered.contains("- [Note-taking & Editors](note-taking-editors.md)"));
        assert!(rendered.contains("```{seealso}"));
        assert!(rendered.contains("- [awesome-wikis](https://example.org/awesome-wikis)"));
        assert!(rendered.contains(
            "**Please visit [Knowledge Bases](knowledge-bases.html), [Note-taking](note-taking.html) instead**"
        ));
    }

    #[test]
    fn test_category_header_without_optional_blocks() {
        let engine = TemplateEngine::new().unwrap();
        let mut context = Context::new();
        context.insert("label", &Category::new("Wikis", "Wiki software."));
        let rendered = engine.render(CATEGORY_HEADER, &context).unwrap();

        assert!(rendered.contains("# Wikis"));
        assert!(!rendered.contains("```"));
    }

    #[test]
    fn test_render_licenses() {
        let engine = TemplateEngine::new().unwrap();
        let licenses = vec![License {
            identifier: "MIT".to_string(),
            name: "MIT License".to_string(),
            url: "https://spdx.org/licenses/MIT.html".to_string(),
        }];
        let mut context = Context::new();
        context.insert("licenses", &licenses);
        let rendered = engine.render(LICENSES, &context).unwrap();

        assert!(rendered.contains("## List of Licenses"));
        assert!(rendered.contains("- `MIT` - [MIT License](https://spdx.org/licenses/MIT.html)"));
    }

    #[test]
    fn test_unknown_template() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine.render("missing.md", &Context::new()).unwrap_err();
        assert!(err.to_string().contains("missing.md"));
    }
}
