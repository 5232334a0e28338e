//! Rendering of a single project into a self-contained markdown fragment.

use crate::{
    error::{Error, Result},
    model::Project,
    slug,
    template::{self, TemplateEngine},
};
use chrono::NaiveDate;
use serde::Serialize;
use tera::Context;

/// Age at which the last-update badge turns into a warning.
pub const WARNING_AGE_DAYS: i64 = 186;
/// Age at which the last-update badge turns into an alert.
pub const ALERT_AGE_DAYS: i64 = 365;

/// Classification of how recently a project was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AgeBadge {
    /// Updated within the warning window
    Fresh,
    /// At least [`WARNING_AGE_DAYS`] old
    Warning,
    /// At least [`ALERT_AGE_DAYS`] old
    Alert,
}

impl AgeBadge {
    /// Classifies an update date relative to `today`.
    #[must_use]
    pub(crate) fn classify(updated_at: NaiveDate, today: NaiveDate) -> Self {
        let age = (today - updated_at).num_days();
        if age >= ALERT_AGE_DAYS {
            Self::Alert
        } else if age >= WARNING_AGE_DAYS {
            Self::Warning
        } else {
            Self::Fresh
        }
    }

    /// CSS class of the badge.
    #[must_use]
    pub(crate) const fn css_class(self) -> &'static str {
        match self {
            Self::Fresh => "updated-at",
            Self::Warning => "orangebox",
            Self::Alert => "redbox",
        }
    }
}

/// Relative URL prefixes used by badges, which depend on where the page lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LinkBases {
    /// Prefix of category page links
    pub(crate) categories: String,
    /// Prefix of platform page links
    pub(crate) platforms: String,
    /// Target of every license badge
    pub(crate) licenses: String,
    /// Extension of rendered pages (without the dot)
    pub(crate) extension: String,
}

impl LinkBases {
    /// Link bases for the root index page.
    #[must_use]
    pub(crate) fn root(extension: &str) -> Self {
        Self {
            categories: "categories/".to_string(),
            platforms: "platforms/".to_string(),
            licenses: "#list-of-licenses".to_string(),
            extension: extension.to_string(),
        }
    }

    /// Slugs may keep non-ASCII letters, so they are percent-encoded here.
    fn href(&self, base: &str, name: &str) -> String {
        let slug = slug::normalize(name);
        format!("{base}{}.{}", urlencoding::encode(&slug), self.extension)
    }

    /// Link to the page of category `name`.
    #[must_use]
    pub(crate) fn category_href(&self, name: &str) -> String {
        self.href(&self.categories, name)
    }

    /// Link to the page of platform `name`.
    #[must_use]
    pub(crate) fn platform_href(&self, name: &str) -> String {
        self.href(&self.platforms, name)
    }
}

#[derive(Serialize)]
struct BadgeLink<'a> {
    name: &'a str,
    href: String,
}

#[derive(Serialize)]
struct AgeView<'a> {
    class: &'static str,
    date: &'a str,
}

#[derive(Serialize)]
struct RecordView<'a> {
    name: &'a str,
    description: &'a str,
    website_url: &'a str,
    source_code_url: Option<&'a str>,
    related_software_url: Option<&'a str>,
    demo_url: Option<&'a str>,
    platforms: Vec<BadgeLink<'a>>,
    licenses: Vec<&'a str>,
    licenses_url: &'a str,
    age: Option<AgeView<'a>>,
    anti_features: bool,
    tags: Vec<BadgeLink<'a>>,
}

/// Renders project fragments.
pub(crate) struct RecordRenderer<'e> {
    engine: &'e TemplateEngine,
    today: NaiveDate,
}

impl<'e> RecordRenderer<'e> {
    pub(crate) const fn new(engine: &'e TemplateEngine, today: NaiveDate) -> Self {
        Self { engine, today }
    }

    /// Renders one project with links relative to `bases`.
    ///
    /// # Errors
    ///
    /// Returns an error if `updated_at` is not a valid `YYYY-MM-DD` date or the
    /// template fails to render.
    pub(crate) fn render(&self, project: &Project, bases: &LinkBases) -> Result<String> {
        let age = project
            .updated_at
            .as_deref()
            .map(|raw| {
                let date = parse_date(&project.name, raw)?;
                Ok::<_, Error>(AgeView {
                    class: AgeBadge::classify(date, self.today).css_class(),
                    date: raw,
                })
            })
            .transpose()?;

        let view = RecordView {
            name: &project.name,
            description: &project.description,
            website_url: &project.website_url,
            source_code_url: project.source_code_url.as_deref(),
            related_software_url: project.related_software_url.as_deref(),
            demo_url: project.demo_url.as_deref(),
            platforms: project
                .platforms
                .iter()
                .flat_map(|platforms| platforms.iter())
                .map(|name| BadgeLink {
                    name,
                    href: bases.platform_href(name),
                })
                .collect(),
            licenses: project.licenses.iter().collect(),
            licenses_url: &bases.licenses,
            age,
            anti_features: project.depends_on_third_party(),
            tags: project
                .tags
                .iter()
                .map(|name| BadgeLink {
                    name,
                    href: bases.category_href(name),
                })
                .collect(),
        };

        let mut context = Context::new();
        context.insert("record", &view);
        self.engine.render(template::RECORD, &context)
    }
}

fn parse_date(project: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        project: project.to_string(),
        value: raw.to_string(),
    })
}
