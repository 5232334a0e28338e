use crate::{
    config::Config,
    error::Result,
    filter::LicenseFilter,
    index::{IndexAssembler, IndexInputs},
    loader::{self, SortOrder, SourceLayout},
    model::{Category, License, Platform, Project},
    page::{self, CollectionPageRenderer, Label, Page, PageKind},
    record::RecordRenderer,
    template::{self, TemplateEngine},
    writer::Writer,
};
use serde::Serialize;
use std::{
    collections::HashSet,
    path::Path,
    time::{Duration, Instant},
};
use tracing::{info, instrument, warn};

/// Statistics collected during pipeline execution.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    /// Number of categories loaded
    pub categories: usize,

    /// Number of platforms loaded
    pub platforms: usize,

    /// Number of projects loaded
    pub projects: usize,

    /// Projects left out because of their license
    pub excluded_projects: usize,

    /// Pages rendered (index + categories + platforms)
    pub pages_rendered: usize,

    /// Files written, including the stylesheet
    pub files_written: usize,

    /// Total execution time
    pub duration: Duration,

    /// Output directory path
    pub output_directory: String,
}

impl PipelineStats {
    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║            Site Generation Summary                    ║");
        println!("╠═══════════════════════════════════════════════════════╣");
        println!("║ Categories:           {:>8}                        ║", self.categories);
        println!("║ Platforms:            {:>8}                        ║", self.platforms);
        println!("║ Projects:             {:>8}                        ║", self.projects);
        println!("║   - Excluded:         {:>8}                        ║", self.excluded_projects);
        println!("║                                                       ║");
        println!("║ Pages Rendered:       {:>8}                        ║", self.pages_rendered);
        println!("║ Files Written:        {:>8}                        ║", self.files_written);
        println!("║ Output Directory:                                     ║");
        println!("║   {}", self.output_directory);
        println!(
            "║ Total Time:           {:>8.2}s                     ║",
            self.duration.as_secs_f64()
        );
        println!("╚═══════════════════════════════════════════════════════╝\n");
    }
}

/// Records loaded from the source directory.
struct SourceData {
    categories: Vec<Category>,
    platforms: Vec<Platform>,
    projects: Vec<Project>,
    licenses: Vec<License>,
    header: String,
    footer: String,
}

/// Main pipeline orchestrator turning source records into a markdown site.
pub struct Pipeline {
    config: Config,
    source: SourceLayout,
    writer: Writer,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let source = SourceLayout::new(&config.source_dir);
        let writer = Writer::new(&config.output_dir);

        Ok(Self {
            config,
            source,
            writer,
        })
    }

    /// Executes the complete pipeline and returns statistics.
    ///
    /// # Process
    ///
    /// 1. **Load**: categories and platforms sorted by name, projects in file order,
    ///    licenses, header and footer
    /// 2. **Index**: renders and writes the root page
    /// 3. **Pages**: renders and writes one page per category, then per platform
    /// 4. **Assets**: writes the stylesheet
    ///
    /// # Errors
    ///
    /// Returns an error on the first failure; nothing is retried.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use selfhosted_pages::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .source_dir("./awesome-selfhosted-data")
    ///     .output_dir("./site")
    ///     .build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// stats.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(source_dir = %self.config.source_dir.display()))]
    pub fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();

        info!("Stage 1/4: Loading records...");
        let data = self.load()?;
        info!(
            "✓ Loaded {} categories, {} platforms, {} projects, {} licenses",
            data.categories.len(),
            data.platforms.len(),
            data.projects.len(),
            data.licenses.len()
        );

        page::ensure_unique_slugs(PageKind::Category, &data.categories)?;
        page::ensure_unique_slugs(PageKind::Platform, &data.platforms)?;
        warn_unknown_labels(&data);

        let engine = TemplateEngine::global()?;
        let records = RecordRenderer::new(engine, self.config.today);
        let filter = LicenseFilter::new(self.config.exclude_licenses.iter().cloned());
        let excluded_projects = filter.count_excluded(&data.projects);

        if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
        } else {
            self.writer.ensure_dirs()?;
        }

        let mut pages_rendered = 0;
        let mut files_written = 0;

        info!("Stage 2/4: Rendering index...");
        let index = IndexAssembler::new(engine, &records, &filter, &self.config.link_extension)
            .render(&IndexInputs {
                categories: &data.categories,
                projects: &data.projects,
                licenses: &data.licenses,
                header: &data.header,
                footer: &data.footer,
            })?;
        pages_rendered += 1;
        if !self.config.dry_run {
            let path = self
                .writer
                .write_page(Path::new(&self.config.output_file), &index)?;
            info!("Wrote index {}", path.display());
            files_written += 1;
        }

        info!("Stage 3/4: Rendering category and platform pages...");
        let pages = CollectionPageRenderer::new(
            engine,
            &records,
            &filter,
            &self.config.link_extension,
            &self.config.output_file,
        );
        let labels = data
            .categories
            .iter()
            .map(Label::Category)
            .chain(data.platforms.iter().map(Label::Platform));
        for label in labels {
            let page = pages.render(label, &data.projects)?;
            pages_rendered += 1;
            files_written += self.emit(&page)?;
        }

        info!("Stage 4/4: Writing assets...");
        if !self.config.dry_run {
            self.writer.write_stylesheet(template::STYLESHEET)?;
            files_written += 1;
        }

        let stats = PipelineStats {
            categories: data.categories.len(),
            platforms: data.platforms.len(),
            projects: data.projects.len(),
            excluded_projects,
            pages_rendered,
            files_written,
            duration: start_time.elapsed(),
            output_directory: self.config.output_dir.display().to_string(),
        };

        info!(
            "✓ Pipeline completed successfully in {:.2}s",
            stats.duration.as_secs_f64()
        );

        Ok(stats)
    }

    /// Loads every input. Any missing input aborts the run.
    fn load(&self) -> Result<SourceData> {
        Ok(SourceData {
            categories: loader::load_records(&self.source.categories_dir(), SortOrder::ByName)?,
            platforms: loader::load_records(&self.source.platforms_dir(), SortOrder::ByName)?,
            projects: loader::load_records(&self.source.projects_dir(), SortOrder::FileOrder)?,
            licenses: loader::load_licenses(&self.source.licenses_file())?,
            header: loader::read_text(&self.source.header_file())?,
            footer: loader::read_text(&self.source.footer_file())?,
        })
    }

    /// Writes a collection page unless in dry run mode; returns files written.
    fn emit(&self, page: &Page) -> Result<usize> {
        if self.config.dry_run {
            return Ok(0);
        }
        self.writer.write_page(&page.path, &page.content)?;
        Ok(1)
    }
}

/// Warns about projects referencing labels that have no record.
///
/// Their badges link to pages that will not exist.
fn warn_unknown_labels(data: &SourceData) {
    let categories: HashSet<&str> = data.categories.iter().map(|c| c.name.as_str()).collect();
    let platforms: HashSet<&str> = data.platforms.iter().map(|p| p.name.as_str()).collect();

    for project in &data.projects {
        for tag in project.tags.iter().filter(|t| !categories.contains(t)) {
            warn!("{} references unknown category '{}'", project.name, tag);
        }
        for platform in project
            .platforms
            .iter()
            .flat_map(|p| p.iter())
            .filter(|p| !platforms.contains(p))
        {
            warn!("{} references unknown platform '{}'", project.name, platform);
        }
    }
}
