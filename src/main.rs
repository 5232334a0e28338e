use anyhow::Context;
use clap::Parser;
use selfhosted_pages::{Config, ConfigBuilder, Pipeline};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "selfhosted-pages",
    version,
    author,
    about = "Render software records into a multi-page markdown site",
    long_about = "Render a directory of YAML records (software projects, categories, platforms, \
    licenses) into cross-linked markdown pages for a static site builder.\n\n\
    USAGE EXAMPLES:\n  \
      # Render from explicit directories\n  \
      selfhosted-pages --source ./awesome-selfhosted-data --output ./site\n\n  \
      # Render from an options file, leaving out non-free licenses\n  \
      selfhosted-pages --config ./options.yml --exclude-license BUSL-1.1"
)]
struct Cli {
    /// YAML file with source_directory, output_directory, exclude_licenses, output_file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding tags/, platforms/, software/, licenses.yml and markdown/
    #[arg(short, long, value_name = "PATH", required_unless_present = "config")]
    source: Option<PathBuf>,

    /// Directory the site is written to
    #[arg(short, long, value_name = "PATH", required_unless_present = "config")]
    output: Option<PathBuf>,

    /// Leave out projects with this license (can be used multiple times)
    #[arg(long = "exclude-license", value_name = "ID")]
    exclude_licenses: Vec<String>,

    /// File name of the root index page
    #[arg(long, value_name = "NAME")]
    output_file: Option<String>,

    /// Dry run (render but don't write files)
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let mut builder = match &cli.config {
        Some(path) => ConfigBuilder::from_yaml_file(path)
            .with_context(|| format!("Failed to read options file {}", path.display()))?,
        None => Config::builder(),
    };

    if let Some(source) = cli.source {
        builder = builder.source_dir(source);
    }

    if let Some(output) = cli.output {
        builder = builder.output_dir(output);
    }

    for license in cli.exclude_licenses {
        builder = builder.exclude_license(license);
    }

    if let Some(output_file) = cli.output_file {
        builder = builder.output_file(output_file);
    }

    let config = builder
        .dry_run(cli.dry_run)
        .build()
        .context("Failed to build configuration")?;

    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Site generation failed")?;

    stats.print_summary();

    Ok(())
}

fn setup_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("selfhosted_pages=info"),
        1 => EnvFilter::new("selfhosted_pages=debug"),
        _ => EnvFilter::new("selfhosted_pages=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();
}
