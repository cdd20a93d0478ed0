//! oaslice CLI
//!
//! Command-line interface for reading, slicing and rewriting OpenAPI
//! descriptions.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use oaslice_common::{CancellationToken, Diagnostics, Severity};
use oaslice_parser::{FileLoader, ReaderSettings};
use oaslice_services::{
    FilterSettings, IdentifierCase, Inspection, TransformOptions, TransformSettings, Transformer,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oaslice")]
#[command(version, about = "Read, slice and rewrite OpenAPI descriptions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert, filter and reformat an OpenAPI description
    #[command(after_help = "EXAMPLES:\n  \
        # Convert a Swagger 2.0 file to OpenAPI 3.1 JSON\n  \
        oaslice transform --input petstore.yaml --version 3.1 --format json\n\n  \
        # Keep two operations and everything they reference\n  \
        oaslice transform \\\n    \
        --input graph.yaml \\\n    \
        --filter-by-operation-ids users.ListUser,users.GetUser \\\n    \
        --output users.yaml\n\n  \
        # Keep the requests of a Postman collection\n  \
        oaslice transform --input graph.yaml --filter-by-collection mail.postman_collection.json\n\n  \
        # Keep the requests of one API manifest dependency\n  \
        oaslice transform --input graph.yaml --filter-by-manifest apimanifest.json#mail")]
    Transform(TransformArgs),

    /// Read a description and report diagnostics and statistics
    Validate {
        /// Path to the OpenAPI description
        #[arg(short, long)]
        input: PathBuf,

        /// Load external documents named by `$ref`
        #[arg(long)]
        load_external: bool,
    },

    /// Print node counts of a description
    Stats {
        /// Path to the OpenAPI description
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Args)]
struct TransformArgs {
    /// Path to the OpenAPI description
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(long)]
    clean_output: bool,

    /// Output format (taken from the input extension if not specified)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Output OpenAPI version (the input's version if not specified)
    #[arg(long, value_parser = ["2.0", "3.0", "3.1"])]
    version: Option<String>,

    /// Write JSON without indentation
    #[arg(long)]
    terse: bool,

    /// Inline local references instead of writing `$ref`
    #[arg(long)]
    inline_local: bool,

    /// Inline references into external documents
    #[arg(long)]
    inline_external: bool,

    /// Load external documents named by `$ref`
    #[arg(long)]
    load_external: bool,

    /// Comma-separated operation ids to keep, `*` for all
    #[arg(long = "filter-by-operation-ids", value_delimiter = ',')]
    operation_ids: Option<Vec<String>>,

    /// Tag pattern, or comma-separated exact tag names
    #[arg(long = "filter-by-tags", value_delimiter = ',')]
    tags: Option<Vec<String>>,

    /// Postman collection whose requests select operations
    #[arg(long = "filter-by-collection")]
    collection: Option<PathBuf>,

    /// API manifest whose requests select operations, `file[#dependency]`
    #[arg(long = "filter-by-manifest")]
    manifest: Option<String>,

    /// Rewrite operation ids into this case
    #[arg(long)]
    case: Option<CaseArg>,

    /// YAML settings file; command-line flags take precedence
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CaseArg {
    Camel,
    Pascal,
    Snake,
    Kebab,
}

impl From<CaseArg> for IdentifierCase {
    fn from(case: CaseArg) -> Self {
        match case {
            CaseArg::Camel => IdentifierCase::Camel,
            CaseArg::Pascal => IdentifierCase::Pascal,
            CaseArg::Snake => IdentifierCase::Snake,
            CaseArg::Kebab => IdentifierCase::Kebab,
        }
    }
}

impl TransformArgs {
    /// Flags as a settings layer to merge over the settings file
    fn to_settings(&self) -> TransformSettings {
        TransformSettings {
            format: self.format.map(|format| match format {
                OutputFormat::Json => "json".to_string(),
                OutputFormat::Yaml => "yaml".to_string(),
            }),
            version: self.version.clone(),
            terse: self.terse,
            inline_local: self.inline_local,
            inline_external: self.inline_external,
            load_external: self.load_external,
            case: self.case.map(IdentifierCase::from),
            filter: FilterSettings {
                operation_ids: self.operation_ids.clone().unwrap_or_default(),
                tags: self.tags.clone().unwrap_or_default(),
                collection: self.collection.clone(),
                manifest: self.manifest.clone(),
                ..Default::default()
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Transform(args) => transform_command(&args, cli.verbose),
        Commands::Validate {
            input,
            load_external,
        } => validate_command(&input, load_external),
        Commands::Stats { input } => stats_command(&input),
    }
}

/// Logs go to stderr; `RUST_LOG` applies unless `--verbose` is given
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn transform_command(args: &TransformArgs, verbose: bool) -> Result<()> {
    eprintln!("{} Transforming: {}", "→".cyan(), args.input.display());

    let file_settings = match &args.settings {
        Some(path) => TransformSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => TransformSettings::default(),
    };
    let settings = file_settings.merge(args.to_settings());

    if let Some(output) = &args.output {
        if output.exists() && !args.clean_output {
            bail!(
                "Output file {} already exists (use --clean-output to overwrite it)",
                output.display()
            );
        }
    }

    let options = settings
        .options(Some(args.input.as_path()))
        .context("Invalid transform settings")?;
    if verbose {
        eprintln!("  Format: {}", options.writer.format);
        if let Some(version) = options.writer.version {
            eprintln!("  Version: {}", version);
        }
        if let Some(case) = options.identifier_case {
            eprintln!("  Case: {}", case);
        }
    }

    let text = read_input(&args.input)?;
    let output = transformer(options, settings.load_external)
        .run(&text, &CancellationToken::new())
        .context("Failed to transform OpenAPI description")?;
    print_diagnostics(&output.diagnostics, verbose);

    match &args.output {
        Some(path) => {
            fs::write(path, &output.text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Wrote {} ({} operations)",
                "✓".green().bold(),
                path.display().to_string().yellow(),
                output.stats.operations
            );
        }
        None => print!("{}", output.text),
    }
    Ok(())
}

fn validate_command(input: &Path, load_external: bool) -> Result<()> {
    eprintln!("{} Validating: {}", "→".cyan(), input.display());
    let inspection = inspect(input, load_external)?;

    print_diagnostics(&inspection.diagnostics, true);
    println!(
        "\n{} OpenAPI {} ({})",
        "Document:".bold(),
        inspection.version,
        inspection.format
    );
    print!("{}", inspection.stats.report());

    let errors = inspection.diagnostics.errors().count();
    if errors > 0 {
        bail!("{} error(s) found in {}", errors, input.display());
    }
    println!("\n{}", "✓ No errors found".green().bold());
    Ok(())
}

fn stats_command(input: &Path) -> Result<()> {
    let inspection = inspect(input, false)?;
    print!("{}", inspection.stats.report());
    Ok(())
}

fn inspect(input: &Path, load_external: bool) -> Result<Inspection> {
    let options = TransformOptions {
        reader: ReaderSettings {
            load_external_refs: load_external,
            base_location: Some(input.display().to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    let text = read_input(input)?;
    transformer(options, load_external)
        .inspect(&text, &CancellationToken::new())
        .context("Failed to read OpenAPI description")
}

fn transformer(options: TransformOptions, load_external: bool) -> Transformer {
    let transformer = Transformer::new(options);
    if load_external {
        debug!("loading external references from the file system");
        transformer.with_loader(Box::new(FileLoader::new()))
    } else {
        transformer
    }
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Errors always, warnings in verbose mode or as a count
fn print_diagnostics(diagnostics: &Diagnostics, verbose: bool) {
    for diagnostic in diagnostics.iter() {
        match diagnostic.severity {
            Severity::Error => eprintln!("{} {}", "✗".red().bold(), diagnostic),
            Severity::Warning if verbose => eprintln!("{} {}", "!".yellow(), diagnostic),
            Severity::Warning => {}
        }
    }
    let warnings = diagnostics.warnings().count();
    if warnings > 0 && !verbose {
        eprintln!(
            "{} {} warning(s), use --verbose to list them",
            "!".yellow(),
            warnings
        );
    }
}
