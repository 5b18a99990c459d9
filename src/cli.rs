//! Command-line interface for retdoc.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::check::Checker;
use crate::config::{self, Config};
use crate::report;
use crate::score;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default config file names to search for.
const DEFAULT_CONFIG_NAMES: &[&str] = &["retdoc.yaml", ".retdoc.yaml"];

/// Docstring linter for Python return documentation.
///
/// Retdoc checks that a function's docstring accurately documents its
/// return value: a function that returns a value should describe it and its
/// type, and a docstring should never promise a return the body does not
/// perform. Sphinx, Google and Numpy docstring conventions are recognized.
#[derive(Parser)]
#[command(name = "retdoc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check return documentation in Python sources
    #[command(visible_alias = "lint")]
    Check(CheckArgs),
    /// Create a new retdoc config from a template
    Init(InitArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Path to check (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Minimum documentation coverage to pass (0-100)
    #[arg(short, long)]
    pub threshold: Option<i32>,

    /// Hold functions with missing or unrecognized docstrings to the same
    /// bar as documented ones
    #[arg(long)]
    pub strict: bool,

    /// Show suppressed violations in output
    #[arg(long)]
    pub show_suppressed: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "retdoc.yaml")]
    pub output: PathBuf,

    /// Template to use
    #[arg(short, long, default_value = "default")]
    pub template: String,

    /// List available templates
    #[arg(short, long)]
    pub list: bool,
}

/// Available config templates.
struct Template {
    name: &'static str,
    description: &'static str,
    content: &'static str,
}

/// All available templates.
static TEMPLATES: &[Template] = &[
    Template {
        name: "default",
        description: "Accept undocumented functions, flag inconsistent ones",
        content: include_str!("templates/default.yaml"),
    },
    Template {
        name: "strict",
        description: "Every returning function must document value and type",
        content: include_str!("templates/strict.yaml"),
    },
];

/// Discover a config file in the current directory.
fn discover_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Collect Python files to scan.
fn collect_files(
    root: &Path,
    config: &Config,
    include_test_files: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            // Skip hidden directories
            if e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            // Skip virtualenvs, caches, and vendored trees
            if e.file_type().is_dir()
                && (name == "venv"
                    || name == "env"
                    || name == "node_modules"
                    || name == "site-packages"
                    || name == "__pycache__"
                    || name == "build"
                    || name == "dist")
            {
                return false;
            }
            true
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != "py" {
            continue;
        }

        if !include_test_files && is_test_file(path) {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        if config.is_path_excluded(rel) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn is_test_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.starts_with("test_") || name.ends_with("_test.py") || name == "conftest.py"
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" && args.format != "sarif" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    // Discover config if not specified; defaults apply when none exists
    let config_path = args.config.clone().or_else(discover_config);
    let mut config = match &config_path {
        Some(p) => match Config::parse_file(p) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error parsing config: {}", e);
                return Ok(EXIT_ERROR);
            }
        },
        None => Config::default(),
    };

    if let Err(e) = config::validate(&config) {
        eprintln!("Error: invalid config: {}", e);
        return Ok(EXIT_ERROR);
    }

    if args.strict {
        config.accept_no_return_doc = Some(false);
    }
    if let Some(threshold) = args.threshold {
        if !(0..=100).contains(&threshold) {
            eprintln!("Error: threshold must be between 0 and 100");
            return Ok(EXIT_ERROR);
        }
        config.min_coverage = Some(threshold);
    }

    // Resolve path
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let metadata = match std::fs::metadata(&abs_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Collect files to scan
    let files = if metadata.is_dir() {
        collect_files(&abs_path, &config, config.should_include_test_files())?
    } else {
        vec![abs_path.clone()]
    };

    if files.is_empty() {
        eprintln!("Warning: no files to scan");
        return Ok(EXIT_SUCCESS);
    }

    // Run the checks
    let base_dir = if metadata.is_dir() {
        abs_path.clone()
    } else {
        abs_path.parent().map(Path::to_path_buf).unwrap_or_default()
    };
    let checker = Checker::new(&base_dir);
    let result = checker.run(&files, &config)?;

    // Calculate coverage
    let coverage = score::calculate(&result, &config);

    // Output results
    let config_path_str = config_path
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());
    let path_str = args.path.to_string_lossy().to_string();

    match args.format.as_str() {
        "json" => {
            report::write_json(&path_str, &config_path_str, &result, &coverage)?;
        }
        "sarif" => {
            report::write_sarif(&base_dir, &result)?;
        }
        _ => {
            report::write_pretty(
                &path_str,
                &config_path_str,
                &result,
                &coverage,
                args.show_suppressed,
            );
        }
    }

    if coverage.passed {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // List mode
    if args.list {
        return list_templates();
    }

    // Find template
    let template = match TEMPLATES.iter().find(|t| t.name == args.template) {
        Some(t) => t,
        None => {
            eprintln!("Error: unknown template {:?}", args.template);
            eprintln!("Run 'retdoc init --list' to see available templates");
            return Ok(EXIT_ERROR);
        }
    };

    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    // Write config file
    if let Err(e) = std::fs::write(&args.output, template.content) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!(
        "Created {} from template '{}'",
        args.output.display(),
        template.name
    );
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit {} to customize for your project",
        args.output.display()
    );
    println!(
        "  2. Run: retdoc check . --config {}",
        args.output.display()
    );

    Ok(EXIT_SUCCESS)
}

/// List available templates.
fn list_templates() -> anyhow::Result<i32> {
    println!("Available templates:");
    println!();

    for template in TEMPLATES {
        let name = if template.name == "default" {
            format!("{} (default)", template.name)
        } else {
            template.name.to_string()
        };
        println!("  {:<20} {}", name, template.description);
    }

    println!();
    println!("Usage:");
    println!("  retdoc init --template <name>");

    Ok(EXIT_SUCCESS)
}
