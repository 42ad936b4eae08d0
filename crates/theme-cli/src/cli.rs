//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Theme Schema - Keep section schemas in sync with shared schema templates
#[derive(Parser, Debug)]
#[command(name = "theme-schema")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Theme root (defaults to the nearest directory containing theme-schema.toml)
    #[arg(long, global = true, env = "THEME_SCHEMA_ROOT")]
    pub root: Option<PathBuf>,

    /// Schema templates directory, relative to the theme root
    #[arg(long, global = true)]
    pub schema_dir: Option<String>,

    /// Section documents directory, relative to the theme root
    #[arg(long, global = true)]
    pub sections_dir: Option<String>,

    /// Indent width for the formatted schema JSON
    #[arg(long, global = true)]
    pub tab_width: Option<usize>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is not set
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the schema and sections directories and a default config
    Init,

    /// Inject schema templates into section documents
    ///
    /// Without PATH every section is synchronized. With PATH, only the
    /// given section, or the sections referencing the given template.
    ///
    /// Examples:
    ///   theme-schema sync                        # All sections
    ///   theme-schema sync schema/product.json    # Sections using product.json
    ///   theme-schema sync --dry-run              # Preview without writing
    Sync {
        /// A schema template or section document
        path: Option<PathBuf>,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for CI/CD integration
        #[arg(long)]
        json: bool,
    },

    /// Check that every section is up to date; exits non-zero otherwise
    Check {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Synchronize, then keep synchronizing as files change
    Watch {
        /// Milliseconds to collect file events before syncing
        #[arg(long, default_value_t = 100)]
        debounce_ms: u64,
    },
}
