//! Init command implementation

use colored::Colorize;
use theme_core::CONFIG_FILE;
use theme_fs::{NormalizedPath, io};

use crate::context::ThemeContext;
use crate::error::Result;

/// Create the schema and sections directories and write a default
/// `theme-schema.toml` if none exists.
///
/// Existing directories and an existing config file are left alone.
pub fn run_init(context: &ThemeContext) -> Result<()> {
    println!(
        "{} Initializing theme at {}",
        "=>".blue().bold(),
        context.root.as_str().cyan()
    );

    io::ensure_dir(&context.root)?;
    let config = context.config()?;

    for dir in [&config.schema_dir, &config.sections_dir] {
        let path = resolve(&context.root, dir);
        if io::ensure_dir(&path)? {
            println!("   {} {}", "+".green(), context.display_path(path.as_str()));
        } else {
            println!("   {} {} (exists)", "-".dimmed(), context.display_path(path.as_str()));
        }
    }

    let config_path = context.root.join(CONFIG_FILE);
    if config_path.exists() {
        println!("   {} {} (exists)", "-".dimmed(), CONFIG_FILE);
    } else {
        io::write_text(&config_path, &config.to_toml()?)?;
        println!("   {} {}", "+".green(), CONFIG_FILE);
    }

    println!("{} Theme ready.", "OK".green().bold());
    Ok(())
}

fn resolve(root: &NormalizedPath, dir: &str) -> NormalizedPath {
    let dir = NormalizedPath::new(dir);
    if dir.to_native().is_absolute() {
        dir
    } else {
        root.join(dir.as_str().trim_start_matches("./"))
    }
}
