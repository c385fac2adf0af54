use anyhow::Context;
use opsdesk_core::config::Config;
use opsdesk_core::{io, paths};
use std::path::Path;

/// `opsdesk init` — scaffold `.opsdesk/` with a default config and one
/// directory per collection. Safe to re-run; an existing config is kept.
pub fn run(root: &Path, name: Option<String>, json: bool) -> anyhow::Result<()> {
    let project_name = name.unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "opsdesk".to_string())
    });

    io::ensure_dir(&paths::opsdesk_dir(root)).context("failed to create .opsdesk directory")?;
    for collection in paths::ALL_COLLECTIONS {
        io::ensure_dir(&paths::collection_dir(root, collection))?;
    }

    let config_path = paths::config_path(root);
    let created = if config_path.exists() {
        false
    } else {
        Config::new(&project_name).save(root)?;
        true
    };

    if json {
        crate::output::print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "project": project_name,
            "created": created,
        }))?;
    } else if created {
        println!("Initialized opsdesk project '{project_name}' in {}", root.display());
    } else {
        println!("opsdesk already initialized in {}", root.display());
    }
    Ok(())
}
