use std::path::{Path, PathBuf};
use std::process;

use serde_json::json;
use tracing::{info, warn};
use udbcfg_core::{ConfigError, LoadCache};

use crate::{report_error, OutputFormat};

/// File name prefixes of deliberately valid/broken samples that are never
/// loaded as roots.
const SKIPPED_PREFIXES: [&str; 2] = ["valid", "corrupt"];

pub(crate) fn cmd_check(dir: &Path, output: OutputFormat, quiet: bool) {
    let files = match collect_files(dir) {
        Ok(files) => files,
        Err(e) => {
            report_error(
                &format!("cannot read directory {}: {}", dir.display(), e),
                output,
                quiet,
            );
            process::exit(1);
        }
    };

    // One cache for the whole run: shared includes are parsed once.
    let mut cache = LoadCache::new();
    let mut failures: Vec<(PathBuf, ConfigError)> = Vec::new();
    for file in &files {
        info!(path = %file.display(), "checking configuration file");
        match udbcfg_core::load_file(file, &mut cache) {
            Ok(_) => {
                if output == OutputFormat::Text && !quiet {
                    println!("ok    {}", file.display());
                }
            }
            Err(e) => {
                warn!(path = %file.display(), kind = e.kind(), "configuration file failed to load");
                if output == OutputFormat::Text {
                    println!("FAIL  {}: {}", file.display(), e);
                }
                failures.push((file.clone(), e));
            }
        }
    }

    match output {
        OutputFormat::Text => {
            if !quiet {
                println!(
                    "\nchecked {} file(s): {} passed, {} failed",
                    files.len(),
                    files.len() - failures.len(),
                    failures.len()
                );
            }
        }
        OutputFormat::Json => {
            let report = json!({
                "checked": files.len(),
                "failed": failures.len(),
                "failures": failures
                    .iter()
                    .map(|(path, e)| json!({
                        "path": path.display().to_string(),
                        "error": e.to_json_value(),
                    }))
                    .collect::<Vec<_>>(),
            });
            let pretty = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }

    if !failures.is_empty() {
        process::exit(1);
    }
}

/// Every file under `dir`, recursively, in sorted order, minus skipped names.
fn collect_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    walk(dir, &mut results)?;
    results.sort();
    Ok(results)
}

fn walk(dir: &Path, results: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, results)?;
        } else if !is_skipped(&path) {
            results.push(path);
        }
    }
    Ok(())
}

fn is_skipped(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    SKIPPED_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}
