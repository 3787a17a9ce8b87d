use std::path::Path;
use std::process;

use udbcfg_core::LoadCache;

use crate::OutputFormat;

pub(crate) fn cmd_load(file: &Path, output: OutputFormat, quiet: bool) {
    let mut cache = LoadCache::new();
    match udbcfg_core::load_file(file, &mut cache) {
        Ok(scope) => match output {
            OutputFormat::Text => print!("{}", udbcfg_core::render(&scope)),
            OutputFormat::Json => {
                let pretty = serde_json::to_string_pretty(&*scope)
                    .unwrap_or_else(|e| format!("serialization error: {}", e));
                println!("{}", pretty);
            }
        },
        Err(e) => {
            match output {
                OutputFormat::Json => {
                    let err_json = serde_json::to_string_pretty(&e.to_json_value())
                        .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
                    eprintln!("{}", err_json);
                }
                OutputFormat::Text => {
                    if !quiet {
                        eprintln!("error: {}", e);
                    }
                }
            }
            process::exit(1);
        }
    }
}
