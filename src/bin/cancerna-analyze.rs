//! Submit one scan to the inference backend and print the mapped result as JSON.

use std::path::PathBuf;

use cancerna::analysis::{AnalysisBackend, BackendEndpoint, HttpAnalysisBackend};
use cancerna::trial::SelectedFile;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = cancerna::logging::init_stderr() {
        eprintln!("Logging disabled: {err}");
    }
    let endpoint = resolve_endpoint(options.backend.as_deref())?;
    let file = SelectedFile::from_path(&options.file)
        .map_err(|err| format!("Cannot open {}: {err}", options.file.display()))?;
    let upload = file.to_upload().map_err(|err| err.to_string())?;
    let backend = HttpAnalysisBackend::new(endpoint);
    let result = backend
        .predict(&upload)
        .map_err(|err| format!("Analysis failed: {err}"))?;
    let json = if options.compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    }
    .map_err(|err| format!("Encode result failed: {err}"))?;
    println!("{json}");
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
struct Options {
    file: PathBuf,
    backend: Option<String>,
    compact: bool,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut file = None;
    let mut backend = None;
    let mut compact = false;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--backend" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--backend requires a value".to_string())?;
                backend = Some(value.to_string());
            }
            "--compact" => compact = true,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            path => {
                if file.is_some() {
                    return Err(format!("Unexpected argument: {path}\n\n{}", help_text()));
                }
                file = Some(PathBuf::from(path));
            }
        }
        idx += 1;
    }

    let Some(file) = file else {
        return Err(format!("A scan file is required\n\n{}", help_text()));
    };
    Ok(Some(Options {
        file,
        backend,
        compact,
    }))
}

fn help_text() -> String {
    [
        "cancerna-analyze",
        "",
        "Submit one scan to the inference backend and print the result as JSON.",
        "",
        "Usage:",
        "  cancerna-analyze <file> [--backend <url>] [--compact]",
        "",
        "Options:",
        "  --backend <url>   Backend base URL (defaults to config.toml / CANCERNA_BACKEND_URL).",
        "  --compact         Print single-line JSON.",
    ]
    .join("\n")
}

fn resolve_endpoint(backend: Option<&str>) -> Result<BackendEndpoint, String> {
    if let Some(url) = backend {
        return BackendEndpoint::parse(url).map_err(|err| err.to_string());
    }
    let settings = cancerna::config::load_or_default().map_err(|err| err.to_string())?;
    settings.endpoint().map_err(|err| err.to_string())
}
