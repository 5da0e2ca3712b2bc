//! Element Query CLI
//!
//! Rewrites stylesheets ahead of time so a host only needs the descriptor
//! registry at runtime.

use anyhow::{bail, Context, Result};
use element_query::config::Config;
use element_query::registry::Registry;
use element_query::rewriter::rewrite_with_options;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Parsed command line.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Stylesheet paths or glob patterns.
    pub inputs: Vec<String>,
    /// Write each rewritten sheet here, under its own file name.
    pub out_dir: Option<PathBuf>,
    /// Write the collected descriptors here as JSON.
    pub queries: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// One rewritten stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct RewrittenSheet {
    pub path: PathBuf,
    pub css: String,
}

#[derive(Debug, Default)]
pub struct RewriteReport {
    pub sheets: Vec<RewrittenSheet>,
    pub registry: Registry,
    /// Inputs that could not be read, with the reason.
    pub failures: Vec<(PathBuf, String)>,
}

impl RewriteReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand glob patterns. Plain paths are kept as given, even when missing, so
/// that reading them reports the problem.
pub fn resolve_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        if !has_glob_chars(pattern) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let entries =
            glob::glob(pattern).with_context(|| format!("invalid glob pattern '{}'", pattern))?;
        let before = paths.len();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("skipping unreadable match: {}", e),
            }
        }
        if paths.len() == before {
            log::warn!("no stylesheets matched '{}'", pattern);
        }
    }

    Ok(paths)
}

/// Rewrite every file in `paths`, accumulating one registry. Unreadable files
/// are recorded and skipped.
///
/// The output replaces the source sheet, so at-rule blocks the rewriter does
/// not descend into are kept unless the config says otherwise.
pub fn rewrite_files(paths: &[PathBuf], config: &Config) -> RewriteReport {
    let mut scan_options = config.scan_options();
    scan_options.keep_skipped_blocks = config.keep_skipped_blocks.unwrap_or(true);
    let mut report = RewriteReport::default();

    for path in paths {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::error!("could not read {}: {}", path.display(), e);
                report.failures.push((path.clone(), e.to_string()));
                continue;
            }
        };

        let before = report.registry.len();
        let css = rewrite_with_options(&text, &scan_options, &mut report.registry);
        log::info!(
            "{}: {} element queries",
            path.display(),
            report.registry.len() - before
        );
        report.sheets.push(RewrittenSheet {
            path: path.clone(),
            css,
        });
    }

    report
}

fn output_path(out_dir: &Path, input: &Path) -> Result<PathBuf> {
    let Some(name) = input.file_name() else {
        bail!("input path {} has no file name", input.display());
    };
    Ok(out_dir.join(name))
}

/// Write the rewritten sheets to `out_dir`, or to `stdout` without one.
pub fn write_sheets(
    sheets: &[RewrittenSheet],
    out_dir: Option<&Path>,
    stdout: &mut dyn Write,
) -> Result<()> {
    match out_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            for sheet in sheets {
                let dest = output_path(dir, &sheet.path)?;
                fs::write(&dest, &sheet.css)
                    .with_context(|| format!("failed to write {}", dest.display()))?;
            }
        }
        None => {
            for sheet in sheets {
                stdout.write_all(sheet.css.as_bytes())?;
                if !sheet.css.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
            }
        }
    }
    Ok(())
}

pub fn write_registry(registry: &Registry, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(registry)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Run the whole pipeline. `Ok(false)` means some inputs could not be read;
/// everything else was still written.
pub fn run(options: &Options, stdout: &mut dyn Write) -> Result<bool> {
    let config = match &options.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let paths = resolve_inputs(&options.inputs)?;
    let report = rewrite_files(&paths, &config);

    write_sheets(&report.sheets, options.out_dir.as_deref(), stdout)?;
    if let Some(path) = &options.queries {
        write_registry(&report.registry, path)?;
    }

    Ok(report.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const CARD_CSS: &str = ".card:media(min-available-width: 20em) { display: flex; }";

    #[test]
    fn should_keep_plain_paths_and_expand_globs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.css"), "").unwrap();
        fs::write(dir.path().join("b.css"), "").unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();

        let pattern = dir.path().join("*.css").to_string_lossy().to_string();
        let mut paths = resolve_inputs(&[pattern, "missing.css".to_string()]).unwrap();
        paths.sort();

        assert_eq!(paths.len(), 3);
        assert!(paths.contains(&PathBuf::from("missing.css")));
        assert!(paths.contains(&dir.path().join("a.css")));
        assert!(!paths.iter().any(|p| p.extension().unwrap() == "txt"));
    }

    #[test]
    fn should_reject_invalid_glob() {
        assert!(resolve_inputs(&["[".to_string()]).is_err());
    }

    #[test]
    fn should_rewrite_files_and_record_failures() {
        let dir = tempdir().unwrap();
        let card = dir.path().join("card.css");
        fs::write(&card, CARD_CSS).unwrap();
        let missing = dir.path().join("missing.css");

        let report = rewrite_files(&[card.clone(), missing.clone()], &Config::default());

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, missing);
        assert_eq!(
            report.sheets,
            vec![RewrittenSheet {
                path: card,
                css: ".card.query_min-available-width_20em { display: flex; }".to_string(),
            }]
        );
        assert_eq!(report.registry.len(), 1);
    }

    #[test]
    fn should_print_to_stdout_without_out_dir() {
        let dir = tempdir().unwrap();
        let card = dir.path().join("card.css");
        fs::write(&card, CARD_CSS).unwrap();

        let options = Options {
            inputs: vec![card.to_string_lossy().to_string()],
            ..Options::default()
        };
        let mut stdout = Vec::new();
        assert!(run(&options, &mut stdout).unwrap());
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            ".card.query_min-available-width_20em { display: flex; }\n"
        );
    }

    #[test]
    fn should_write_sheets_and_registry_files() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("card.css"), CARD_CSS).unwrap();
        let out_dir = dir.path().join("dist");
        let queries = dir.path().join("queries.json");

        let options = Options {
            inputs: vec![src.join("*.css").to_string_lossy().to_string()],
            out_dir: Some(out_dir.clone()),
            queries: Some(queries.clone()),
            config: None,
        };
        let mut stdout = Vec::new();
        assert!(run(&options, &mut stdout).unwrap());
        assert!(stdout.is_empty());

        let css = fs::read_to_string(out_dir.join("card.css")).unwrap();
        assert_eq!(css, ".card.query_min-available-width_20em { display: flex; }");

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(queries).unwrap()).unwrap();
        assert_eq!(json[0]["selector"], ".card");
        assert_eq!(json[0]["className"], "query_min-available-width_20em");
        assert_eq!(json[0]["rules"][0]["units"], "em");
    }

    #[test]
    fn should_fail_run_when_an_input_is_missing() {
        let dir = tempdir().unwrap();
        let card = dir.path().join("card.css");
        fs::write(&card, CARD_CSS).unwrap();

        let options = Options {
            inputs: vec![
                dir.path().join("nope.css").to_string_lossy().to_string(),
                card.to_string_lossy().to_string(),
            ],
            ..Options::default()
        };
        let mut stdout = Vec::new();
        assert!(!run(&options, &mut stdout).unwrap());
        assert!(!stdout.is_empty());
    }

    #[test]
    fn should_keep_keyframes_in_written_sheets() {
        let dir = tempdir().unwrap();
        let sheet = dir.path().join("spinner.css");
        fs::write(
            &sheet,
            "@keyframes spin { to { rotate: 1turn; } }\n.spinner:media(min-available-width: 2em) { animation: spin 1s; }\n",
        )
        .unwrap();
        let out_dir = dir.path().join("dist");

        let options = Options {
            inputs: vec![sheet.to_string_lossy().to_string()],
            out_dir: Some(out_dir.clone()),
            ..Options::default()
        };
        assert!(run(&options, &mut Vec::new()).unwrap());
        assert_eq!(
            fs::read_to_string(out_dir.join("spinner.css")).unwrap(),
            "@keyframes spin { to { rotate: 1turn; } }\n.spinner.query_min-available-width_2em { animation: spin 1s; }\n"
        );
    }

    #[test]
    fn should_drop_skipped_blocks_when_config_says_so() {
        let dir = tempdir().unwrap();
        let sheet = dir.path().join("fonts.css");
        fs::write(&sheet, "@font-face { font-family: x; }\n.a:media(min-available-width: 1px) { b: c; }").unwrap();

        let config = Config {
            keep_skipped_blocks: Some(false),
            ..Config::default()
        };
        let report = rewrite_files(&[sheet], &config);
        assert_eq!(
            report.sheets[0].css,
            "\n.a.query_min-available-width_1px { b: c; }"
        );
    }

    #[test]
    fn should_apply_config_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("eq.json");
        fs::write(&config, r#"{ "nestedBlockAtRules": ["@media", "@supports"] }"#).unwrap();
        let sheet = dir.path().join("grid.css");
        fs::write(
            &sheet,
            "@supports (display: grid) { a:media(max-available-width: 10px) { x: y; } }",
        )
        .unwrap();

        let options = Options {
            inputs: vec![sheet.to_string_lossy().to_string()],
            config: Some(config),
            ..Options::default()
        };
        let mut stdout = Vec::new();
        assert!(run(&options, &mut stdout).unwrap());
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "@supports (display: grid) { a.query_max-available-width_10px { x: y; } }\n"
        );
    }
}
