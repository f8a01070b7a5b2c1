//! `storage-expand`: expand every observable storage directive in a file.
//!
//! Each non-blank line that is not a `//` comment is one declaration.
//! Successful expansions are printed as the computed property that replaces
//! the declaration; failures are printed as `path:line:column: error: ...`.

use std::path::PathBuf;
use std::process;

use eyre::{WrapErr, bail};
use owo_colors::OwoColorize;
use storage_macros_impl::{ExpandConfig, SourceLocation, expand_source};
use tracing::{debug, info};

mod logging;

const USAGE: &str = "usage: storage-expand [--access-hook <name>] [--mutation-hook <name>] [--indent <n>] <file>";

struct Options {
    path: PathBuf,
    config: ExpandConfig,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> eyre::Result<Options> {
    let mut path = None;
    let mut config = ExpandConfig::default();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| eyre::eyre!("{flag} expects a value\n{USAGE}"))
        };
        match arg.as_str() {
            "--access-hook" => config = config.with_access_hook(value("--access-hook")?),
            "--mutation-hook" => config = config.with_mutation_hook(value("--mutation-hook")?),
            "--indent" => {
                let width = value("--indent")?
                    .parse::<usize>()
                    .wrap_err("--indent expects a number of spaces")?;
                config = config.with_indent_width(width);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown flag {flag}\n{USAGE}"),
            _ if path.is_some() => bail!("only one input file is accepted\n{USAGE}"),
            _ => path = Some(PathBuf::from(&arg)),
        }
    }

    let Some(path) = path else {
        bail!("{USAGE}");
    };
    Ok(Options { path, config })
}

fn main() -> eyre::Result<()> {
    logging::setup();

    let opts = parse_args(std::env::args().skip(1))?;
    let source = fs_err::read_to_string(&opts.path)?;
    let display_path = opts.path.display();

    let mut expanded = 0usize;
    let mut failures = 0usize;

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        // column offsets in the lexed declaration are relative to the line
        let report = |location: Option<SourceLocation>, message: &str| {
            let column = location.map(|l| l.column).unwrap_or(1);
            eprintln!(
                "{}: {} {}",
                format!("{display_path}:{line_number}:{column}").bold(),
                "error:".red().bold(),
                message
            );
        };

        let results = match expand_source(line, &opts.config) {
            Ok(results) => results,
            Err(err) => {
                report(err.location, &err.message);
                failures += 1;
                continue;
            }
        };
        debug!(line = line_number, directives = results.len(), "expanded declaration");

        for result in results {
            match result {
                Ok(expansion) => {
                    expanded += 1;
                    println!("{}", format!("// {display_path}:{line_number}").dimmed());
                    println!(
                        "var {}: {} {}",
                        expansion.identifier,
                        expansion.result_type,
                        expansion.accessor_block()
                    );
                }
                Err(diagnostic) => {
                    failures += 1;
                    report(diagnostic.location, &diagnostic.message());
                }
            }
        }
    }

    info!(expanded, failures, "done");
    if failures > 0 {
        eprintln!(
            "{}",
            format!("{failures} declaration(s) could not be expanded").red()
        );
        process::exit(1);
    }
    Ok(())
}
