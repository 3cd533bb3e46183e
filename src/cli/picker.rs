//! Interactive CSV picker.
//!
//! Kept separate from clap parsing: clap handles structured flags, while the
//! picker covers "run `lv fit` without `-f` and choose a CSV".
//!
//! The picker searches for `*.csv` files under the current working directory.

use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Directory recursion depth when looking for CSV files.
const SEARCH_DEPTH: usize = 4;

/// The explicit path if one was given, otherwise an interactive choice.
pub fn resolve_csv_path(explicit: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Some(path) = explicit {
        return validate_csv_path(path);
    }
    if !io::stdin().is_terminal() {
        return Err(AppError::new(2, "No input CSV. Pass one with `lv fit -f <file.csv>`."));
    }

    let files = discover_csv_files(Path::new("."), SEARCH_DEPTH);
    let stdin = io::stdin();
    let stdout = io::stdout();
    choose_csv(&files, &mut stdin.lock(), &mut stdout.lock())
}

/// Validate the provided path points to an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(2, format!("CSV file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file (got: {}).", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// Ask which of `files` to use. Accepts a list number, a path, or `q`.
pub fn choose_csv<R: BufRead, W: Write>(
    files: &[PathBuf],
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf, AppError> {
    let io_err = |e: io::Error| AppError::new(2, format!("Prompt I/O failed: {e}"));

    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv files found. Provide one with `lv fit -f <file.csv>`.",
        ));
    }

    writeln!(output, "Found {} CSV file(s):", files.len()).map_err(io_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(output, "{:>3}) {}", idx + 1, display_path(path)).map_err(io_err)?;
    }

    loop {
        write!(output, "Select a file (1-{}), type a path, or q to quit: ", files.len())
            .map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            return Err(AppError::new(2, "No selection made."));
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        let picked = match answer.parse::<usize>() {
            Ok(n) if (1..=files.len()).contains(&n) => validate_csv_path(&files[n - 1]),
            Ok(n) => Err(AppError::new(2, format!("No file numbered {n}."))),
            Err(_) => validate_csv_path(Path::new(answer)),
        };
        match picked {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(output, "{err}").map_err(io_err)?,
        }
    }
}

/// `*.csv` files under `root`, at most `max_depth` directories down, sorted.
pub fn discover_csv_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![(root.to_path_buf(), 0usize)];

    while let Some((dir, depth)) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                if depth < max_depth && !is_ignored_dir(&path) {
                    pending.push((path, depth + 1));
                }
            } else if file_type.is_file() && has_csv_extension(&path) {
                found.push(path);
            }
        }
    }

    found.sort_by_key(|p| display_path(p));
    found
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn is_ignored_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    name.starts_with('.') || matches!(name, "target" | "node_modules")
}

fn display_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}
