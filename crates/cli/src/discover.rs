use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

/// Expand the command line paths into the list of files to lint.
///
/// Files are taken as given; directories are searched recursively for the
/// configured extensions. Exclude patterns match either the path as found or
/// the path relative to the directory it was found under.
pub fn collect_files(
    paths: &[PathBuf],
    extensions: &[String],
    exclude: &[glob::Pattern],
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for file in collect_directory(path, extensions)? {
                if !is_excluded(&file, Some(path), exclude) {
                    files.push(file);
                }
            }
        } else if path.is_file() {
            if !is_excluded(path, None, exclude) {
                files.push(path.clone());
            }
        } else {
            bail!("{} does not exist", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_directory(dir: &Path, extensions: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let root = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();
    for extension in extensions {
        let pattern = format!("{}/**/*.{}", root.trim_end_matches('/'), extension);
        let entries = glob::glob(&pattern).with_context(|| format!("invalid search pattern {pattern}"))?;
        for entry in entries {
            match entry {
                Ok(file) if file.is_file() => files.push(file),
                Ok(_) => {}
                Err(err) => tracing::warn!("skipping {}: {}", err.path().display(), err.error()),
            }
        }
    }
    Ok(files)
}

fn is_excluded(file: &Path, root: Option<&Path>, exclude: &[glob::Pattern]) -> bool {
    let relative = root.and_then(|root| file.strip_prefix(root).ok());
    let excluded = exclude.iter().any(|pattern| {
        pattern.matches_path(file) || relative.is_some_and(|rel| pattern.matches_path(rel))
    });
    if excluded {
        tracing::debug!("excluded {}", file.display());
    }
    excluded
}
