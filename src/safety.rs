//! Safety checks to prevent the outputs from clobbering the input.
//!
//! The train/test files are overwritten on every run, so they are checked
//! against the metadata file before anything is written.

use anyhow::{bail, Result};
use std::path::{Component, Path, PathBuf};

/// Resolve `path` the way the OS will once the output directory exists.
///
/// The longest existing ancestor is canonicalized; the components below it do
/// not exist yet, so they cannot be symlinks and `.`/`..` are applied lexically.
fn resolve_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    for ancestor in absolute.ancestors() {
        if let Ok(base) = ancestor.canonicalize() {
            let rest = absolute.strip_prefix(ancestor).unwrap_or_else(|_| Path::new(""));
            return push_lexical(base, rest);
        }
    }
    push_lexical(PathBuf::new(), &absolute)
}

fn push_lexical(mut base: PathBuf, rest: &Path) -> PathBuf {
    for component in rest.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                base.pop();
            }
            other => base.push(other.as_os_str()),
        }
    }
    base
}

/// Validates that the output paths are safe to overwrite.
///
/// Checks:
/// - No output may resolve to the metadata input file
/// - The train and test outputs must be distinct files
pub fn validate_output_paths(input: &Path, train: &Path, test: &Path) -> Result<()> {
    let input_resolved = resolve_path(input);
    let train_resolved = resolve_path(train);
    let test_resolved = resolve_path(test);

    for (output, resolved) in [(train, &train_resolved), (test, &test_resolved)] {
        if *resolved == input_resolved {
            bail!(
                "Safety check failed: output '{}' cannot be the same as input '{}'",
                output.display(),
                input.display()
            );
        }
    }

    if train_resolved == test_resolved {
        bail!(
            "Safety check failed: train and test outputs both resolve to '{}'",
            train.display()
        );
    }

    Ok(())
}
