use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Fail when `output` names the same file as `input`.
pub fn ensure_output_not_input(output: &Path, input: &Path) -> Result<()> {
    let out_norm = comparable(output)
        .with_context(|| format!("failed to resolve output path {}", output.display()))?;
    let in_norm = comparable(input)
        .with_context(|| format!("failed to resolve input path {}", input.display()))?;

    if out_norm == in_norm {
        bail!(
            "refusing to overwrite source topology: output {} matches input {}",
            output.display(),
            input.display()
        );
    }
    Ok(())
}

fn comparable(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // Not created yet; `..` components are left as written.
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().context("current_dir")?
    };
    Ok(base.join(path))
}
