//! Prep command implementation
//!
//! Normalizes raw discussion exports into the tables `analyze` expects.
//! Each input is read, prepared as a whole new table (the pure functions
//! in `crate::prep`), and written under the output directory with its
//! original file name.

use crate::prep::{prepare_comments, prepare_submissions, RawTable};
use anyhow::{bail, Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(
    submissions: Option<PathBuf>,
    comments: Option<PathBuf>,
    out_dir: &Path,
) -> Result<()> {
    if submissions.is_none() && comments.is_none() {
        bail!("nothing to prepare: pass --submissions and/or --comments");
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    if let Some(path) = submissions {
        let prepared = prepare_submissions(&RawTable::from_path(&path)?)
            .with_context(|| format!("failed to prepare {}", path.display()))?;
        let dest = write_prepared(&prepared, &path, out_dir)?;
        info!(rows = prepared.len(), "prepared submissions");
        eprintln!(
            "{} {} ({} rows)",
            style("Prepared").green().bold(),
            dest.display(),
            prepared.len()
        );
    }

    if let Some(path) = comments {
        let prepared = prepare_comments(&RawTable::from_path(&path)?)
            .with_context(|| format!("failed to prepare {}", path.display()))?;
        let dest = write_prepared(&prepared, &path, out_dir)?;
        info!(rows = prepared.len(), "prepared comments");
        eprintln!(
            "{} {} ({} rows)",
            style("Prepared").green().bold(),
            dest.display(),
            prepared.len()
        );
    }

    Ok(())
}

fn write_prepared(table: &RawTable, source: &Path, out_dir: &Path) -> Result<PathBuf> {
    let Some(name) = source.file_name() else {
        bail!("input path {} has no file name", source.display());
    };
    let dest = out_dir.join(name);
    table.write_to_path(&dest)?;
    Ok(dest)
}
