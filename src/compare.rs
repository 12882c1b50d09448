//! Gene length comparison between a reference annotation and one or more
//! comparison annotations.
//!
//! Every gene of the reference gets one row per comparison file. Genes missing from a
//! comparison are reported with length 0 instead of being left out, so a lost gene
//! shows up as a 100% difference.

use crate::annot_utils::{is_hidden, REPORT_SEPARATOR};
use crate::error::AnnotError;
use crate::options::CompareOptions;
use crate::reader::GeneSet;
use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq)]
/// One row of a comparison report.
pub struct GeneComparison {
    pub name: String,
    pub reference_length: u64,
    pub comparison_length: u64,
    pub percent_difference: f64,
}

impl std::fmt::Display for GeneComparison {
    /// `name reference_length comparison_length percent`, with the percent difference
    /// to one decimal place.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {:.1}",
            self.name, self.reference_length, self.comparison_length, self.percent_difference
        )
    }
}

/// `|reference - comparison| / reference * 100`.
///
/// A reference length of 0 has no meaningful percent difference and is an error.
pub fn percent_difference(reference: u64, comparison: u64) -> Result<f64, AnnotError> {
    if reference == 0 {
        return Err(AnnotError::ZeroLengthReference);
    }
    Ok(reference.abs_diff(comparison) as f64 / reference as f64 * 100.0)
}

/// Builds one [GeneComparison] per reference gene, in lexicographic order of gene name.
/// Genes absent from `comparison` are compared against a length of 0.
pub fn compare_gene_sets(
    reference: &GeneSet,
    comparison: &GeneSet,
) -> anyhow::Result<Vec<GeneComparison>> {
    let mut rows = Vec::with_capacity(reference.len());
    for (name, &reference_length) in reference.iter() {
        let comparison_length = comparison.length(name);
        let percent_difference = percent_difference(reference_length, comparison_length)
            .with_context(|| format!("Cannot compare reference gene {}", name))?;
        rows.push(GeneComparison {
            name: name.clone(),
            reference_length,
            comparison_length,
            percent_difference,
        });
    }
    Ok(rows)
}

/// Writes the separator line, the `label` line and then one line per row.
pub fn write_comparison_report<W: Write>(
    writer: &mut W,
    label: &str,
    rows: &[GeneComparison],
) -> std::io::Result<()> {
    writeln!(writer, "{}", REPORT_SEPARATOR)?;
    writeln!(writer, "{}", label)?;
    for row in rows {
        writeln!(writer, "{}", row)?;
    }
    Ok(())
}

/// Lists the comparison files in `dir`.
///
/// A file is kept when its name is not hidden, ends with `opts.suffix`, is not the
/// reference file, and contains none of the `opts.exclude` tokens. The result is sorted
/// so reports come out in a stable order.
pub fn discover_comparison_files<T: AsRef<Path>>(
    dir: T,
    opts: &CompareOptions,
) -> anyhow::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let reference_name = opts.reference.file_name();
    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Could not list the directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if is_hidden(&name) || !name.ends_with(opts.suffix.as_str()) {
            continue;
        }
        if reference_name == Some(file_name.as_os_str()) {
            debug!("skipping the reference file {}", name);
            continue;
        }
        if let Some(token) = opts.exclude.iter().find(|t| name.contains(t.as_str())) {
            debug!("skipping {} as its name contains {:?}", name, token);
            continue;
        }
        files.push(entry.path());
    }

    files.sort();
    Ok(files)
}

/// The label printed above a report: the file name, or the whole path if it has none.
fn report_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Runs the full comparison described by `opts`, writing one report per comparison file
/// to `writer`. The reference is read once. The first error aborts the run; reports
/// already written are left in place.
pub fn run_comparison<W: Write>(opts: &CompareOptions, writer: &mut W) -> anyhow::Result<()> {
    opts.validate()?;

    let reference = GeneSet::from_path(&opts.reference, &opts.reference_slot)?;
    if reference.is_empty() {
        warn!(
            "The reference {} contains no gene records; the reports will be empty.",
            opts.reference.display()
        );
    }

    let comparisons = if opts.comparisons.is_empty() {
        discover_comparison_files(&opts.dir, opts)?
    } else {
        opts.comparisons.clone()
    };
    if comparisons.is_empty() {
        warn!("No comparison files found in {}.", opts.dir.display());
    }

    for path in comparisons.iter() {
        let comparison = GeneSet::from_path(path, &opts.comparison_slot)?;
        let n_missing = reference
            .iter()
            .filter(|(name, _)| !comparison.contains(name))
            .count();
        if n_missing > 0 {
            info!(
                "{} of {} reference genes are missing from {}.",
                n_missing,
                reference.len(),
                path.display()
            );
        }

        let rows = compare_gene_sets(&reference, &comparison)
            .with_context(|| format!("Failed comparing {}", path.display()))?;
        write_comparison_report(writer, &report_label(path), &rows)?;
    }
    writer.flush()?;
    Ok(())
}
