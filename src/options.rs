use crate::annot_utils::GFF_SUFFIX;
use anyhow::bail;
use std::path::PathBuf;

/// Default reference annotation read by the gene comparison.
pub const DEFAULT_REFERENCE: &str = "NC_000932.1.gff3";

/// Default lineage summary table read by the rank reducer.
pub const DEFAULT_LINEAGE_TABLE: &str = "all_cat.summary.tsv";

#[derive(Clone, Debug, PartialEq, Eq)]
/// Selects the gene name from a GFF3 attribute column.
///
/// The attribute column is split on `;` and the pair at `index` is taken. That pair
/// must read `key=<name>`; the `key=` prefix is stripped and the remainder is the name.
///
/// The two annotation sources compared by this crate order their attributes differently,
/// so the reference and the comparison side carry separate slots:
///
/// ```rust
/// use annotools::options::AttributeSlot;
/// assert_eq!(AttributeSlot::reference(), AttributeSlot::new(0, "ID"));
/// assert_eq!(AttributeSlot::comparison(), AttributeSlot::new(1, "Name"));
/// ```
pub struct AttributeSlot {
    pub index: usize,
    pub key: String,
}

impl AttributeSlot {
    pub fn new<T: ToString>(index: usize, key: T) -> AttributeSlot {
        AttributeSlot {
            index,
            key: key.to_string(),
        }
    }

    /// `ID` from the first attribute pair.
    pub fn reference() -> AttributeSlot {
        AttributeSlot::new(0, "ID")
    }

    /// `Name` from the second attribute pair.
    pub fn comparison() -> AttributeSlot {
        AttributeSlot::new(1, "Name")
    }

    /// The literal prefix stripped from the selected pair.
    pub fn prefix(&self) -> String {
        format!("{}=", self.key)
    }
}

#[derive(Clone, Debug)]
/// Configuration of a gene length comparison run.
///
/// # Fields
///
/// * `reference`: the reference annotation; every gene in it gets a row in each report.
/// * `comparisons`: explicit comparison files. When empty, files are discovered in `dir`.
/// * `dir`: directory scanned for comparison files.
/// * `suffix`: discovered files must end with this suffix.
/// * `exclude`: discovered files whose name contains any of these tokens are skipped.
///   The reference file itself is always skipped.
/// * `reference_slot`, `comparison_slot`: where to find gene names on each side.
pub struct CompareOptions {
    pub reference: PathBuf,
    pub comparisons: Vec<PathBuf>,
    pub dir: PathBuf,
    pub suffix: String,
    pub exclude: Vec<String>,
    pub reference_slot: AttributeSlot,
    pub comparison_slot: AttributeSlot,
}

impl Default for CompareOptions {
    fn default() -> CompareOptions {
        CompareOptions {
            reference: PathBuf::from(DEFAULT_REFERENCE),
            comparisons: Vec::new(),
            dir: PathBuf::from("."),
            suffix: GFF_SUFFIX.to_string(),
            exclude: vec![String::from("NC")],
            reference_slot: AttributeSlot::reference(),
            comparison_slot: AttributeSlot::comparison(),
        }
    }
}

impl CompareOptions {
    /// Checks that the options can describe a run at all.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.suffix.is_empty() && self.comparisons.is_empty() {
            bail!("An empty suffix would match every file in {:?}; pass comparison files explicitly instead.", self.dir);
        }
        for slot in [&self.reference_slot, &self.comparison_slot] {
            if slot.key.is_empty() {
                bail!(
                    "The attribute key for slot {} cannot be empty.",
                    slot.index
                );
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
/// Configuration of a lineage rank reduction run.
pub struct ReduceOptions {
    pub input: PathBuf,
}

impl Default for ReduceOptions {
    fn default() -> ReduceOptions {
        ReduceOptions {
            input: PathBuf::from(DEFAULT_LINEAGE_TABLE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_compare_options() {
        let opts = CompareOptions::default();
        assert_eq!(opts.reference, PathBuf::from("NC_000932.1.gff3"));
        assert_eq!(opts.suffix, "gff3");
        assert_eq!(opts.exclude, vec![String::from("NC")]);
        assert_eq!(opts.reference_slot.prefix(), "ID=");
        assert_eq!(opts.comparison_slot.prefix(), "Name=");
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let opts = CompareOptions {
            suffix: String::new(),
            ..Default::default()
        };
        assert!(opts.validate().is_err());

        let opts = CompareOptions {
            suffix: String::new(),
            comparisons: vec![PathBuf::from("a.gff3")],
            ..Default::default()
        };
        assert!(opts.validate().is_ok());

        let opts = CompareOptions {
            comparison_slot: AttributeSlot::new(1, ""),
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }
}
