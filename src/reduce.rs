//! Reduction of free-form lineage columns to a fixed set of rank columns.

use crate::annot_utils::{get_reader_from_path, FileFormat, LEADING_COLUMNS, MISSING_RANK, RANK_VALUE_SEP};
use crate::error::AnnotError;
use crate::options::ReduceOptions;
use crate::reader::{LineageEntry, Rank};
use anyhow::Context;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Values collected for each kept rank of one row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankValues {
    values: HashMap<Rank, String>,
}

impl RankValues {
    pub fn new() -> RankValues {
        RankValues::default()
    }

    /// Adds a value for `rank`. The first value is stored as is; later values
    /// are appended after a `", "`.
    pub fn push(&mut self, rank: Rank, value: &str) {
        self.values
            .entry(rank)
            .and_modify(|v| {
                v.push_str(RANK_VALUE_SEP);
                v.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    pub fn get(&self, rank: Rank) -> Option<&str> {
        self.values.get(&rank).map(|v| v.as_str())
    }

    /// The value for `rank`, or `NA` when the row had none.
    pub fn get_or_na(&self, rank: Rank) -> &str {
        self.get(rank).unwrap_or(MISSING_RANK)
    }

    /// All six values in output column order.
    pub fn columns(&self) -> [&str; 6] {
        Rank::ALL.map(|r| self.get_or_na(r))
    }
}

/// Replaces the last header column with the six rank column names.
pub fn transform_header(line: &str) -> String {
    let fields: Vec<&str> = line.trim_end().split('\t').collect();
    let keep = fields.len().saturating_sub(1);

    let mut out = fields[..keep].join("\t");
    for r in Rank::ALL {
        out.push('\t');
        out.push_str(r.header());
    }
    out
}

/// Collects the kept ranks from a row's lineage tokens. `no rank` entries, entries of
/// other ranks and tokens without a rank are dropped.
pub fn collect_ranks<'a, I: IntoIterator<Item = &'a str>>(tokens: I) -> RankValues {
    let mut values = RankValues::new();
    for token in tokens {
        match token.parse::<LineageEntry>() {
            Ok(entry) => {
                if let Some(rank) = entry.kept_rank() {
                    values.push(rank, &entry.value);
                }
            }
            Err(e) => debug!("dropping lineage token: {}", e),
        }
    }
    values
}

/// Reduces one data row to its six leading columns followed by the six rank columns.
///
/// Only the line terminator is stripped from the whole line, so empty trailing columns
/// still count towards the six leading ones. Trailing whitespace is trimmed from a last
/// column that holds a lineage token.
pub fn reduce_row(line: &str) -> Result<String, AnnotError> {
    let mut fields: Vec<&str> = line.trim_end_matches(|c: char| c == '\r' || c == '\n').split('\t').collect();
    if fields.len() > LEADING_COLUMNS {
        if let Some(last) = fields.last_mut() {
            *last = last.trim_end();
        }
    }
    if fields.len() < LEADING_COLUMNS {
        return Err(AnnotError::TooFewColumns {
            expected: LEADING_COLUMNS,
            found: fields.len(),
        });
    }

    let values = collect_ranks(fields[LEADING_COLUMNS..].iter().copied());
    let mut out = fields[..LEADING_COLUMNS].join("\t");
    for v in values.columns() {
        out.push('\t');
        out.push_str(v);
    }
    Ok(out)
}

/// Streams a lineage summary table from `rdr` to `writer`, returning the number of
/// data rows written. Blank data lines are skipped; an empty input writes nothing.
pub fn reduce_lineage_table<R: BufRead, W: Write>(rdr: R, writer: &mut W) -> anyhow::Result<usize> {
    let mut lines = rdr.lines();
    let header = match lines.next() {
        Some(h) => h?,
        None => return Ok(0),
    };
    writeln!(writer, "{}", transform_header(&header))?;

    let mut n_rows = 0usize;
    for (i, l) in lines.enumerate() {
        let line = l?;
        if line.trim().is_empty() {
            continue;
        }
        // the header is line 1
        let row = reduce_row(&line).with_context(|| format!("Failed reducing line {}", i + 2))?;
        writeln!(writer, "{}", row)?;
        n_rows += 1;
    }
    Ok(n_rows)
}

/// Runs the reduction described by `opts`, writing the reduced table to `writer`.
pub fn run_reduction<W: Write>(opts: &ReduceOptions, writer: &mut W) -> anyhow::Result<()> {
    let rdr = get_reader_from_path(&opts.input, FileFormat::TSV)?;
    let n_rows = reduce_lineage_table(rdr, writer)
        .with_context(|| format!("Failed reducing {}", opts.input.display()))?;
    writer.flush()?;
    info!(
        "Reduced {} rows from {}.",
        n_rows,
        opts.input.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY_TSV: &[u8] = b"sample\tcontig\tlength\treads\tcoverage\thits\tlineage\n\
s1\tctg1\t1500\t200\t13.3\t4\tcellular organisms (no rank)\tBacteria (superkingdom)\tProteobacteria (phylum)\tGammaproteobacteria (class)\tEnterobacterales (order)\tEnterobacteriaceae (family)\tEscherichia (genus)\tEscherichia coli (species)\n\
s1\tctg2\t900\t50\t5.5\t1\n\
\n\
s2\tctg3\t2100\t10\t0.4\t2\tBacteria (superkingdom)\tArchaea (superkingdom)\tunclassified\tFirmicutes (phylum)\tBacilli (class)\n";

    #[test]
    fn test_rank_values() {
        let mut v = RankValues::new();
        assert_eq!(v.get_or_na(Rank::Genus), "NA");
        v.push(Rank::Superkingdom, "Bacteria");
        v.push(Rank::Superkingdom, "Archaea");
        assert_eq!(v.get(Rank::Superkingdom), Some("Bacteria, Archaea"));
        assert_eq!(
            v.columns(),
            ["Bacteria, Archaea", "NA", "NA", "NA", "NA", "NA"]
        );
    }

    #[test]
    fn test_transform_header() {
        assert_eq!(
            transform_header("a\tb\tc\td\te\tf\tlineage\n"),
            "a\tb\tc\td\te\tf\tSuperkingdom\tClass\tOrder\tFamily\tGenus\tSpecies"
        );
        assert_eq!(
            transform_header("only"),
            "\tSuperkingdom\tClass\tOrder\tFamily\tGenus\tSpecies"
        );
    }

    #[test]
    fn test_reduce_row_full_lineage() {
        let row = reduce_row("s1\tctg1\t1500\t200\t13.3\t4\tcellular organisms (no rank)\tBacteria (superkingdom)\tProteobacteria (phylum)\tGammaproteobacteria (class)\tEnterobacterales (order)\tEnterobacteriaceae (family)\tEscherichia (genus)\tEscherichia coli (species)").unwrap();
        assert_eq!(
            row,
            "s1\tctg1\t1500\t200\t13.3\t4\tBacteria\tGammaproteobacteria\tEnterobacterales\tEnterobacteriaceae\tEscherichia\tEscherichia coli"
        );
    }

    #[test]
    fn test_reduce_row_multi_valued_and_missing() {
        let row = reduce_row("s2\tctg3\t2100\t10\t0.4\t2\tBacteria (superkingdom)\tArchaea (superkingdom)\tBacilli (class)").unwrap();
        let cols: Vec<&str> = row.split('\t').collect();
        assert_eq!(cols.len(), 12);
        assert_eq!(cols[6], "Bacteria, Archaea");
        assert_eq!(cols[7], "Bacilli");
        assert_eq!(cols[10], "NA");
    }

    #[test]
    fn test_reduce_row_column_count() {
        let row = reduce_row("a\tb\tc\td\te\tf").unwrap();
        assert_eq!(row, "a\tb\tc\td\te\tf\tNA\tNA\tNA\tNA\tNA\tNA");

        let row = reduce_row("a\tb\tc\td\te\t\t\r\n").unwrap();
        assert_eq!(row.split('\t').count(), 12);
        assert!(row.starts_with("a\tb\tc\td\te\t\tNA"));

        assert_eq!(
            reduce_row("a\tb\tc"),
            Err(AnnotError::TooFewColumns {
                expected: 6,
                found: 3
            })
        );
    }

    #[test]
    fn test_reduce_row_trailing_whitespace() {
        let row = reduce_row("a\tb\tc\td\te\tf\tBacteria (superkingdom)\tEscherichia coli (species) ").unwrap();
        assert_eq!(
            row,
            "a\tb\tc\td\te\tf\tBacteria\tNA\tNA\tNA\tNA\tEscherichia coli"
        );

        let row = reduce_row("a\tb\tc\td\te\tf\tEscherichia (genus)  \r\n").unwrap();
        assert_eq!(row.split('\t').nth(10), Some("Escherichia"));

        // a blank sixth column is kept as a column
        let row = reduce_row("a\tb\tc\td\te\t ").unwrap();
        assert_eq!(row, "a\tb\tc\td\te\t \tNA\tNA\tNA\tNA\tNA\tNA");
    }

    #[test]
    fn test_reduce_table() {
        let mut out = Vec::new();
        let n = reduce_lineage_table(SUMMARY_TSV, &mut out).unwrap();
        assert_eq!(n, 3);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("hits\tSuperkingdom\tClass\tOrder\tFamily\tGenus\tSpecies"));
        assert!(lines.iter().all(|l| l.split('\t').count() == 12));
        assert_eq!(
            lines[2],
            "s1\tctg2\t900\t50\t5.5\t1\tNA\tNA\tNA\tNA\tNA\tNA"
        );
        assert!(lines[3].starts_with("s2\tctg3\t2100\t10\t0.4\t2\tBacteria, Archaea\tBacilli\t"));
    }

    #[test]
    fn test_reduce_empty_table() {
        let mut out = Vec::new();
        assert_eq!(reduce_lineage_table(&b""[..], &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_reduce_table_error_names_line() {
        let tsv: &[u8] = b"h1\th2\th3\th4\th5\th6\th7\nshort\trow\n";
        let mut out = Vec::new();
        let err = reduce_lineage_table(tsv, &mut out).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }
}
