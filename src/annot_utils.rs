use anyhow::Context;
use flate2::bufread::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::trace;

/// Type alias for a line reader over either a compressed or an uncompressed input.
pub type InputReader = Box<dyn BufRead>;

/// Number of leading summary columns passed through unchanged by the lineage reducer.
pub const LEADING_COLUMNS: usize = 6;

/// Placeholder written for a rank that is absent from a row's lineage.
pub const MISSING_RANK: &str = "NA";

/// Rank tag of lineage entries that carry no taxonomic level.
pub const NO_RANK: &str = "no rank";

/// Separator between accumulated values of the same rank.
pub const RANK_VALUE_SEP: &str = ", ";

/// Line written before each comparison table.
pub const REPORT_SEPARATOR: &str = "----";

/// File name suffix of discovered comparison annotations.
pub const GFF_SUFFIX: &str = "gff3";

/// Feature type of the records the gene comparison keeps.
pub const GENE_FEATURE: &str = "gene";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// The text formats read by this crate.
///
/// * `GFF` - GFF3 gene feature tables, read by the gene length comparison.
/// * `TSV` - tab-separated lineage summary tables, read by the rank reducer.
pub enum FileFormat {
    GFF,
    TSV,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::GFF => write!(f, "GFF"),
            FileFormat::TSV => write!(f, "TSV"),
        }
    }
}

/// Tests if the stream underlying the [BufRead] `reader` is gzipped or not by examining the
/// first 2 bytes for the magic header. This function *requires*, but does not check, that
/// none of the stream has yet been consumed. It will fill the buffer to examine the first
/// two bytes, but will not consume them.
///
/// Returns [Ok]`(true)` for a gzipped stream, [Ok]`(false)` otherwise, and the relevant
/// [std::io::Error] if the buffer could not be filled.
pub fn is_gzipped<T: BufRead>(reader: &mut T) -> std::io::Result<bool> {
    const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

    let src = reader.fill_buf()?;
    if src.get(..2) == Some(&GZIP_MAGIC_NUMBER) {
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Wraps `r` in a line reader, decompressing on the fly when the stream is gzipped.
///
/// **Note** : this function *takes ownership* of the underlying reader, which
/// is the reason behind the `'static` lifetime bound.
pub fn get_reader_from_reader(
    r: impl Read + 'static,
    file_format: FileFormat,
) -> anyhow::Result<InputReader> {
    let mut inner_rdr = BufReader::new(r);
    if is_gzipped(&mut inner_rdr)? {
        trace!(
            "auto-detected gzipped {} input - reading via decompression",
            file_format
        );
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(inner_rdr))))
    } else {
        Ok(Box::new(inner_rdr))
    }
}

/// Opens the file at `p` as a line reader, transparently handling gzip compression.
pub fn get_reader_from_path<T: AsRef<Path>>(
    p: T,
    file_format: FileFormat,
) -> anyhow::Result<InputReader> {
    let file = File::open(p.as_ref()).with_context(|| {
        format!(
            "Could not open the {} file {}",
            file_format,
            p.as_ref().display()
        )
    })?;
    get_reader_from_reader(file, file_format)
}

/// Returns `true` for names the shell glob `*` would not match.
pub(crate) fn is_hidden(file_name: &str) -> bool {
    file_name.starts_with('.')
}
