use crate::annot_utils::{get_reader_from_path, FileFormat, GENE_FEATURE};
use crate::error::AnnotError;
use crate::options::AttributeSlot;
use anyhow::Context;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info};

/// Column positions in a whitespace-split GFF3 line.
const TYPE_COL: usize = 2;
const START_COL: usize = 3;
const END_COL: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A `gene` feature reduced to its name and its length.
///
/// The length is the absolute distance between the start and end coordinates,
/// so records with reversed coordinates get the same length.
pub struct GeneRecord {
    pub name: String,
    pub length: u64,
}

impl GeneRecord {
    /// Parses one feature line.
    ///
    /// Returns `Ok(None)` for lines that are not gene records: lines with fewer than
    /// three whitespace-separated fields (headers, comments, blank lines) and lines
    /// whose feature type is anything other than `gene`.
    ///
    /// For gene records the 4th and 5th fields are the coordinates, and the gene name
    /// is read from the last field according to `slot` (see [parse_attribute_field]).
    ///
    /// ```rust
    /// use annotools::options::AttributeSlot;
    /// use annotools::reader::GeneRecord;
    ///
    /// let line = "NC_000932.1 Chloe gene 14024 14770 . - . ID=atpI;Name=atpI";
    /// let rec = GeneRecord::from_line(line, &AttributeSlot::reference()).unwrap().unwrap();
    /// assert_eq!(rec, GeneRecord { name: "atpI".to_string(), length: 746 });
    /// ```
    pub fn from_line(line: &str, slot: &AttributeSlot) -> Result<Option<GeneRecord>, AnnotError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() <= TYPE_COL || fields[TYPE_COL] != GENE_FEATURE {
            return Ok(None);
        }

        let start = parse_coordinate(&fields, START_COL, "start")?;
        let end = parse_coordinate(&fields, END_COL, "end")?;
        // fields is non-empty here
        let name = parse_attribute_field(fields[fields.len() - 1], slot)?;

        Ok(Some(GeneRecord {
            name,
            length: end.abs_diff(start),
        }))
    }
}

fn parse_coordinate(fields: &[&str], col: usize, field: &'static str) -> Result<i64, AnnotError> {
    let value = fields.get(col).ok_or(AnnotError::MissingField {
        field,
        found: fields.len(),
    })?;
    value
        .parse::<i64>()
        .map_err(|_| AnnotError::InvalidCoordinate {
            field,
            value: value.to_string(),
        })
}

/// Extracts the gene name from a `;`-separated `key=value` attribute field.
///
/// The pair at `slot.index` is selected and must start with `slot.key=`; everything
/// after that prefix is the name. A field without the requested pair, or with a pair
/// under a different key, is an error rather than a best-effort guess.
pub fn parse_attribute_field(field: &str, slot: &AttributeSlot) -> Result<String, AnnotError> {
    let pair = field
        .split(';')
        .nth(slot.index)
        .ok_or_else(|| AnnotError::MissingAttribute {
            field: field.to_string(),
            index: slot.index,
        })?;

    match pair.strip_prefix(slot.prefix().as_str()) {
        Some(name) => Ok(name.to_string()),
        None => Err(AnnotError::MalformedAttribute {
            key: slot.key.clone(),
            pair: pair.to_string(),
        }),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Gene name to gene length, ordered by name.
///
/// Built from the `gene` records of one annotation file. When a name occurs more than
/// once the last record wins.
pub struct GeneSet {
    genes: BTreeMap<String, u64>,
}

impl GeneSet {
    pub fn new() -> GeneSet {
        GeneSet::default()
    }

    /// Reads every `gene` record of an annotation file, transparently decompressing
    /// gzipped input. Errors carry the file path and the offending line number.
    pub fn from_path<T: AsRef<Path>>(file_path: T, slot: &AttributeSlot) -> anyhow::Result<GeneSet> {
        let file_path = file_path.as_ref();
        let rdr = get_reader_from_path(file_path, FileFormat::GFF)?;
        let gs = GeneSet::from_reader(rdr, slot)
            .with_context(|| format!("Failed reading genes from {}", file_path.display()))?;
        info!(
            "Read {} genes from {}.",
            gs.len(),
            file_path.display()
        );
        Ok(gs)
    }

    /// Reads every `gene` record from `rdr`.
    pub fn from_reader<R: BufRead>(rdr: R, slot: &AttributeSlot) -> anyhow::Result<GeneSet> {
        let mut gs = GeneSet::new();
        let mut n_duplicates = 0usize;

        for (i, l) in rdr.lines().enumerate() {
            let line = l?;
            let rec = GeneRecord::from_line(&line, slot)
                .with_context(|| format!("Failed parsing line {}: {:?}", i + 1, line))?;
            if let Some(rec) = rec {
                if let Some(prev) = gs.insert(rec) {
                    n_duplicates += 1;
                    debug!("gene record on line {} replaces a previous one of length {}", i + 1, prev);
                }
            }
        }

        if n_duplicates > 0 {
            info!(
                "Found {} repeated gene names; the last record of each was kept.",
                n_duplicates
            );
        }
        Ok(gs)
    }

    /// Inserts a record, returning the length it replaced, if any.
    pub fn insert(&mut self, rec: GeneRecord) -> Option<u64> {
        self.genes.insert(rec.name, rec.length)
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.genes.get(name).copied()
    }

    /// The length of `name`, or 0 when the gene is absent.
    pub fn length(&self, name: &str) -> u64 {
        self.get(name).unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.genes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Iterates `(name, length)` in lexicographic order of name.
    pub fn iter(&self) -> btree_map::Iter<'_, String, u64> {
        self.genes.iter()
    }
}

impl FromIterator<GeneRecord> for GeneSet {
    fn from_iter<I: IntoIterator<Item = GeneRecord>>(iter: I) -> GeneSet {
        let mut gs = GeneSet::new();
        for rec in iter {
            gs.insert(rec);
        }
        gs
    }
}
