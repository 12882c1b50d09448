//! annotools provides two small analyses over genome annotation text files:
//!
//! * [compare] reads a reference GFF3 annotation and one or more comparison annotations
//!   and reports, per reference gene, how much the gene length deviates in each comparison.
//! * [reduce] collapses the free-form taxonomic lineage columns of a tab-separated summary
//!   table into six fixed rank columns (superkingdom, class, order, family, genus, species).
//!
//! Both are exposed as plain functions over readers and writers, and are wrapped by the
//! `annotools` command-line tool.

pub mod annot_utils;
pub mod compare;
pub mod error;
pub mod options;
pub mod reader;
pub mod reduce;
pub use compare::{run_comparison, GeneComparison};
pub use error::AnnotError;
pub use reduce::{run_reduction, RankValues};
