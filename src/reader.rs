pub mod gff;
pub mod lineage;
pub use gff::{GeneRecord, GeneSet};
pub use lineage::{LineageEntry, Rank, RankTag};
