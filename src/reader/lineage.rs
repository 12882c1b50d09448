use crate::annot_utils::NO_RANK;
use crate::error::AnnotError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// The taxonomic ranks kept by the lineage reducer, in output column order.
pub enum Rank {
    Superkingdom,
    Class,
    Order,
    Family,
    Genus,
    Species,
}

impl Rank {
    /// All kept ranks in output column order.
    pub const ALL: [Rank; 6] = [
        Rank::Superkingdom,
        Rank::Class,
        Rank::Order,
        Rank::Family,
        Rank::Genus,
        Rank::Species,
    ];

    /// The rank as it appears inside a lineage entry's parentheses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Superkingdom => "superkingdom",
            Rank::Class => "class",
            Rank::Order => "order",
            Rank::Family => "family",
            Rank::Genus => "genus",
            Rank::Species => "species",
        }
    }

    /// The rank's column name in the reduced table header.
    pub fn header(&self) -> &'static str {
        match self {
            Rank::Superkingdom => "Superkingdom",
            Rank::Class => "Class",
            Rank::Order => "Order",
            Rank::Family => "Family",
            Rank::Genus => "Genus",
            Rank::Species => "Species",
        }
    }

    /// Looks up a kept rank by its lowercase name.
    pub fn from_name(name: &str) -> Option<Rank> {
        match name {
            "superkingdom" => Some(Rank::Superkingdom),
            "class" => Some(Rank::Class),
            "order" => Some(Rank::Order),
            "family" => Some(Rank::Family),
            "genus" => Some(Rank::Genus),
            "species" => Some(Rank::Species),
            _ => None,
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The rank tag of a lineage entry.
///
/// * `Kept` - one of the six ranks the reducer reports.
/// * `NoRank` - the literal `no rank` tag.
/// * `Other` - any other rank, e.g. `phylum`, `clade` or `tribe`.
pub enum RankTag {
    Kept(Rank),
    NoRank,
    Other(String),
}

impl From<&str> for RankTag {
    fn from(s: &str) -> RankTag {
        if s == NO_RANK {
            RankTag::NoRank
        } else if let Some(r) = Rank::from_name(s) {
            RankTag::Kept(r)
        } else {
            RankTag::Other(s.to_string())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One `text (rank)` token of a lineage column.
pub struct LineageEntry {
    pub value: String,
    pub tag: RankTag,
}

impl LineageEntry {
    /// The kept rank of this entry, if any.
    pub fn kept_rank(&self) -> Option<Rank> {
        match self.tag {
            RankTag::Kept(r) => Some(r),
            _ => None,
        }
    }
}

impl std::str::FromStr for LineageEntry {
    type Err = AnnotError;

    /// Parses a lineage token.
    ///
    /// The rank is the text after the last `(` in the part of the token before the
    /// first `:`, with any `)` removed. The value is the token with every
    /// ` (<rank>)` removed.
    ///
    /// ```rust
    /// use annotools::reader::{LineageEntry, Rank, RankTag};
    ///
    /// let e: LineageEntry = "Escherichia coli (species)".parse().unwrap();
    /// assert_eq!(e.value, "Escherichia coli");
    /// assert_eq!(e.tag, RankTag::Kept(Rank::Species));
    /// ```
    fn from_str(s: &str) -> Result<LineageEntry, AnnotError> {
        // split always yields at least one item
        let head = s.split(':').next().unwrap_or(s);
        let open = head
            .rfind('(')
            .ok_or_else(|| AnnotError::MalformedLineageEntry(s.to_string()))?;
        let rank = head[open + 1..].replace(')', "");
        let value = s.replace(&format!(" ({})", rank), "");

        Ok(LineageEntry {
            value,
            tag: RankTag::from(rank.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_names() {
        for r in Rank::ALL {
            assert_eq!(Rank::from_name(r.as_str()), Some(r));
            assert_eq!(r.header().to_lowercase(), r.as_str());
        }
        assert_eq!(Rank::from_name("phylum"), None);
        assert_eq!(Rank::from_name("Genus"), None);
        assert_eq!(Rank::Superkingdom.to_string(), "superkingdom");
    }

    #[test]
    fn test_rank_tag() {
        assert_eq!(RankTag::from("genus"), RankTag::Kept(Rank::Genus));
        assert_eq!(RankTag::from("no rank"), RankTag::NoRank);
        assert_eq!(
            RankTag::from("subfamily"),
            RankTag::Other(String::from("subfamily"))
        );
    }

    #[test]
    fn test_parse_entry() {
        let e: LineageEntry = "Bacteria (superkingdom)".parse().unwrap();
        assert_eq!(e.value, "Bacteria");
        assert_eq!(e.kept_rank(), Some(Rank::Superkingdom));

        let e: LineageEntry = "cellular organisms (no rank)".parse().unwrap();
        assert_eq!(e.tag, RankTag::NoRank);
        assert_eq!(e.kept_rank(), None);

        let e: LineageEntry = "Proteobacteria (phylum)".parse().unwrap();
        assert_eq!(e.tag, RankTag::Other(String::from("phylum")));
    }

    #[test]
    fn test_parse_entry_with_colon_suffix() {
        // the rank comes from the part before the first colon
        let e: LineageEntry = "Enterobacterales (order): 12.5".parse().unwrap();
        assert_eq!(e.kept_rank(), Some(Rank::Order));
        assert_eq!(e.value, "Enterobacterales: 12.5");
    }

    #[test]
    fn test_parse_entry_nested_parentheses() {
        let e: LineageEntry = "Bacillus (in: Bacteria) (genus)".parse().unwrap();
        // only the text before the first colon is searched for the rank
        assert_eq!(e.tag, RankTag::Other(String::from("in")));

        let e: LineageEntry = "Candidatus Pelagibacter (genus) (genus)".parse().unwrap();
        assert_eq!(e.value, "Candidatus Pelagibacter");
        assert_eq!(e.kept_rank(), Some(Rank::Genus));
    }

    #[test]
    fn test_parse_entry_without_rank() {
        assert_eq!(
            "Bacteria".parse::<LineageEntry>(),
            Err(AnnotError::MalformedLineageEntry(String::from("Bacteria")))
        );
        assert!("".parse::<LineageEntry>().is_err());
        assert!("text: (genus)".parse::<LineageEntry>().is_err());
    }
}
