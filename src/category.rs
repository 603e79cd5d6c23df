use std::fmt;

/// Sentence categories and the prefix rules that select them.

/// The log a sentence is routed to.
///
/// `Raw` is implicit: every line is written there. The other three are
/// mutually exclusive and chosen by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Raw,
    Gps,
    Ais,
    Debug,
}

/// Prefix rules checked in order; the first match wins.
const PREFIX_RULES: [(&str, Category); 3] = [
    ("$GNGLL", Category::Gps),
    ("!AIVDM", Category::Ais),
    ("$P", Category::Debug),
];

impl Category {
    /// All categories, in destination order.
    pub const ALL: [Category; 4] = [Category::Raw, Category::Gps, Category::Ais, Category::Debug];

    /// Position of this category's destination in the logger.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Category::Raw => 0,
            Category::Gps => 1,
            Category::Ais => 2,
            Category::Debug => 3,
        }
    }

    /// File name prefix: `raw`, `GPS`, `AIS` or `DBG`.
    pub const fn file_prefix(self) -> &'static str {
        match self {
            Category::Raw => "raw",
            Category::Gps => "GPS",
            Category::Ais => "AIS",
            Category::Debug => "DBG",
        }
    }

    /// Short label used by the terminal view.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Raw => "RAW",
            Category::Gps => "GPS",
            Category::Ais => "AIS",
            Category::Debug => "DBG",
        }
    }

    /// Log file name for a run, e.g. `GPS16102026094107.log`.
    pub fn file_name(self, run_stamp: &str) -> String {
        format!("{}{}.log", self.file_prefix(), run_stamp)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Picks the category of an already-stripped sentence.
///
/// Returns `None` for lines that match no rule; those are recorded in the
/// raw log only.
///
/// # Examples
///
/// ```
/// # use sentence_logger::category::{classify, Category};
/// assert_eq!(classify("$GNGLL,4916.45,N,12311.12,W,225444,A"), Some(Category::Gps));
/// assert_eq!(classify("!AIVDM,1,1,,B,abc,0*1A"), Some(Category::Ais));
/// assert_eq!(classify("$PGRMZ,wobble"), Some(Category::Debug));
/// assert_eq!(classify("$GPGGA,123519"), None);
/// ```
pub fn classify(text: &str) -> Option<Category> {
    PREFIX_RULES
        .iter()
        .find(|(prefix, _)| text.starts_with(prefix))
        .map(|&(_, category)| category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        assert_eq!(classify("$GNGLL"), Some(Category::Gps));
        assert_eq!(classify("$PGNGLL"), Some(Category::Debug));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        assert_eq!(classify("$gngll,1"), None);
        assert_eq!(classify("!aivdm,1"), None);
        assert_eq!(classify("$p"), None);
    }

    #[test]
    fn test_empty_and_partial_prefixes() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("$"), None);
        assert_eq!(classify("$GNGL"), None);
        assert_eq!(classify("!AIVDO,1,1"), None);
    }

    #[test]
    fn test_indices_are_dense() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(Category::Raw.file_name("01022024030405"), "raw01022024030405.log");
        assert_eq!(Category::Debug.file_name("01022024030405"), "DBG01022024030405.log");
    }
}
