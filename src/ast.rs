//! Parsed representation of flow and group lines
//!
//! All nodes are owned trees built bottom-up while parsing. Sequences keep
//! source order; nothing here is ever sorted.
//!
//! Serialization lives in [`crate::formats::json`].

/// One argument or action position. `None` marks a position the source
/// left empty, as in `resubmit(,11)`.
pub type Slot = Option<Term>;

/// A parsed `dump-flows` line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    pub cookie: u64,
    pub table: u32,
    pub priority: u32,
    /// Flow accounting and flag fields (`duration`, `n_packets`, ...)
    pub meta: Vec<Field>,
    /// Match fields
    pub filters: Vec<Field>,
    pub actions: Vec<Slot>,
}

/// A header `key=value` pair exactly as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    /// Empty when the token had no `=`
    pub value: String,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A bare token such as `reset_counts` or `watch_port:1`
    pub fn flag(key: impl Into<String>) -> Self {
        Self::new(key, "")
    }
}

/// Action / argument node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub kind: TermKind,
    /// Set when the term came from a `label=value` construct
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermKind {
    /// A named node with positional argument slots
    Call { name: String, args: Vec<Slot> },
    /// An opaque literal, never decomposed further
    Leaf(String),
}

impl Term {
    pub fn leaf(text: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Leaf(text.into()),
            label: None,
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Slot>) -> Self {
        Self {
            kind: TermKind::Call {
                name: name.into(),
                args,
            },
            label: None,
        }
    }

    /// `field[lo..hi]` or `field[]`
    pub fn range(field: &str, bounds: Option<(&str, &str)>) -> Self {
        let mut args = vec![Some(Term::leaf(field))];
        if let Some((lo, hi)) = bounds {
            args.push(Some(Term::leaf(lo)));
            args.push(Some(Term::leaf(hi)));
        }
        Term::call("range", args)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The call name, or the literal text of a leaf
    pub fn name(&self) -> &str {
        match &self.kind {
            TermKind::Call { name, .. } => name,
            TermKind::Leaf(text) => text,
        }
    }

    pub fn args(&self) -> &[Slot] {
        match &self.kind {
            TermKind::Call { args, .. } => args,
            TermKind::Leaf(_) => &[],
        }
    }
}

/// A parsed `dump-groups` line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    pub group_id: u32,
    pub group_type: String,
    /// Fields before the first bucket, kept verbatim
    pub meta: Vec<Field>,
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bucket {
    pub id: u32,
    /// Tokens between `bucket=` and `actions=`, kept verbatim
    pub meta: Vec<Field>,
    pub actions: Vec<Slot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_shapes() {
        let bare = Term::range("NXM_OF_IP_DST", None);
        assert_eq!(bare.name(), "range");
        assert_eq!(bare.args().len(), 1);

        let bounded = Term::range("NXM_NX_REG4", Some(("0", "15")));
        assert_eq!(bounded.args().len(), 3);
        assert_eq!(bounded.args()[2], Some(Term::leaf("15")));
    }

    #[test]
    fn test_leaf_has_no_args() {
        let leaf = Term::leaf("NORMAL").with_label("x");
        assert_eq!(leaf.name(), "NORMAL");
        assert!(leaf.args().is_empty());
        assert_eq!(leaf.label.as_deref(), Some("x"));
    }
}
