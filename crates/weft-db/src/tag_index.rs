//! Indexed tag names.
//!
//! A handful of tag names are promoted to dedicated columns on the
//! `transactions` table so equality filters on them hit a column index
//! instead of the generic `tags` table. The table is fixed at build time.

/// A tag name promoted to a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexedTag {
    /// Tag name as it appears on transactions (case-sensitive).
    pub name: &'static str,
    /// Column on `transactions` holding the tag value.
    pub column: &'static str,
}

/// All indexed tags.
pub const INDEXED_TAGS: &[IndexedTag] = &[
    IndexedTag {
        name: "App-Name",
        column: "app_name",
    },
    IndexedTag {
        name: "App-Version",
        column: "app_version",
    },
    IndexedTag {
        name: "Content-Type",
        column: "content_type",
    },
];

/// Column holding the value of an indexed tag, if `name` is indexed.
pub fn column_for(name: &str) -> Option<&'static str> {
    INDEXED_TAGS
        .iter()
        .find(|tag| tag.name == name)
        .map(|tag| tag.column)
}

/// Whether `name` is served by a dedicated column.
pub fn is_indexed(name: &str) -> bool {
    column_for(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_are_indexed() {
        assert!(is_indexed("App-Name"));
        assert_eq!(column_for("App-Name"), Some("app_name"));
        assert_eq!(column_for("Content-Type"), Some("content_type"));
    }

    #[test]
    fn test_lookup_is_exact() {
        assert!(!is_indexed("Custom"));
        assert!(!is_indexed("app-name"));
        assert!(!is_indexed(""));
    }
}
