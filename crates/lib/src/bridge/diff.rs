//! Minimal single-splice diff between two strings.

/// One text splice: delete `delete` chars at `pos`, then insert `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextSplice {
    pub pos: usize,
    pub delete: usize,
    pub insert: String,
}

/// Computes the minimal single splice turning `old` into `new`.
///
/// Returns `None` when the strings are equal. Positions and counts are char
/// offsets, matching the document's splice primitive.
pub(crate) fn splice_for(old: &str, new: &str) -> Option<TextSplice> {
    if old == new {
        return None;
    }
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();

    let mut prefix = 0;
    while prefix < old_chars.len()
        && prefix < new_chars.len()
        && old_chars[prefix] == new_chars[prefix]
    {
        prefix += 1;
    }

    let mut suffix = 0;
    while suffix < old_chars.len() - prefix
        && suffix < new_chars.len() - prefix
        && old_chars[old_chars.len() - 1 - suffix] == new_chars[new_chars.len() - 1 - suffix]
    {
        suffix += 1;
    }

    Some(TextSplice {
        pos: prefix,
        delete: old_chars.len() - prefix - suffix,
        insert: new_chars[prefix..new_chars.len() - suffix].iter().collect(),
    })
}
