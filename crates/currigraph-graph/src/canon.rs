use currigraph_core::{alias, NodeId};

/// Trim, drop empties, uppercase, and alias-normalize a code list, sorted
/// for order independence. The cleaned list is what gets stored on the
/// node, so every consumer sees canonical codes.
pub fn clean_codes<S: AsRef<str>>(codes: &[S]) -> Vec<String> {
    let mut cleaned: Vec<String> = codes
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| !c.is_empty())
        .map(|c| alias::normalize_code(&c.to_ascii_uppercase()))
        .collect();
    cleaned.sort();
    cleaned.dedup();
    cleaned
}

/// Canonical node id for a (codes, semester) pair: sorted cleaned codes
/// joined with `|`, then the trimmed semester. `['EDST-200','AMST-200']` +
/// `2223F` -> `AMST-200|EDST-200|2223F`, regardless of input order.
pub fn canon_node_id<S: AsRef<str>>(codes: &[S], semester: &str) -> NodeId {
    let mut parts = clean_codes(codes);
    parts.push(semester.trim().to_string());
    parts.join("|")
}
