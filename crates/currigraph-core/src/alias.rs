use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Historical department prefixes merged into their current catalog prefix.
/// A department that changed its code across years still canonicalizes to
/// one identity, so offerings of the renamed department land on the same
/// graph nodes and count as one subject.
static DEPARTMENT_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("WAGS", "SWAG"),
        ("THEA", "THDA"),
        ("ARHI", "ARHA"),
    ])
});

/// Map a department prefix through the alias table. Unknown prefixes pass
/// through unchanged. Expects an uppercased prefix.
pub fn normalize_department(prefix: &str) -> &str {
    DEPARTMENT_ALIASES.get(prefix).copied().unwrap_or(prefix)
}

/// Apply alias normalization to a full course code, rewriting each
/// slash-separated prefix segment and leaving the number untouched:
/// `WAGS-200` -> `SWAG-200`, `WAGS/ENGL-221` -> `SWAG/ENGL-221`.
pub fn normalize_code(code: &str) -> String {
    match code.split_once('-') {
        Some((prefix, rest)) => {
            let mapped: Vec<&str> = prefix
                .split('/')
                .map(|p| normalize_department(p))
                .collect();
            format!("{}-{}", mapped.join("/"), rest)
        }
        None => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_prefixes_are_rewritten() {
        assert_eq!(normalize_department("WAGS"), "SWAG");
        assert_eq!(normalize_department("ECON"), "ECON");
    }

    #[test]
    fn codes_keep_their_number() {
        assert_eq!(normalize_code("WAGS-200"), "SWAG-200");
        assert_eq!(normalize_code("WAGS/ENGL-221"), "SWAG/ENGL-221");
        assert_eq!(normalize_code("ECON-111"), "ECON-111");
    }
}
