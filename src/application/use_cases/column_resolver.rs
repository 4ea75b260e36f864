// ============================================================
// COLUMN RESOLVER
// ============================================================
// Locate logical fields in a catalog header by candidate names

use once_cell::sync::Lazy;
use regex::Regex;

/// `Web name (EN)` / `Web име (EN)` columns announce a destination language
static LANGUAGE_COLUMN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Web (?:name|име) \((.+)\)").unwrap());

/// Flexible lookup: for each candidate in order, return the first header cell
/// that equals it, equals it wrapped in parentheses, or contains it, all
/// compared case-insensitively. `None` when nothing matches.
pub fn resolve<S: AsRef<str>>(header: &[String], candidates: &[S]) -> Option<usize> {
    let header_lower: Vec<String> = header.iter().map(|h| h.to_lowercase()).collect();

    for candidate in candidates {
        let needle = candidate.as_ref().to_lowercase();
        let wrapped = format!("({})", needle);

        let found = header_lower
            .iter()
            .position(|h| *h == needle || *h == wrapped || h.contains(&needle));
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Strict lookup: first candidate that equals a header cell exactly.
pub fn resolve_exact<S: AsRef<str>>(header: &[String], candidates: &[S]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|candidate| header.iter().position(|h| h == candidate.as_ref()))
}

/// Expand `{lang}` in each pattern with the upper-cased language code
/// (`"Title ({lang})"` + `en` -> `"Title (EN)"`).
pub fn localized(patterns: &[&str], lang: &str) -> Vec<String> {
    let code = lang.to_uppercase();
    patterns.iter().map(|p| p.replace("{lang}", &code)).collect()
}

/// Destination languages announced by the header, lower-cased,
/// deduplicated, in order of first appearance.
pub fn discover_languages(header: &[String]) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for cell in header {
        if let Some(caps) = LANGUAGE_COLUMN_PATTERN.captures(cell) {
            let code = caps[1].trim().to_lowercase();
            if !code.is_empty() && !languages.contains(&code) {
                languages.push(code);
            }
        }
    }
    languages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_parenthesized_id_column() {
        let header = header(&["(id)", "Name (EN)"]);
        assert_eq!(resolve(&header, &["id", "(id)"]), Some(0));
    }

    #[test]
    fn test_substring_match() {
        let header = header(&["Code", "Product Name (EN) Extended"]);
        assert_eq!(resolve(&header, &["Name (EN)"]), Some(1));
    }

    #[test]
    fn test_case_insensitive_cyrillic() {
        let header = header(&["ID", "АРТИКУЛНА ГРУПА (EN)"]);
        assert_eq!(resolve(&header, &["Артикулна група (EN)", "Name (EN)"]), Some(1));
    }

    #[test]
    fn test_first_candidate_wins_over_column_order() {
        let header = header(&["Description (EN)", "Бележка (EN)"]);
        assert_eq!(resolve(&header, &["Бележка (EN)", "Description (EN)"]), Some(1));
    }

    #[test]
    fn test_absent_column() {
        let header = header(&["Code", "Price"]);
        assert_eq!(resolve(&header, &["Meta Title (EN)"]), None);
    }

    #[test]
    fn test_exact_lookup_ignores_substrings() {
        let header = header(&["Product Code", "SKU"]);
        assert_eq!(resolve_exact(&header, &["Code", "SKU"]), Some(1));
        assert_eq!(resolve_exact(&header, &["code"]), None);
    }

    #[test]
    fn test_localized_candidates() {
        let candidates = localized(&["Web name ({lang})", "Title ({lang})"], "de");
        assert_eq!(candidates, vec!["Web name (DE)", "Title (DE)"]);

        let header = header(&["Code", "Title (DE)"]);
        assert_eq!(resolve_exact(&header, &candidates), Some(1));
    }

    #[test]
    fn test_discover_languages() {
        let header = header(&[
            "Code",
            "Web name (EN)",
            "Web описание (EN)",
            "Web име (DE)",
            "Web name (en)",
            "Title (FR)",
        ]);
        assert_eq!(discover_languages(&header), vec!["en", "de"]);
    }
}
