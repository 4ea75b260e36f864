/// Build a URL slug from a display name.
///
/// Lower-cases, keeps alphanumerics (any script), collapses every other run
/// of characters into a single dash.
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<String>()
            } else {
                "-".to_string()
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_ascii() {
        assert_eq!(slugify("Red Widgets"), "red-widgets");
        assert_eq!(slugify("  Garden & Patio -- Tools "), "garden-patio-tools");
    }

    #[test]
    fn test_slugify_keeps_cyrillic() {
        assert_eq!(slugify("Градински Мебели"), "градински-мебели");
    }
}
