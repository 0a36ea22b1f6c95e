//! Slug generation for blog posts

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern"));

/// Turn a title into a URL slug: lowercase ASCII letters and digits, runs of
/// anything else collapsed to one `-`, no leading or trailing `-`.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    NON_ALNUM
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_examples() {
        assert_eq!(slugify("How to Pick a Shed Size"), "how-to-pick-a-shed-size");
        assert_eq!(slugify("  10x12 Sheds: A Guide!  "), "10x12-sheds-a-guide");
        assert_eq!(slugify("Café & Garden"), "caf-garden");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify(""), "");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(20))]

            #[test]
            fn property_slug_charset(title in ".{0,60}") {
                let slug = slugify(&title);
                prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
                prop_assert!(!slug.starts_with('-'));
                prop_assert!(!slug.ends_with('-'));
                prop_assert!(!slug.contains("--"));
            }

            #[test]
            fn property_slug_is_idempotent(title in "[A-Za-z0-9 !?.,-]{0,60}") {
                let once = slugify(&title);
                prop_assert_eq!(slugify(&once), once.clone());
            }
        }
    }
}
