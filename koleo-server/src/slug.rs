//! Station name slug handling.
//!
//! Koleo identifies stations in URLs by a lowercase hyphenated slug
//! (e.g. "warszawa-centralna"). This module derives slugs from
//! human-entered station names and detects inputs that already are slugs.

/// Transliterate one (already lowercased) character the way Koleo builds
/// its station slugs.
///
/// Polish diacritics map to their ASCII base letter; the separator
/// characters space, `/` and `_` become hyphens. Everything else is
/// preserved unchanged.
fn transliterate(c: char) -> char {
    match c {
        'ł' => 'l',
        'ń' => 'n',
        'ą' => 'a',
        'ę' => 'e',
        'ś' => 's',
        'ć' => 'c',
        'ó' => 'o',
        'ź' => 'z',
        'ż' => 'z',
        ' ' | '/' | '_' => '-',
        other => other,
    }
}

/// Convert a station name to its Koleo URL slug.
///
/// Lowercases the input and transliterates it character by character.
/// Repeated or leading/trailing separators are deliberately preserved:
/// the output must match what Koleo itself derives from the name, not a
/// cleaned-up variant.
///
/// # Examples
///
/// ```
/// use koleo_server::slug::to_slug;
///
/// assert_eq!(to_slug("Warszawa Centralna"), "warszawa-centralna");
/// assert_eq!(to_slug("Kraków Główny"), "krakow-glowny");
/// ```
pub fn to_slug(name: &str) -> String {
    name.to_lowercase().chars().map(transliterate).collect()
}

/// Heuristic check for whether a value already looks like a slug.
///
/// True iff the string contains at least one hyphen and is identical to
/// its own lowercase form. Single-word lowercase names (no hyphen) are
/// *not* treated as slugs; they go through [`to_slug`], which is a no-op
/// on anything this function accepts.
pub fn looks_like_slug(value: &str) -> bool {
    value.contains('-') && value.to_lowercase() == value
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A second pass never changes the result.
        #[test]
        fn to_slug_is_idempotent(s in "\\PC*") {
            let once = to_slug(&s);
            prop_assert_eq!(to_slug(&once), once.clone());
        }

        /// Whatever looks_like_slug accepts is already lowercase, so
        /// to_slug only ever touches table characters.
        #[test]
        fn slug_output_is_lowercase(s in "\\PC*") {
            let slug = to_slug(&s);
            prop_assert_eq!(slug.to_lowercase(), slug.clone());
        }

        /// Derived slugs of hyphenated names pass the heuristic.
        #[test]
        fn derived_two_word_names_look_like_slugs(a in "[a-zA-Zążęłóśćńź]{1,10}", b in "[a-zA-Zążęłóśćńź]{1,10}") {
            let slug = to_slug(&format!("{a} {b}"));
            prop_assert!(looks_like_slug(&slug));
        }
    }
}
