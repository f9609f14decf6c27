//! Public-ID slug generation

use rand::Rng;

/// Convert a free-text name to a lowercase slug: runs of non-alphanumeric
/// characters collapse to a single `-`, leading/trailing separators are
/// trimmed. Result contains only `[a-z0-9-]` and may be empty.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Zero-padded random 4-digit suffix ("0000".."9999")
pub fn random_suffix() -> String {
    format!("{:04}", rand::thread_rng().gen_range(0..10000))
}

/// Candidate public ID for a record: slug plus random suffix.
///
/// No uniqueness is guaranteed here; the caller checks the candidate against
/// the store and retries on collision.
pub fn public_id_candidate(name: &str) -> String {
    format!("{}-{}", slugify(name), random_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_clean(slug: &str) {
        assert!(
            slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
            "bad slug {slug:?}"
        );
        assert!(!slug.starts_with('-'), "leading separator in {slug:?}");
        assert!(!slug.ends_with('-'), "trailing separator in {slug:?}");
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Indian Banyan"), "indian-banyan");
        assert_eq!(slugify("Neem"), "neem");
    }

    #[test]
    fn slugify_collapses_runs_and_trims() {
        assert_eq!(slugify("  Flame -- of the Forest!! "), "flame-of-the-forest");
        assert_eq!(slugify("--x--"), "x");
    }

    #[test]
    fn slugify_handles_degenerate_inputs() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!***"), "");
        assert_eq!(slugify("देवदार"), "");
        for input in ["", "a b", "Ashoka (Saraca asoca)", "21st-century tree", "देवदार cedar"] {
            assert_clean(&slugify(input));
        }
    }

    #[test]
    fn random_suffix_is_four_digits() {
        for _ in 0..100 {
            let s = random_suffix();
            assert_eq!(s.len(), 4);
            assert!(s.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn public_id_joins_slug_and_suffix() {
        let id = public_id_candidate("Indian Banyan");
        assert!(id.starts_with("indian-banyan-"));
        assert_eq!(id.len(), "indian-banyan-".len() + 4);
    }
}
