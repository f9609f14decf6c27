//! Parser for AI-generated tree profiles
//!
//! The text generator is asked for a fixed, ordered section structure; its
//! output is still free text, so parsing is line-prefix matching and must
//! never fail. Missing sections come back as empty strings, unrecognized
//! headers fold into whatever section is currently open.

use std::collections::BTreeMap;

/// Structured result of parsing one AI response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeProfile {
    pub description: String,
    pub medicinal_benefits: String,
    pub environmental_benefits: String,
    /// Normalized to "Yes" or "No"
    pub native: String,
    pub category: String,
    /// Only keys actually present in the response are populated
    /// (kingdom, phylum, class, order, family, genus, species)
    pub classification: BTreeMap<String, String>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Description,
    Medicinal,
    Environmental,
    Native,
    Classification,
    Category,
}

const HEADERS: &[(&str, Section)] = &[
    ("Detailed Description:", Section::Description),
    ("Medicinal Benefits:", Section::Medicinal),
    ("Environmental Benefits:", Section::Environmental),
    ("Native to India:", Section::Native),
    ("Scientific Classification:", Section::Classification),
    ("Common Tree Category:", Section::Category),
];

/// Parse one free-text AI response into named sections plus the
/// classification sub-map.
pub fn parse_profile(text: &str) -> TreeProfile {
    let mut profile = TreeProfile::default();
    let mut current = Section::None;

    for raw in text.lines() {
        let line = raw.trim();

        if let Some((rest, section)) = match_header(line) {
            current = *section;
            match section {
                Section::Description => profile.description = rest.to_string(),
                Section::Medicinal => profile.medicinal_benefits = rest.to_string(),
                Section::Environmental => profile.environmental_benefits = rest.to_string(),
                Section::Category => profile.category = rest.to_string(),
                Section::Native => {
                    // Tri-state collapses to Yes/No; "Yes, widely found" is Yes
                    profile.native = if rest.trim().to_lowercase().starts_with("yes") {
                        "Yes".to_string()
                    } else {
                        "No".to_string()
                    };
                }
                // Classification content arrives on the following "- " lines
                Section::Classification | Section::None => {}
            }
            continue;
        }

        match current {
            Section::Classification => {
                if let Some(item) = line.strip_prefix("- ") {
                    if let Some((key, value)) = item.split_once(':') {
                        profile
                            .classification
                            .insert(key.trim().to_lowercase(), value.trim().to_string());
                    }
                }
            }
            Section::Description => append(&mut profile.description, line),
            Section::Medicinal => append(&mut profile.medicinal_benefits, line),
            Section::Environmental => append(&mut profile.environmental_benefits, line),
            Section::Category => append(&mut profile.category, line),
            // Native was already normalized from the header line; continuation
            // text carries no extra signal
            Section::Native | Section::None => {}
        }
    }

    profile.description = profile.description.trim().to_string();
    profile.medicinal_benefits = profile.medicinal_benefits.trim().to_string();
    profile.environmental_benefits = profile.environmental_benefits.trim().to_string();
    profile.category = profile.category.trim().to_string();
    profile
}

fn match_header(line: &str) -> Option<(&str, &'static Section)> {
    HEADERS
        .iter()
        .find_map(|(prefix, section)| line.strip_prefix(prefix).map(|rest| (rest, section)))
}

fn append(target: &mut String, line: &str) {
    target.push(' ');
    target.push_str(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Detailed Description: A tall tree.\n\
Medicinal Benefits: Bark extract treats fever.\n\
Native to India: Yes, widely found.\n\
Scientific Classification:\n\
- Kingdom: Plantae\n\
- Genus: Ficus\n\
Common Tree Category: Shade Trees\n";

    #[test]
    fn parses_reference_sample() {
        let p = parse_profile(SAMPLE);
        assert_eq!(p.description, "A tall tree.");
        assert_eq!(p.medicinal_benefits, "Bark extract treats fever.");
        assert_eq!(p.native, "Yes");
        assert_eq!(p.category, "Shade Trees");
        assert_eq!(p.classification.get("kingdom").unwrap(), "Plantae");
        assert_eq!(p.classification.get("genus").unwrap(), "Ficus");
        assert_eq!(p.classification.len(), 2);
        assert_eq!(p.environmental_benefits, "");
    }

    #[test]
    fn joins_continuation_lines_with_spaces() {
        let text = "Detailed Description: First sentence.\nSecond sentence\ncontinues here.";
        let p = parse_profile(text);
        assert_eq!(
            p.description,
            "First sentence. Second sentence continues here."
        );
    }

    #[test]
    fn native_defaults_to_no() {
        let p = parse_profile("Native to India: Possibly, depends on the region.");
        assert_eq!(p.native, "No");
        let p = parse_profile("Native to India: yes indeed");
        assert_eq!(p.native, "Yes");
    }

    #[test]
    fn classification_keys_are_lowercased() {
        let text = "Scientific Classification:\n- Phylum (or Division for plants): Tracheophyta\n- SPECIES: F. benghalensis";
        let p = parse_profile(text);
        assert_eq!(
            p.classification.get("phylum (or division for plants)").unwrap(),
            "Tracheophyta"
        );
        assert_eq!(p.classification.get("species").unwrap(), "F. benghalensis");
    }

    #[test]
    fn unknown_headers_fold_into_open_section() {
        let text = "Detailed Description: Grows tall.\nFun Fact: bees love it.";
        let p = parse_profile(text);
        assert_eq!(p.description, "Grows tall. Fun Fact: bees love it.");
    }

    #[test]
    fn lines_before_any_header_are_dropped() {
        let text = "Sure! Here is the profile.\nDetailed Description: Compact crown.";
        let p = parse_profile(text);
        assert_eq!(p.description, "Compact crown.");
    }

    #[test]
    fn never_fails_on_malformed_input() {
        for text in ["", "\n\n\n", "- Kingdom: Plantae", "::::", "Detailed Description:"] {
            let p = parse_profile(text);
            assert_eq!(p.native, "");
            // "- Kingdom" without an opening header never reaches the map
            assert!(p.classification.is_empty());
        }
    }

    #[test]
    fn missing_sections_are_empty_not_errors() {
        let p = parse_profile("Common Tree Category: Others");
        assert_eq!(p.category, "Others");
        assert_eq!(p.description, "");
        assert_eq!(p.medicinal_benefits, "");
        assert!(p.classification.is_empty());
    }
}
