//! Resource name normalization and case conversion

use crate::error::Error;
use convert_case::{Boundary, Case, Casing, Converter};

/// One resource name in every casing the templates need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    /// `user-profile`; used for file names and URL paths
    pub kebab: String,
    /// `UserProfile`
    pub pascal: String,
    /// `userProfile`
    pub camel: String,
    /// `userprofile`; used in prose
    pub lower: String,
}

impl ResourceNames {
    pub fn new(raw: &str) -> Result<Self, Error> {
        let kebab = normalize_name(raw)?;
        let pascal = to_pascal_case(&kebab);
        Ok(Self {
            camel: to_camel_case(&kebab),
            lower: pascal.to_lowercase(),
            pascal,
            kebab,
        })
    }

    pub fn vars(&self) -> [(&'static str, &str); 4] {
        [
            ("kebabName", self.kebab.as_str()),
            ("pascalName", self.pascal.as_str()),
            ("camelName", self.camel.as_str()),
            ("lowerName", self.lower.as_str()),
        ]
    }
}

/// Word boundaries for resource names. Digits stay attached to the word they
/// follow so `apiV2Keys` splits as `api`, `V2`, `Keys`.
const BOUNDARIES: [Boundary; 6] = [
    Boundary::Underscore,
    Boundary::Hyphen,
    Boundary::Space,
    Boundary::LowerUpper,
    Boundary::DigitUpper,
    Boundary::Acronym,
];

/// `UserProfile`, `user_profile` and `user profile` all become `user-profile`
pub fn normalize_name(raw: &str) -> Result<String, Error> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some(' '),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => Some(c),
            _ => None,
        })
        .collect();

    let kebab = Converter::new()
        .set_boundaries(&BOUNDARIES)
        .to_case(Case::Kebab)
        .convert(cleaned);
    let normalized = kebab
        .split('-')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let starts_with_letter = normalized
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase());
    if !starts_with_letter {
        return Err(Error::InvalidName(raw.to_string()));
    }
    Ok(normalized)
}

pub fn to_pascal_case(kebab: &str) -> String {
    kebab.from_case(Case::Kebab).to_case(Case::Pascal)
}

pub fn to_camel_case(kebab: &str) -> String {
    kebab.from_case(Case::Kebab).to_case(Case::Camel)
}
