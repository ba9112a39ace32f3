//! Browsable catalog of every addressable cipher.
//!
//! Static descriptors are listed as [`Category::Classic`]. The generated
//! parameterized slugs (`caesar-7`, `affine-a5-b8`, ...) are listed as
//! [`Category::Variant`] and dispatch through the dynamic resolver.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{CipherError, Result};
use crate::params::Params;
use crate::registry::{self, CipherDescriptor};

/// Multipliers coprime with 26.
const AFFINE_A: [u32; 12] = [1, 3, 5, 7, 9, 11, 15, 17, 19, 21, 23, 25];
const VIGENERE_KEYS: usize = 300;
const BEAUFORT_KEYS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Classic,
    Variant,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Classic => f.write_str("classic"),
            Category::Variant => f.write_str("variant"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Category::Classic),
            "variant" => Ok(Category::Variant),
            other => Err(format!("unknown category '{other}' (expected classic or variant)")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub reversible: bool,
}

impl CatalogEntry {
    fn from_descriptor(descriptor: &CipherDescriptor, category: Category) -> Self {
        Self {
            slug: descriptor.slug().to_string(),
            name: descriptor.name().to_string(),
            description: descriptor.description().to_string(),
            category,
            reversible: descriptor.is_reversible(),
        }
    }
}

/// `i` in base 26 over `a`..=`z`, left-padded with `a` to `width`.
pub fn base26_key(mut i: usize, width: usize) -> String {
    let mut digits = Vec::with_capacity(width);
    while digits.len() < width || i > 0 {
        digits.push((b'a' + (i % 26) as u8) as char);
        i /= 26;
    }
    digits.iter().rev().collect()
}

/// Slugs of every generated variant, in catalog order.
pub fn variant_slugs() -> Vec<String> {
    let mut slugs = Vec::new();
    slugs.extend((0..=25).map(|n| format!("caesar-{n}")));
    slugs.extend((1..=25).map(|n| format!("rot-{n}")));
    slugs.extend((1..=25).map(|n| format!("shift-{n}")));
    slugs.extend((2..=12).map(|n| format!("rail-fence-{n}")));
    slugs.extend((1..=255).map(|n| format!("xor-{n}")));
    slugs.extend((0..=25).map(|n| format!("atbash-shift-{n}")));
    for a in AFFINE_A {
        slugs.extend((0..=25).map(|b| format!("affine-a{a}-b{b}")));
    }
    slugs.extend((0..VIGENERE_KEYS).map(|i| format!("vigenere-key-{}", base26_key(i, 3))));
    slugs.extend((0..BEAUFORT_KEYS).map(|i| format!("beaufort-key-{}", base26_key(i, 4))));
    slugs
}

static CATALOG: Lazy<Vec<CatalogEntry>> = Lazy::new(|| {
    let mut entries: Vec<CatalogEntry> = registry::registry()
        .descriptors()
        .into_iter()
        .map(|d| CatalogEntry::from_descriptor(d, Category::Classic))
        .collect();
    entries.extend(
        variant_slugs()
            .iter()
            .filter_map(|slug| registry::lookup(slug))
            .map(|d| CatalogEntry::from_descriptor(&d, Category::Variant)),
    );
    entries
});

/// Every catalog entry: static ciphers first, then generated variants.
pub fn entries() -> &'static [CatalogEntry] {
    &CATALOG
}

/// Case-insensitive substring match on slug or name, optionally restricted
/// to one category, ordered by name.
pub fn search(query: Option<&str>, category: Option<Category>) -> Vec<&'static CatalogEntry> {
    let needle = query.map(str::to_lowercase).filter(|q| !q.is_empty());
    let mut hits: Vec<&CatalogEntry> = entries()
        .iter()
        .filter(|e| category.is_none_or(|c| e.category == c))
        .filter(|e| match &needle {
            Some(q) => e.slug.to_lowercase().contains(q) || e.name.to_lowercase().contains(q),
            None => true,
        })
        .collect();
    hits.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.slug.cmp(&b.slug)));
    hits
}

/// A named shortcut to another cipher with preset parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CipherAlias {
    pub slug: String,
    pub base_slug: String,
    pub default_params: Params,
}

impl CipherAlias {
    pub fn new(slug: impl Into<String>, base_slug: impl Into<String>, default_params: Params) -> Self {
        Self {
            slug: slug.into(),
            base_slug: base_slug.into(),
            default_params,
        }
    }

    pub fn base(&self) -> Option<CipherDescriptor> {
        registry::lookup(&self.base_slug)
    }

    /// Caller parameters override the alias defaults.
    pub fn encrypt(&self, text: &str, params: &Params) -> Result<String> {
        self.ensure_base()?;
        registry::encrypt(&self.base_slug, text, &params.merged_over(&self.default_params))
    }

    pub fn decrypt(&self, text: &str, params: &Params) -> Result<String> {
        self.ensure_base()?;
        registry::decrypt(&self.base_slug, text, &params.merged_over(&self.default_params))
    }

    fn ensure_base(&self) -> Result<()> {
        if registry::exists(&self.base_slug) {
            Ok(())
        } else {
            Err(CipherError::UnknownCipher(self.base_slug.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base26_keys_count_up() {
        assert_eq!(base26_key(0, 3), "aaa");
        assert_eq!(base26_key(1, 3), "aab");
        assert_eq!(base26_key(26, 3), "aba");
        assert_eq!(base26_key(299, 3), "aln");
        assert_eq!(base26_key(0, 4), "aaaa");
    }

    #[test]
    fn every_variant_resolves() {
        let slugs = variant_slugs();
        assert_eq!(slugs.len(), 26 + 25 + 25 + 11 + 255 + 26 + 12 * 26 + 300 + 200);
        for slug in &slugs {
            assert!(registry::exists(slug), "{slug} does not resolve");
        }
        let variants = entries()
            .iter()
            .filter(|e| e.category == Category::Variant)
            .count();
        assert_eq!(variants, slugs.len());
    }

    #[test]
    fn catalog_is_large() {
        assert!(entries().len() >= 1000);
        assert_eq!(
            entries().iter().filter(|e| e.category == Category::Classic).count(),
            registry::registry().len()
        );
    }

    #[test]
    fn search_filters_and_orders_by_name() {
        let hits = search(Some("VIGEN"), Some(Category::Classic));
        assert!(hits.iter().any(|e| e.slug == "vigenere"));
        assert!(hits.iter().all(|e| e.category == Category::Classic));
        let names: Vec<&str> = hits.iter().map(|e| e.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let variants = search(Some("rail-fence-"), Some(Category::Variant));
        assert_eq!(variants.len(), 11);
        assert!(search(Some("no such cipher"), None).is_empty());
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Classic".parse::<Category>().unwrap(), Category::Classic);
        assert_eq!("variant".parse::<Category>().unwrap(), Category::Variant);
        assert!("modern".parse::<Category>().is_err());
    }

    #[test]
    fn alias_merges_params() {
        let alias = CipherAlias::new("caesar-ten", "caesar", Params::new().with("shift", 10));
        assert_eq!(alias.encrypt("abc", &Params::new()).unwrap(), "KLM");
        let overridden = alias.encrypt("abc", &Params::new().with("shift", 1)).unwrap();
        assert_eq!(overridden, "BCD");
        assert_eq!(alias.decrypt("KLM", &Params::new()).unwrap(), "ABC");
    }

    #[test]
    fn alias_to_unknown_base_fails() {
        let alias = CipherAlias::new("ghost", "does-not-exist", Params::new());
        assert!(alias.base().is_none());
        assert!(matches!(
            alias.encrypt("abc", &Params::new()),
            Err(CipherError::UnknownCipher(ref s)) if s == "does-not-exist"
        ));
    }
}
