use std::collections::HashMap;

/// Heading slug generator that keeps ids unique within one document.
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next slug for the given heading text.
    ///
    /// Repeated slugs get a numeric suffix: `intro`, `intro-1`, `intro-2`.
    pub fn next_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut slug = base.clone();
        while self.counts.contains_key(&slug) {
            let seen = self.counts.entry(base.clone()).or_insert(0);
            *seen += 1;
            slug = format!("{}-{}", base, seen);
        }
        self.counts.insert(slug.clone(), 0);
        slug
    }
}

/// Lowercases, drops punctuation and turns spaces into hyphens
/// (github-slugger rules: repeated hyphens are kept).
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for ch in text.trim().chars() {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            slug.extend(ch.to_lowercase());
        } else if ch == ' ' {
            slug.push('-');
        }
    }

    if slug.is_empty() {
        slug.push_str("heading");
    }
    slug
}
