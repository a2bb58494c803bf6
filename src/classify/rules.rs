// src/classify/rules.rs

use url::Url;

use super::Category;

/// What a rule gets to look at: lowercased link text and the resolved URL.
#[derive(Debug, Clone)]
pub struct LinkFacts<'a> {
    text: String,
    url: &'a Url,
}

impl<'a> LinkFacts<'a> {
    pub fn new(text: &str, url: &'a Url) -> Self {
        Self {
            text: text.to_lowercase(),
            url,
        }
    }

    pub fn text_contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    /// True when the URL path (query and fragment excluded) ends in `.zip`.
    pub fn is_zip(&self) -> bool {
        self.url.path().to_ascii_lowercase().ends_with(".zip")
    }
}

/// A predicate and the category it assigns. Rules are tried in order; the
/// first match wins and nothing matching means [`Category::Unknown`].
#[derive(Clone, Copy)]
pub struct Rule {
    pub category: Category,
    pub matches: fn(&LinkFacts<'_>) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

fn mentions_pdf(l: &LinkFacts<'_>) -> bool {
    l.text_contains("pdf")
}

fn graphics_or_zip(l: &LinkFacts<'_>) -> bool {
    l.text_contains("graphics") || l.is_zip()
}

fn data_tables_or_excel(l: &LinkFacts<'_>) -> bool {
    l.text_contains("data tables") || l.text_contains("excel")
}

fn data_tables(l: &LinkFacts<'_>) -> bool {
    l.text_contains("data tables")
}

fn profile(l: &LinkFacts<'_>) -> bool {
    l.text_contains("profile")
}

/// Latest section: decides the extension of `Profile_Older_Americans_<year>`.
pub static LATEST_RULES: &[Rule] = &[
    Rule {
        category: Category::Report,
        matches: mentions_pdf,
    },
    Rule {
        category: Category::Graphics,
        matches: graphics_or_zip,
    },
    Rule {
        category: Category::DataTable,
        matches: data_tables_or_excel,
    },
];

/// Previous profiles table: decides the per-year file name.
pub static HISTORY_RULES: &[Rule] = &[
    Rule {
        category: Category::DataTable,
        matches: data_tables,
    },
    Rule {
        category: Category::Graphics,
        matches: graphics_or_zip,
    },
    Rule {
        category: Category::Report,
        matches: profile,
    },
];

pub fn classify(rules: &[Rule], facts: &LinkFacts<'_>) -> Category {
    rules
        .iter()
        .find(|r| (r.matches)(facts))
        .map(|r| r.category)
        .unwrap_or(Category::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn latest_rules_in_priority_order() {
        let u = url("https://x.gov/f/a.zip");
        // "pdf" outranks a zip URL
        assert_eq!(
            classify(LATEST_RULES, &LinkFacts::new("2023 Profile (PDF)", &u)),
            Category::Report
        );
        assert_eq!(
            classify(LATEST_RULES, &LinkFacts::new("2023 Profile", &u)),
            Category::Graphics
        );

        let x = url("https://x.gov/f/file");
        assert_eq!(
            classify(LATEST_RULES, &LinkFacts::new("Data Tables", &x)),
            Category::DataTable
        );
        assert_eq!(
            classify(LATEST_RULES, &LinkFacts::new("2023 Profile EXCEL", &x)),
            Category::DataTable
        );
        assert_eq!(
            classify(LATEST_RULES, &LinkFacts::new("2023 Profile", &x)),
            Category::Unknown
        );
    }

    #[test]
    fn history_rules_in_priority_order() {
        let pdf = url("https://x.gov/p.pdf");
        assert_eq!(
            classify(HISTORY_RULES, &LinkFacts::new("Profile Data Tables", &pdf)),
            Category::DataTable
        );
        assert_eq!(
            classify(HISTORY_RULES, &LinkFacts::new("Profile Graphics", &pdf)),
            Category::Graphics
        );
        assert_eq!(
            classify(HISTORY_RULES, &LinkFacts::new("2019 profile", &pdf)),
            Category::Report
        );
        assert_eq!(
            classify(HISTORY_RULES, &LinkFacts::new("Fact sheet", &pdf)),
            Category::Unknown
        );
    }

    #[test]
    fn zip_check_ignores_query_and_case() {
        let u = url("https://x.gov/charts.ZIP?download=1");
        assert!(LinkFacts::new("", &u).is_zip());
        let u = url("https://x.gov/charts?f=a.zip");
        assert!(!LinkFacts::new("", &u).is_zip());
    }
}
