// src/classify/mod.rs
//! Turns page links into download targets: a year, a category and a file name.

pub mod filename;
pub mod rules;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::debug;
use url::Url;

use crate::page::{Link, ProfileRow};
use rules::{classify, LinkFacts, HISTORY_RULES, LATEST_RULES};

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").expect("year regex should compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Report,
    DataTable,
    Graphics,
    Unknown,
}

impl Category {
    pub fn extension(self) -> &'static str {
        match self {
            Category::Report => ".pdf",
            Category::DataTable => ".xlsx",
            Category::Graphics => ".zip",
            Category::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    pub year: u16,
    pub category: Category,
}

/// A resolved link ready for the retriever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub url: Url,
    pub classification: Classification,
    pub filename: String,
}

impl PlannedFile {
    pub fn year(&self) -> u16 {
        self.classification.year
    }
}

/// Files for one row of the previous profiles table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPlan {
    pub year: u16,
    pub files: Vec<PlannedFile>,
}

/// Year named by a table cell. Text naming more than one distinct year
/// (a range such as "2010-2005") is ambiguous and yields `None`.
pub fn extract_year(text: &str) -> Option<u16> {
    let years: BTreeSet<&str> = YEAR.find_iter(text).map(|m| m.as_str()).collect();
    if years.len() != 1 {
        return None;
    }
    years.into_iter().next()?.parse().ok()
}

fn resolve(base: &Url, link: &Link) -> Option<Url> {
    match base.join(&link.href) {
        Ok(url) => Some(url),
        Err(e) => {
            debug!(href = %link.href, error = %e, "skipping unresolvable link");
            None
        }
    }
}

/// Plan the latest-section downloads, one per link, all under `year`.
pub fn plan_latest(links: &[Link], base: &Url, year: u16) -> Vec<PlannedFile> {
    links
        .iter()
        .filter_map(|link| {
            let url = resolve(base, link)?;
            let category = classify(LATEST_RULES, &LinkFacts::new(&link.text, &url));
            Some(PlannedFile {
                filename: filename::latest_filename(year, category),
                classification: Classification { year, category },
                url,
            })
        })
        .collect()
}

/// Plan one historical row. `None` when the first cell has no usable year.
pub fn plan_row(row: &ProfileRow, base: &Url) -> Option<RowPlan> {
    let year = extract_year(row.first_cell())?;
    let files = row
        .links
        .iter()
        .filter_map(|link| {
            let url = resolve(base, link)?;
            let category = classify(HISTORY_RULES, &LinkFacts::new(&link.text, &url));
            Some(PlannedFile {
                filename: filename::history_filename(year, category, &url),
                classification: Classification { year, category },
                url,
            })
        })
        .collect();
    Some(RowPlan { year, files })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://acl.example.gov/data/profile-older-americans").unwrap()
    }

    fn link(href: &str, text: &str) -> Link {
        Link {
            href: href.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn years_from_first_cell() {
        assert_eq!(extract_year("2019"), Some(2019));
        assert_eq!(extract_year("Profile 2021 (2021 release)"), Some(2021));
        assert_eq!(extract_year("2010-2005"), None);
        assert_eq!(extract_year("20190"), None);
        assert_eq!(extract_year("Archive"), None);
        assert_eq!(extract_year(""), None);
    }

    #[test]
    fn latest_pdf_link() {
        let plans = plan_latest(
            &[link("/files/profile2023.pdf", "2023 Profile (PDF)")],
            &base(),
            2023,
        );
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].filename, "Profile_Older_Americans_2023.pdf");
        assert_eq!(
            plans[0].url.as_str(),
            "https://acl.example.gov/files/profile2023.pdf"
        );
        assert_eq!(
            plans[0].classification,
            Classification {
                year: 2023,
                category: Category::Report
            }
        );
    }

    #[test]
    fn latest_plan_is_pure() {
        let links = vec![
            link("2023/dt.xlsx", "2023 Data Tables"),
            link("https://cdn.example.gov/charts.zip", "2023 Profile"),
        ];
        let a = plan_latest(&links, &base(), 2023);
        let b = plan_latest(&links, &base(), 2023);
        assert_eq!(a, b);
        assert_eq!(a[0].filename, "Profile_Older_Americans_2023.xlsx");
        assert_eq!(a[0].url.as_str(), "https://acl.example.gov/data/2023/dt.xlsx");
        assert_eq!(a[1].filename, "Profile_Older_Americans_2023.zip");
    }

    #[test]
    fn history_row_plans_every_link() {
        let row = ProfileRow {
            cells: vec!["2019".into(), "Data Tables".into(), "x".into(), "y".into()],
            links: vec![
                link("/dt2019.xlsx", "Data Tables"),
                link("/g2019.zip", "Charts"),
                link("/p2019.pdf", "2019 Profile"),
                link("/extra/notes.txt?rev=3", "Notes"),
            ],
        };
        let plan = plan_row(&row, &base()).unwrap();
        assert_eq!(plan.year, 2019);
        let names: Vec<_> = plan.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Data_Tables_2019.xlsx",
                "Graphics_2019.zip",
                "Profile_Report_2019.pdf",
                "notes.txt"
            ]
        );
    }

    #[test]
    fn ambiguous_row_is_skipped() {
        let row = ProfileRow {
            cells: vec!["2010-2005".into()],
            links: vec![],
        };
        assert_eq!(plan_row(&row, &base()), None);
    }
}
