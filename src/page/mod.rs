// src/page/mod.rs
//! Page model extraction.
//!
//! Everything that knows about the markup of the profile page lives here:
//! tag names, the "Previous Profiles" heading text, and the heading → table
//! adjacency. The rest of the crate only sees [`Link`] and [`ProfileRow`].

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::trace;
use url::Url;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("selector should parse"));
static HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").expect("selector should parse"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("selector should parse"));
static CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("selector should parse"));

const PREVIOUS_PROFILES_HEADING: &str = "Previous Profiles";

/// An anchor that carries an `href`, with its visible text collapsed to single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// One data row of the previous profiles table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRow {
    /// Visible text of every `td`/`th`, in order. Never empty.
    pub cells: Vec<String>,
    /// First linked anchor of each cell that has one.
    pub links: Vec<Link>,
}

impl ProfileRow {
    pub fn first_cell(&self) -> &str {
        self.cells.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("could not find the 'Previous Profiles' section on the page")]
    SectionNotFound,
    #[error("could not find the 'Previous Profiles' data table")]
    TableNotFound,
}

/// The fetched profile page, parsed once and read-only afterwards.
pub struct ProfilePage {
    doc: Html,
    base: Url,
}

impl ProfilePage {
    pub fn parse(html: &str, base: Url) -> Self {
        Self {
            doc: Html::parse_document(html),
            base,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Anchors of the latest section: text matching `<year> Profile` or
    /// `Data Tables`, outside the previous profiles table.
    pub fn latest_links(&self, year: u16) -> Vec<Link> {
        let pattern = Regex::new(&format!(r"{} Profile|Data Tables", year))
            .expect("year pattern should compile");
        let history_table = self.previous_profiles_table().ok();

        self.doc
            .select(&ANCHOR)
            .filter(|a| match history_table {
                Some(table) => !a.ancestors().any(|n| n == *table),
                None => true,
            })
            .filter_map(|a| {
                let text = visible_text(a);
                if !pattern.is_match(&text) {
                    return None;
                }
                match a.value().attr("href") {
                    Some(href) => Some(Link {
                        href: href.to_string(),
                        text,
                    }),
                    None => {
                        trace!(text = %text, "latest anchor without href");
                        None
                    }
                }
            })
            .collect()
    }

    /// Data rows of the previous profiles table, header row excluded.
    pub fn previous_profiles(&self) -> Result<Vec<ProfileRow>, StructureError> {
        let table = self.previous_profiles_table()?;

        Ok(table
            .select(&ROW)
            .skip(1)
            .filter_map(|tr| {
                let cells: Vec<ElementRef> = tr.select(&CELL).collect();
                if cells.is_empty() {
                    trace!("skipping row without cells");
                    return None;
                }
                Some(ProfileRow {
                    cells: cells.iter().map(|c| visible_text(*c)).collect(),
                    links: cells.iter().filter_map(|c| first_link(*c)).collect(),
                })
            })
            .collect())
    }

    fn previous_profiles_table(&self) -> Result<ElementRef<'_>, StructureError> {
        let heading = self
            .doc
            .select(&HEADING)
            .find(|h| visible_text(*h) == PREVIOUS_PROFILES_HEADING)
            .ok_or(StructureError::SectionNotFound)?;

        heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "table")
            .ok_or(StructureError::TableNotFound)
    }
}

fn first_link(cell: ElementRef<'_>) -> Option<Link> {
    cell.select(&ANCHOR).find_map(|a| {
        a.value().attr("href").map(|href| Link {
            href: href.to_string(),
            text: visible_text(a),
        })
    })
}

fn visible_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
