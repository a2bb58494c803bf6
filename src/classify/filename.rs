// src/classify/filename.rs

use url::Url;

use super::Category;

const FALLBACK_NAME: &str = "download";

/// `Profile_Older_Americans_<year><ext>`; unknown links get no extension.
pub fn latest_filename(year: u16, category: Category) -> String {
    format!("Profile_Older_Americans_{}{}", year, category.extension())
}

/// Fixed names per category; unknown links keep the name the server exposes.
pub fn history_filename(year: u16, category: Category, url: &Url) -> String {
    match category {
        Category::DataTable => format!("Data_Tables_{}.xlsx", year),
        Category::Graphics => format!("Graphics_{}.zip", year),
        Category::Report => format!("Profile_Report_{}.pdf", year),
        Category::Unknown => filename_from_url(url),
    }
}

/// Trailing path segment of `url`, without any query string.
pub fn filename_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(strip_query)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_NAME)
        .to_string()
}

/// Drop everything from the first `?` on.
pub fn strip_query(name: &str) -> &str {
    name.split_once('?').map(|(head, _)| head).unwrap_or(name)
}
