//! Directory listing page

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped in listing hrefs
const HREF_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// One directory entry as shown in a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    /// Directory, or symlink pointing at one
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    fn link_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Render the listing page for `display_path` (already percent-decoded).
///
/// Entries are sorted by case-insensitive name.
pub fn render_listing(display_path: &str, mut entries: Vec<ListingEntry>) -> String {
    entries.sort_by_cached_key(|e| e.name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for entry in &entries {
        let href = utf8_percent_encode(&entry.link_name(), HREF_SAFE).to_string();
        html.push_str(&format!(
            "<li><a href=\"{href}\">{}</a></li>\n",
            escape_html(&entry.display_name())
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
