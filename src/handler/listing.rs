//! Directory listing module
//!
//! Generates the auto-index page for directories without an index
//! file: one link per immediate entry, directories suffixed `/`,
//! symlinks suffixed `@`.

use std::io;
use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::fs;

/// Characters percent-encoded inside listing hrefs
const HREF_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One directory entry, as shown in the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Read a directory's immediate entries, sorted case-insensitively.
///
/// Entries with non-UTF-8 names are skipped.
pub async fn collect_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let file_type = entry.file_type().await?;
        // is_dir must follow symlinks so a link to a directory still
        // gets the trailing slash in its href
        let is_dir = if file_type.is_symlink() {
            fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false)
        } else {
            file_type.is_dir()
        };

        entries.push(ListingEntry {
            name,
            is_dir,
            is_symlink: file_type.is_symlink(),
        });
    }

    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page for a directory
pub fn render(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", html_escape(display_path));

    let mut items = String::new();
    for entry in entries {
        let mut href = utf8_percent_encode(&entry.name, HREF_ENCODE_SET).to_string();
        let mut label = html_escape(&entry.name);
        if entry.is_dir {
            href.push('/');
        }
        // The symlink marker wins over the directory slash in the label
        if entry.is_symlink {
            label.push('@');
        } else if entry.is_dir {
            label.push('/');
        }
        items.push_str(&format!("<li><a href=\"{href}\">{label}</a></li>\n"));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n\
         {items}</ul>\n<hr>\n</body>\n</html>\n"
    )
}

/// Escape text for embedding in HTML
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a&b"), "a&amp;b");
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("it's \"quoted\""), "it&#x27;s &quot;quoted&quot;");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_render_file_entry() {
        let html = render("/", &[entry("a.txt", false, false)]);
        assert!(html.contains("<title>Directory listing for /</title>"));
        assert!(html.contains("<a href=\"a.txt\">a.txt</a>"));
    }

    #[test]
    fn test_render_directory_gets_slash() {
        let html = render("/", &[entry("sub", true, false)]);
        assert!(html.contains("<a href=\"sub/\">sub/</a>"));
    }

    #[test]
    fn test_render_symlink_gets_marker() {
        let html = render("/", &[entry("link", false, true)]);
        assert!(html.contains("<a href=\"link\">link@</a>"));

        // A symlinked directory keeps the slash in the href only
        let html = render("/", &[entry("dirlink", true, true)]);
        assert!(html.contains("<a href=\"dirlink/\">dirlink@</a>"));
    }

    #[test]
    fn test_render_encodes_href_and_escapes_label() {
        let html = render("/", &[entry("a b<c>.txt", false, false)]);
        assert!(html.contains("href=\"a%20b%3Cc%3E.txt\""));
        assert!(html.contains(">a b&lt;c&gt;.txt</a>"));
    }

    #[test]
    fn test_render_escapes_title() {
        let html = render("/<dir>/", &[]);
        assert!(html.contains("Directory listing for /&lt;dir&gt;/"));
    }
}
