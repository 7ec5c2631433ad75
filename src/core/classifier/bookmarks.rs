//! Bookmark detection for web-like files.
//!
//! Browser bookmark exports are HTML (the Netscape bookmark format), so a
//! `.html` file can be either a saved web page or a bookmark collection.
//! Detection order:
//! 1. strict XML parse, collecting the `<title>` text and anchor attributes;
//! 2. tolerant HTML parse if the strict pass errors out;
//! 3. a `<title>` matching "bookmark(s)" wins, else any anchor carrying an
//!    `add_date`/`last_modified` attribute wins;
//! 4. if the file cannot be read at all, fall back to checking the filename
//!    for "bookmark".

use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use regex::Regex;
use scraper::{Html, Selector};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)bookmarks?").expect("valid regex"))
}

/// Whether a web-like file looks like a bookmark export.
pub fn is_bookmark_file(path: &Path) -> bool {
    match fs::read_to_string(path) {
        Ok(content) => match sniff_xml(&content) {
            Some(verdict) => verdict,
            None => sniff_html(&content),
        },
        // Unreadable content: filename heuristic
        Err(_) => path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_lowercase().contains("bookmark"))
            .unwrap_or(false),
    }
}

/// Strict pass. Returns `None` when the content is not well-formed XML.
fn sniff_xml(content: &str) -> Option<bool> {
    let mut reader = Reader::from_str(content);
    let mut in_title = false;
    let mut title = String::new();
    let mut has_dated_anchor = false;

    loop {
        match reader.read_event() {
            Ok(XmlEvent::Start(e)) | Ok(XmlEvent::Empty(e)) => {
                let name = e.name().as_ref().to_ascii_lowercase();
                if name == b"title" {
                    in_title = true;
                } else if name == b"a" {
                    for attr in e.attributes() {
                        let attr = attr.ok()?;
                        let key = attr.key.as_ref().to_ascii_lowercase();
                        if key == b"add_date" || key == b"last_modified" {
                            has_dated_anchor = true;
                        }
                    }
                }
            }
            Ok(XmlEvent::End(e)) => {
                if e.name().as_ref().to_ascii_lowercase() == b"title" {
                    in_title = false;
                }
            }
            Ok(XmlEvent::Text(t)) => {
                if in_title {
                    if let Ok(text) = t.unescape() {
                        title.push_str(&text);
                    }
                }
            }
            Ok(XmlEvent::Eof) => break,
            Ok(_) => {}
            // Not well-formed XML; let the tolerant parser have a go
            Err(_) => return None,
        }
    }

    Some(title_pattern().is_match(&title) || has_dated_anchor)
}

/// Tolerant pass. html5ever recovers from any input, so this always yields
/// a verdict.
fn sniff_html(content: &str) -> bool {
    let document = Html::parse_document(content);

    let title_selector = Selector::parse("title").expect("valid selector");
    if let Some(title) = document.select(&title_selector).next() {
        let text: String = title.text().collect();
        if title_pattern().is_match(&text) {
            return true;
        }
    }

    let anchor_selector = Selector::parse("a").expect("valid selector");
    document.select(&anchor_selector).any(|a| {
        a.value().attr("add_date").is_some() || a.value().attr("last_modified").is_some()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "export.html",
            "<html><head><title>BOOKMARK export</title></head><body/></html>",
        );
        assert!(is_bookmark_file(&path));
    }

    #[test]
    fn dated_anchor_marks_bookmark_file() {
        // Netscape format: no helpful title, but anchors carry ADD_DATE
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "links.html",
            r#"<html><head><title>Links</title></head><body>
               <a href="https://example.com" add_date="1700000000">Example</a>
               </body></html>"#,
        );
        assert!(is_bookmark_file(&path));
    }

    #[test]
    fn uppercase_netscape_attributes_are_detected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "netscape.html",
            r#"<DL><DT><A HREF="https://example.com" ADD_DATE="1700000000">Example</A></DL>"#,
        );
        assert!(is_bookmark_file(&path));
    }

    #[test]
    fn ordinary_page_is_not_bookmark() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "page.html",
            r#"<html><head><title>Recipes</title></head><body>
               <a href="/cake">cake</a></body></html>"#,
        );
        assert!(!is_bookmark_file(&path));
    }

    #[test]
    fn unreadable_file_uses_filename_heuristic() {
        let dir = TempDir::new().unwrap();
        // Invalid UTF-8 makes read_to_string fail
        let path = dir.path().join("my_bookmarks.html");
        fs::write(&path, [0xFF, 0xFE, 0x80, 0x80]).unwrap();
        assert!(is_bookmark_file(&path));

        let other = dir.path().join("notes.html");
        fs::write(&other, [0xFF, 0xFE, 0x80, 0x80]).unwrap();
        assert!(!is_bookmark_file(&other));
    }

    #[test]
    fn malformed_markup_falls_back_to_tolerant_parser() {
        let dir = TempDir::new().unwrap();
        // Unclosed tags are not well-formed XML but html5ever copes
        let path = write(
            &dir,
            "messy.html",
            "<title>Firefox Bookmarks<body><a href=x>link",
        );
        assert!(is_bookmark_file(&path));
    }
}
