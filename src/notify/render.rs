use crate::feed::{FeedEntry, FeedSnapshot};

const UNKNOWN_FEED: &str = "Unknown Feed";
const UNKNOWN_POST: &str = "Unknown Post";

/// Render the HTML notice for one new entry.
///
/// Shape: `New post in <feed label>: <b><entry label></b>`, where a label
/// is the link-wrapped title when a link exists and the plain title
/// otherwise. Titles and links come from untrusted feed documents, so both
/// are escaped before embedding.
pub fn render_entry_notice(feed: &FeedSnapshot, entry: &FeedEntry) -> String {
    let feed_label = label(feed.title.as_deref(), feed.link.as_deref(), UNKNOWN_FEED);
    let entry_label = label(entry.title.as_deref(), entry.link.as_deref(), UNKNOWN_POST);
    format!("New post in {}: <b>{}</b>", feed_label, entry_label)
}

fn label(title: Option<&str>, link: Option<&str>, placeholder: &str) -> String {
    let title = escape_html(title.unwrap_or(placeholder));
    match link {
        Some(link) => format!("<a href=\"{}\">{}</a>", escape_html(link), title),
        None => title,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
