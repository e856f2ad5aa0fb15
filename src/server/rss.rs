//! Minimal RSS 2.0 rendering for the stored patch records.

use crate::server::routes::patches::FeedItem;
use std::fmt::Write;

pub fn render_feed(title: &str, link: &str, items: &[FeedItem]) -> String {
    let mut out = String::with_capacity(256 + items.len() * 256);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<rss version=\"2.0\">\n<channel>\n");
    let _ = writeln!(out, "<title>{}</title>", escape_xml(title));
    let _ = writeln!(out, "<link>{}</link>", escape_xml(link));
    let _ = writeln!(out, "<description>{}</description>", escape_xml(title));

    for item in items {
        out.push_str("<item>\n");
        let _ = writeln!(out, "<title>{}</title>", escape_xml(&item.title));
        let _ = writeln!(out, "<link>{}</link>", escape_xml(&item.link));
        let _ = writeln!(
            out,
            "<guid isPermaLink=\"false\">{}</guid>",
            escape_xml(&item.id)
        );
        let _ = writeln!(
            out,
            "<description>{}</description>",
            escape_xml(&item.description)
        );
        let _ = writeln!(out, "<pubDate>{}</pubDate>", item.created_at.to_rfc2822());
        out.push_str("</item>\n");
    }

    out.push_str("</channel>\n</rss>\n");
    out
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
