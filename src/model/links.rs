// File: ./src/model/links.rs
//! MediaWiki markup in the name column: links, bold and emphasis.
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt::Write;

/// Internal links resolve against this page root.
pub const WIKI_BASE_URL: &str = "https://stratum0.org/wiki/";

// [[target]] or [[target|label]]
static INTERNAL_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^|\]]+)\|?(.*?)\]\]").expect("internal link pattern"));
// [url label]
static EXTERNAL_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]\s]+)\s+(.*?)\]").expect("external link pattern"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"'''(.*?)'''").expect("bold pattern"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"''(.*?)''").expect("emphasis pattern"));

/// Strips link, bold and emphasis markup, keeping the visible text.
pub fn plain_name(name: &str) -> String {
    let name = INTERNAL_LINK.replace_all(name, |caps: &Captures| {
        match caps.get(2).map(|m| m.as_str()) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => caps[1].to_string(),
        }
    });
    let name = EXTERNAL_LINK.replace_all(&name, "$2");
    let name = BOLD.replace_all(&name, "$1");
    EMPHASIS.replace_all(&name, "$1").into_owned()
}

/// The first link in the name, internal or external, whichever starts
/// earlier in the text.
pub fn extract_url(name: &str) -> Option<String> {
    let internal = INTERNAL_LINK.captures(name);
    let external = EXTERNAL_LINK.captures(name);

    let internal_pos = internal.as_ref().and_then(|c| c.get(0)).map(|m| m.start());
    let external_pos = external.as_ref().and_then(|c| c.get(0)).map(|m| m.start());

    match (internal_pos, external_pos) {
        (Some(i), Some(e)) if e < i => external.map(|c| c[1].to_string()),
        (Some(_), _) => internal.map(|c| wiki_url(&c[1])),
        (None, Some(_)) => external.map(|c| c[1].to_string()),
        (None, None) => None,
    }
}

/// Page title to absolute URL: spaces become underscores, every byte
/// outside printable ASCII is percent-encoded.
pub fn wiki_url(title: &str) -> String {
    let mut url = String::from(WIKI_BASE_URL);
    for byte in title.trim().replace(' ', "_").bytes() {
        if byte >= 0x7f {
            let _ = write!(url, "%{:02X}", byte);
        } else {
            url.push(byte as char);
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_links_do_not_swallow_their_neighbours() {
        assert_eq!(plain_name("[[a]] und [[b|c]]"), "a und c");
    }

    #[test]
    fn url_encoding() {
        assert_eq!(wiki_url("Tag der offenen Tür"), "https://stratum0.org/wiki/Tag_der_offenen_T%C3%BCr");
        assert_eq!(wiki_url("Plenum"), "https://stratum0.org/wiki/Plenum");
    }
}
