///! HTML flattening for lineup pages.
///!
///! The lineup page has no stable DOM contract, so the extractor works on
///! the page's visual line structure instead of a parse tree. This module
///! turns raw HTML into whitespace-normalized plain text with a newline
///! wherever the page would break a line.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?>.*?</script>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style.*?>.*?</style>").unwrap());

/// Closing tags of block-level elements, plus `<br>` in all its spellings.
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(?:li|p|div|br|tr|h[1-6]|section)>|<br\s*/?>").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:x([0-9a-fA-F]{1,6})|([0-9]{1,7}));").unwrap());

static HSPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Flatten raw HTML into plain text.
///
/// The steps are order-sensitive: noise elements go first (so their
/// contents never surface as text), block boundaries become newlines
/// before the remaining tags are stripped, and entities are decoded only
/// after no tag markup is left. Already-plain text passes through
/// unchanged.
pub fn normalize_html(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, "");
    let text = STYLE_RE.replace_all(&text, "");
    let text = LINE_BREAK_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = strip_icon_glyphs(&text);
    let text = HSPACE_RE.replace_all(&text, " ");
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Decode numeric character references plus the named entities these pages
/// actually emit. `&amp;` is decoded last so double-encoded sequences like
/// `&amp;nbsp;` do not decode twice.
fn decode_entities(text: &str) -> String {
    let text = NUMERIC_ENTITY_RE.replace_all(text, |caps: &Captures| {
        let code = caps
            .get(1)
            .map(|hex| u32::from_str_radix(hex.as_str(), 16).ok())
            .unwrap_or_else(|| caps.get(2).and_then(|dec| dec.as_str().parse().ok()));
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&rsquo;", "\u{2019}")
        .replace("&amp;", "&")
}

/// The upstream's icon fonts leave private-use-area glyphs in the text
/// layer; they are invisible in a browser but garbage in plain text.
fn strip_icon_glyphs(text: &str) -> String {
    text.replace(['\u{E000}', '\u{E0DF}', '\u{E0A0}'], "")
}
