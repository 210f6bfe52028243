//! Plain-text extraction for notes saved by the rich-text editor.

use std::sync::OnceLock;

use regex::Regex;

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).unwrap())
}

/// Convert note HTML into readable plain text.
///
/// Block elements become line breaks, list items get a `- ` bullet, all
/// other tags are dropped and entities decoded. Plain-text notes pass
/// through with only whitespace normalized.
pub fn note_to_plain_text(html: &str) -> String {
    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    static LIST_ITEM: OnceLock<Regex> = OnceLock::new();
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    static NEWLINES: OnceLock<Regex> = OnceLock::new();

    let text = regex(&SCRIPT, r"(?is)<(script|style)[^>]*>.*?</(script|style)>").replace_all(html, "");
    let text = regex(&LIST_ITEM, r"(?i)<li[^>]*>").replace_all(&text, "\n- ");
    let text = regex(
        &BLOCK,
        r"(?i)</?(div|p|br|h[1-6]|ul|ol|li|tr|blockquote|pre)[^>]*>",
    )
    .replace_all(&text, "\n");
    let text = regex(&TAG, r"<[^>]+>").replace_all(&text, "");
    let text = html_escape::decode_html_entities(&text).replace('\u{a0}', " ");
    let text = regex(&SPACES, r"[ \t]+").replace_all(&text, " ");
    let text = regex(&NEWLINES, r"\n[ \t]*(\n[ \t]*)+").replace_all(&text, "\n\n");

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// True when a note has no visible text (e.g. an untouched editor: `<p><br></p>`)
pub fn is_blank_note(html: &str) -> bool {
    note_to_plain_text(html).is_empty()
}
