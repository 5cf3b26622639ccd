//! Reply formatting for display.
//!
//! Model replies carry light markdown. This turns them into a small, safe
//! HTML fragment: the text is escaped first, then bold, italic and line
//! breaks are rendered.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));
static ITALIC_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern is valid"));
static ITALIC_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_(.*?)_").expect("underscore pattern is valid"));

/// Remove a leading `[<persona>]:` label the model sometimes echoes back.
///
/// Matching is case-insensitive and consumes whitespace after the colon.
pub fn strip_persona_label<'a>(text: &'a str, persona: Option<&str>) -> &'a str {
    let Some(persona) = persona.filter(|p| !p.is_empty()) else {
        return text;
    };

    let label = format!("[{persona}]:");
    match text.get(..label.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(&label) => text[label.len()..].trim_start(),
        _ => text,
    }
}

/// Render a model reply as an HTML fragment.
pub fn format_reply_html(text: &str, persona: Option<&str>) -> String {
    if text.is_empty() {
        return String::new();
    }

    let escaped = escape_html(strip_persona_label(text, persona));
    let bolded = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    let italic = ITALIC_STAR.replace_all(&bolded, "<em>$1</em>");
    let italic = ITALIC_UNDERSCORE.replace_all(&italic, "<em>$1</em>");

    italic.replace('\n', "<br />")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reply_stays_empty() {
        assert_eq!(format_reply_html("", Some("Jarvie")), "");
    }

    #[test]
    fn renders_bold_and_italic() {
        assert_eq!(
            format_reply_html("I am **here** for *you*", None),
            "I am <strong>here</strong> for <em>you</em>"
        );
        assert_eq!(format_reply_html("take it _slowly_", None), "take it <em>slowly</em>");
    }

    #[test]
    fn converts_newlines_to_breaks() {
        assert_eq!(format_reply_html("line one\nline two", None), "line one<br />line two");
    }

    #[test]
    fn strips_persona_label_case_insensitively() {
        assert_eq!(strip_persona_label("[jarvie]:   Hi!", Some("Jarvie")), "Hi!");
        assert_eq!(format_reply_html("[JARVIE]: **Hi**", Some("Jarvie")), "<strong>Hi</strong>");
    }

    #[test]
    fn keeps_label_when_persona_unknown() {
        assert_eq!(strip_persona_label("[Jarvie]: Hi", None), "[Jarvie]: Hi");
        assert_eq!(strip_persona_label("[Other]: Hi", Some("Jarvie")), "[Other]: Hi");
    }

    #[test]
    fn label_check_is_safe_on_multibyte_text() {
        assert_eq!(strip_persona_label("मी ठीक आहे", Some("Jarvie")), "मी ठीक आहे");
    }

    #[test]
    fn escapes_markup_from_the_model() {
        assert_eq!(
            format_reply_html("<script>alert(\"x\")</script> & **ok**", None),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; <strong>ok</strong>"
        );
    }
}
