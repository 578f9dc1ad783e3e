use anyhow::{Result, anyhow};

use crate::domain::{MessageBody, MessageSummary};

pub const DEFAULT_WIDTH: usize = 100;

/// Terminal text for a body: HTML is rendered to text unless `raw_html`.
pub fn body_to_text(body: &MessageBody, width: usize, raw_html: bool) -> Result<String> {
    if body.is_html() && !raw_html {
        html_to_text(body.preferred(), width)
    } else {
        Ok(body.preferred().to_string())
    }
}

pub fn html_to_text(html: &str, width: usize) -> Result<String> {
    html2text::from_read(html.as_bytes(), width.max(20))
        .map_err(|e| anyhow!("failed to render HTML body: {e}"))
}

/// Collapse whitespace runs onto one line and cap at `max_chars`.
pub fn one_line(s: &str, max_chars: usize) -> String {
    let mut out = String::new();
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        if out.chars().count() >= max_chars {
            break;
        }
    }
    out.chars().take(max_chars).collect()
}

/// `[uid] from : subject`
pub fn summary_line(m: &MessageSummary) -> String {
    format!(
        "[{}] {} : {}",
        m.uid.as_deref().unwrap_or("?"),
        m.from,
        one_line(m.subject.as_deref().unwrap_or("(no subject)"), 120)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_collapses_and_truncates() {
        assert_eq!(one_line("  Your\n  Steam   code\t", 80), "Your Steam code");
        assert_eq!(one_line("abcdef ghij", 4), "abcd");
        assert_eq!(one_line("", 10), "");
    }

    #[test]
    fn summary_line_formats_missing_fields() {
        let m = MessageSummary {
            uid: Some("12".into()),
            subject: None,
            from: "Unknown".into(),
            date: None,
        };
        assert_eq!(summary_line(&m), "[12] Unknown : (no subject)");
    }

    #[test]
    fn plain_body_is_untouched() {
        let body = MessageBody {
            html: None,
            plain: Some("code: 4F7KX".into()),
        };
        assert_eq!(body_to_text(&body, 80, false).unwrap(), "code: 4F7KX");
    }

    #[test]
    fn html_body_is_rendered_unless_raw() {
        let body = MessageBody {
            html: Some("<p>Your code is <b>4F7KX</b></p>".into()),
            plain: None,
        };
        let text = body_to_text(&body, 80, false).unwrap();
        assert!(text.contains("4F7KX"));
        assert!(!text.contains("<p>"));

        let raw = body_to_text(&body, 80, true).unwrap();
        assert_eq!(raw, "<p>Your code is <b>4F7KX</b></p>");
    }
}
