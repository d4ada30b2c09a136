/// Telegram formatting modes for outgoing text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
    MarkdownV2,
    Html,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Markdown => "Markdown",
            ParseMode::MarkdownV2 => "MarkdownV2",
            ParseMode::Html => "HTML",
        }
    }
}

/// An outgoing reply produced by a command handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
        }
    }

    /// Wrap `body` in a fenced code block rendered with legacy Markdown
    pub fn code_block(body: &str) -> Self {
        Self {
            text: format!("```\n{}\n```", body),
            parse_mode: Some(ParseMode::Markdown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_block_fences_body_on_own_lines() {
        let reply = Reply::code_block("aGVsbG8=");
        assert_eq!(reply.text, "```\naGVsbG8=\n```");
        assert_eq!(reply.parse_mode, Some(ParseMode::Markdown));
    }

    #[test]
    fn parse_mode_strings_match_bot_api() {
        assert_eq!(ParseMode::Markdown.as_str(), "Markdown");
        assert_eq!(ParseMode::MarkdownV2.as_str(), "MarkdownV2");
        assert_eq!(ParseMode::Html.as_str(), "HTML");
    }
}
