//! Cleanup applied to raw model output before it is displayed or stored.
//!
//! Some free-tier models leak chat-template markup into their replies. The
//! sanitizer strips a fixed list of literal tokens and then collapses every
//! run of whitespace into a single space.

/// Literal markup removed from responses, in removal order. Matching is
/// case-sensitive and exact.
pub const MARKUP_TOKENS: &[&str] = &[
    "<s>",
    "</s>",
    "<|s|>",
    "<|/s|>",
    "[OUT]",
    "[/OUT]",
    "[INST]",
    "[/INST]",
    "<|im_start|>",
    "<|im_end|>",
    "<|assistant|>",
    "<|user|>",
    "<|system|>",
    "<<SYS>>",
    "<</SYS>>",
    "###",
    "Assistant:",
    "Human:",
    "User:",
];

/// Sanitize an optional response body. Missing content yields an empty string.
pub fn clean_response(content: Option<&str>) -> String {
    match content {
        Some(text) => clean(text),
        None => String::new(),
    }
}

/// Strip markup tokens and normalize whitespace.
pub fn clean(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    // Removing one token can splice the halves of another together
    // ("<<s>/s>"), so sweep until nothing changes.
    let mut text = strip_tokens(content);
    loop {
        let next = strip_tokens(&text);
        if next == text {
            break;
        }
        text = next;
    }

    collapse_whitespace(&text)
}

fn strip_tokens(content: &str) -> String {
    MARKUP_TOKENS
        .iter()
        .fold(content.to_string(), |acc, token| acc.replace(token, ""))
}

fn collapse_whitespace(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_missing_input_yield_empty_string() {
        assert_eq!(clean(""), "");
        assert_eq!(clean_response(None), "");
        assert_eq!(clean_response(Some("")), "");
    }

    #[test]
    fn whitespace_runs_collapse_to_single_spaces() {
        assert_eq!(clean("a   b\n\nc"), "a b c");
        assert_eq!(clean("  \t leading and trailing \r\n "), "leading and trailing");
    }

    #[test]
    fn strips_sequence_and_instruction_markers() {
        assert_eq!(clean("<s>Hi there</s>"), "Hi there");
        assert_eq!(clean("[INST] ignored wrapper [/INST] answer"), "ignored wrapper answer");
        assert_eq!(
            clean("<|im_start|>assistant\nSure thing<|im_end|>"),
            "assistant Sure thing"
        );
        assert_eq!(clean("<<SYS>>rules<</SYS>>"), "rules");
    }

    #[test]
    fn strips_role_label_prefixes() {
        assert_eq!(clean("Assistant: Hello Human: hi User: hey"), "Hello hi hey");
        assert_eq!(clean("### Heading"), "Heading");
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(clean("assistant: lower <S>"), "assistant: lower <S>");
    }

    #[test]
    fn no_configured_token_survives() {
        let mut noisy = String::new();
        for (i, token) in MARKUP_TOKENS.iter().enumerate() {
            noisy.push_str(token);
            noisy.push_str(&format!(" word{i} "));
        }
        // Tokens nested inside each other.
        noisy.push_str("<<s>/s> <|<s>im_end|> Assis</s>tant: [/[INST]INST]");

        let cleaned = clean(&noisy);
        for token in MARKUP_TOKENS {
            assert!(
                !cleaned.contains(token),
                "token {token:?} survived in {cleaned:?}"
            );
        }
    }

    #[test]
    fn cleaning_is_idempotent() {
        let samples = [
            "",
            "   ",
            "plain text",
            "<s>Hi there</s>",
            "a   b\n\nc",
            "<</s>s> spliced",
            "User:User: doubled",
            "#### four hashes",
            "<|<|s|>im_start|> nested",
            "Us<s>er: split label",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not idempotent for {sample:?}");
        }
    }
}
