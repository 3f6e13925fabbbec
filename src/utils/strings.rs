/// Folds typographic variants of quotes, dashes and spaces to their ASCII form.
pub fn clean_typography_symbols(text: &str) -> String {
    let mut output = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '“' | '”' | '„' => output.push('"'),
            '’' | '‘' | '᾽' | 'ʼ' => output.push('\''),

            '—' | '–' | '‐' => output.push('-'),

            '\u{00A0}' | '\u{2007}' | '\u{202F}' => output.push(' '),

            '…' => output.push_str("..."),
            '«' => output.push_str("<<"),
            '»' => output.push_str(">>"),

            _ => output.push(c),
        }
    }
    output
}

/// Canonical form of user text used for cache keys: typography folded,
/// whitespace runs collapsed, ends trimmed.
pub fn normalize_source_text(text: &str) -> String {
    clean_typography_symbols(text)
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Removes markdown code fence markers wherever they occur.
pub fn strip_code_fences(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_and_typography() {
        assert_eq!(
            normalize_source_text("  Photosynthesis\n\tuses   “sunlight”  "),
            "Photosynthesis uses \"sunlight\""
        );
        assert_eq!(normalize_source_text("a\u{00A0}b"), "a b");
        assert_eq!(normalize_source_text("   \n "), "");
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  ```\n[]\n```  "), "[]");
        assert_eq!(strip_code_fences("{}"), "{}");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefgh", 5), "abcd…");
    }
}
