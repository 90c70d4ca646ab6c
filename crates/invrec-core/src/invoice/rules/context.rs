//! Keyword context validation for reference candidates.

/// Characters inspected on each side of a candidate by default.
pub const DEFAULT_CONTEXT_WINDOW: usize = 30;

/// Uppercase `text` and collapse every run of non-alphanumeric characters to a single space.
///
/// The result is ASCII-only; accented letters are treated as separators.
pub fn clean_text(text: &str) -> String {
    let upper = text.to_uppercase();
    let mut cleaned = String::with_capacity(upper.len());
    let mut pending_space = false;

    for c in upper.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_space && !cleaned.is_empty() {
                cleaned.push(' ');
            }
            pending_space = false;
            cleaned.push(c);
        } else {
            pending_space = true;
        }
    }

    cleaned
}

/// Check whether any keyword appears within 30 characters of `number` on `line`.
///
/// Keywords are compared against the uppercased, cleaned line.
pub fn is_valid_context<S: AsRef<str>>(line: &str, number: &str, keywords: &[S]) -> bool {
    ContextValidator::new(keywords).is_valid(line, number)
}

/// Keyword list plus window size, prepared once per run.
#[derive(Debug, Clone)]
pub struct ContextValidator {
    keywords: Vec<String>,
    window: usize,
}

impl ContextValidator {
    /// Create a validator with the default window.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.as_ref().trim().to_uppercase())
                .filter(|k| !k.is_empty())
                .collect(),
            window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    /// Set the number of characters inspected on each side.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// True when a keyword occurs in the text immediately around `number`.
    pub fn is_valid(&self, line: &str, number: &str) -> bool {
        let cleaned = clean_text(line);
        let Some(pos) = find_token(&cleaned, number) else {
            return false;
        };

        // cleaned is ASCII, so byte offsets are character offsets
        let before = cleaned[..pos].trim();
        let after = cleaned[pos + number.len()..].trim();

        let before = &before[before.len().saturating_sub(self.window)..];
        let after = &after[..after.len().min(self.window)];

        self.keywords
            .iter()
            .any(|k| before.contains(k.as_str()) || after.contains(k.as_str()))
    }
}

/// Position of `needle` as a standalone token, else its first occurrence.
fn find_token(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }

    let bytes = haystack.as_bytes();
    haystack
        .match_indices(needle)
        .map(|(pos, _)| pos)
        .find(|&pos| {
            let end = pos + needle.len();
            let left_ok = pos == 0 || !bytes[pos - 1].is_ascii_alphanumeric();
            let right_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
            left_ok && right_ok
        })
        .or_else(|| haystack.find(needle))
}
