/// A whitespace-delimited word of the export together with its 1-based line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Token<'a> {
    pub text: &'a str,
    pub line: usize,
}

impl Token<'_> {
    /// Section tags are bracketed words such as `[CONTR]` or `[#ARCS]`.
    pub fn is_tag(&self) -> bool {
        self.text.starts_with('[')
    }

    /// Space groups always open with a parenthesis, e.g. `(HH,PP)`.
    pub fn is_space_group(&self) -> bool {
        self.text.starts_with('(')
    }
}

/// Splits the export into tokens.
pub(super) fn tokenize(content: &str) -> Vec<Token<'_>> {
    content
        .lines()
        .enumerate()
        .flat_map(|(n, line)| {
            line.split_whitespace()
                .map(move |text| Token { text, line: n + 1 })
        })
        .collect()
}
