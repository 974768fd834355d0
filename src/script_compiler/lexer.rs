// Script Line Lexer
// Splits event script source into statements, one `Line` per non-empty source line

/// One source statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    tokens: Vec<String>,
    number: usize,
    text: String,
    code_offset: Option<usize>,
}

impl Line {
    pub fn new(number: usize, text: &str, tokens: Vec<String>) -> Self {
        Line {
            tokens,
            number,
            text: text.to_string(),
            code_offset: None,
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// 1-based line number in the source file.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset this line's compiled form starts at. `None` until the
    /// line has gone through pass 1.
    pub fn code_offset(&self) -> Option<usize> {
        self.code_offset
    }

    pub fn set_code_offset(&mut self, offset: usize) {
        self.code_offset = Some(offset);
    }
}

/// Split a whole script into lines. Blank and comment-only lines are dropped.
pub fn split_source(source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let tokens = LineLexer::new(raw).tokenize();
            if tokens.is_empty() {
                None
            } else {
                Some(Line::new(index + 1, raw.trim(), tokens))
            }
        })
        .collect()
}

pub struct LineLexer {
    input: Vec<char>,
    position: usize,
}

impl LineLexer {
    pub fn new(input: &str) -> Self {
        LineLexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn tokenize(&mut self) -> Vec<String> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.current_char() {
            if is_separator(ch) {
                self.position += 1;
            } else if ch == ';' {
                break;
            } else if ch == '"' {
                tokens.push(self.read_quoted());
            } else {
                tokens.push(self.read_word());
            }
        }

        tokens
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn read_word(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if is_separator(ch) || ch == ';' || ch == '"' {
                break;
            }
            self.position += 1;
        }
        self.input[start..self.position].iter().collect()
    }

    // Keeps the quotes; an unterminated string runs to end of line.
    fn read_quoted(&mut self) -> String {
        let start = self.position;
        self.position += 1;
        let mut escaped = false;

        while let Some(ch) = self.current_char() {
            self.position += 1;
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                break;
            }
        }

        self.input[start..self.position].iter().collect()
    }
}

fn is_separator(ch: char) -> bool {
    ch.is_ascii_whitespace() || ch == ','
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
