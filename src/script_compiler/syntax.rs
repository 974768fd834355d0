// Token classification for event script source

/// Answers what a single token is. The assembler only ever asks these
/// questions; it never looks at token text itself.
pub trait TokenClassifier {
    /// The label name if `token` defines a label (`NAME:`).
    fn label_definition<'t>(&self, token: &'t str) -> Option<&'t str>;

    fn is_directive(&self, token: &str) -> bool;

    fn is_symbolic_name(&self, token: &str) -> bool;

    fn integer_literal(&self, token: &str) -> Option<u32>;

    /// Unescaped content if `token` is a quoted string literal.
    fn string_literal(&self, token: &str) -> Option<String>;
}

/// The event script syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptSyntax;

impl TokenClassifier for ScriptSyntax {
    fn label_definition<'t>(&self, token: &'t str) -> Option<&'t str> {
        let name = token.strip_suffix(':')?;
        if self.is_symbolic_name(name) {
            Some(name)
        } else {
            None
        }
    }

    fn is_directive(&self, token: &str) -> bool {
        token
            .strip_prefix('.')
            .is_some_and(|name| self.is_symbolic_name(name))
    }

    fn is_symbolic_name(&self, token: &str) -> bool {
        let mut chars = token.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    fn integer_literal(&self, token: &str) -> Option<u32> {
        let (negative, digits) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };

        let magnitude = if let Some(hex) = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
        {
            parse_digits(hex, 16)?
        } else if let Some(bin) = digits
            .strip_prefix("0b")
            .or_else(|| digits.strip_prefix("0B"))
        {
            parse_digits(bin, 2)?
        } else {
            parse_digits(digits, 10)?
        };

        if negative {
            if magnitude > 1 << 31 {
                return None;
            }
            Some((magnitude as u32).wrapping_neg())
        } else {
            u32::try_from(magnitude).ok()
        }
    }

    fn string_literal(&self, token: &str) -> Option<String> {
        if token.len() < 2 {
            return None;
        }
        let inner = token.strip_prefix('"')?.strip_suffix('"')?;

        let mut content = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            if ch == '\\' {
                match chars.next()? {
                    'n' => content.push('\n'),
                    't' => content.push('\t'),
                    other => content.push(other),
                }
            } else if ch == '"' {
                // An unescaped quote in the middle means the token is not one string.
                return None;
            } else {
                content.push(ch);
            }
        }
        Some(content)
    }
}

// Rejects signs and underscores that from_str_radix would otherwise take.
fn parse_digits(digits: &str, radix: u32) -> Option<u64> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}
