//! Calculator display buffer.
//!
//! Models the key grid: digits append, operator glyphs are debounced so two
//! never sit next to each other, `()` picks the bracket to insert, `=`
//! replaces the display with the result.

use std::fmt;
use std::str::FromStr;

use crate::error::EvalError;

use super::evaluate;

/// Glyphs that may not follow one another.
pub const OPERATORS: &[char] = &['(', ')', '%', '÷', '×', '-', '+', 'π', '√', '^', '!'];

/// A calculator key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// `0`-`9` or `.`
    Digit(char),
    /// One of [`OPERATORS`].
    Operator(char),
    /// The `()` key.
    Brackets,
    /// `⌫`
    Backspace,
    /// `AC`
    Clear,
    /// `=`
    Equals,
}

impl Key {
    /// Label printed on the key.
    pub fn label(self) -> String {
        match self {
            Key::Digit(c) | Key::Operator(c) => c.to_string(),
            Key::Brackets => "()".to_string(),
            Key::Backspace => "⌫".to_string(),
            Key::Clear => "AC".to_string(),
            Key::Equals => "=".to_string(),
        }
    }

    /// All keys on the grid, row by row.
    pub fn grid() -> [[Key; 4]; 6] {
        use Key::*;
        [
            [Clear, Brackets, Operator('%'), Operator('÷')],
            [Operator('√'), Operator('π'), Operator('^'), Operator('!')],
            [Digit('7'), Digit('8'), Digit('9'), Operator('×')],
            [Digit('4'), Digit('5'), Digit('6'), Operator('-')],
            [Digit('1'), Digit('2'), Digit('3'), Operator('+')],
            [Digit('0'), Digit('.'), Backspace, Equals],
        ]
    }
}

/// Error for an unrecognised key name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown key: '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    /// Accepts key labels plus the keyboard aliases (`*`, `/`, `enter`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "()" => Key::Brackets,
            "⌫" | "backspace" | "bs" => Key::Backspace,
            "AC" | "ac" | "clear" => Key::Clear,
            "=" | "enter" | "return" => Key::Equals,
            "*" | "x" => Key::Operator('×'),
            "/" => Key::Operator('÷'),
            "pi" => Key::Operator('π'),
            "sqrt" => Key::Operator('√'),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() || c == '.' => Key::Digit(c),
                    (Some(c), None) if OPERATORS.contains(&c) => Key::Operator(c),
                    _ => return Err(UnknownKey(s.to_string())),
                }
            }
        };
        Ok(key)
    }
}

/// How the `()` key chooses between `(` and `)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BracketMode {
    /// Alternate `(` and `)` on every press, ignoring nesting.
    Toggle,
    /// Track nesting depth: open after an operator or at depth zero,
    /// otherwise close.
    #[default]
    Depth,
}

impl fmt::Display for BracketMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketMode::Toggle => write!(f, "toggle"),
            BracketMode::Depth => write!(f, "depth"),
        }
    }
}

/// The calculator's input buffer and the state that guards it.
#[derive(Debug, Clone, Default)]
pub struct DisplayBuffer {
    text: String,
    last: Option<char>,
    mode: BracketMode,
    /// Toggle mode: whether the next `()` press opens.
    open_next: bool,
    /// Depth mode: number of unclosed `(`.
    depth: usize,
}

impl DisplayBuffer {
    pub fn new(mode: BracketMode) -> Self {
        Self {
            mode,
            open_next: true,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The last character inserted by a key press, used for debouncing.
    pub fn last(&self) -> Option<char> {
        self.last
    }

    pub fn mode(&self) -> BracketMode {
        self.mode
    }

    /// Unclosed bracket count (depth mode).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Apply a key press.
    ///
    /// Only `=` can fail; on failure the display text is left as it was and
    /// the error is handed back for the caller to show.
    pub fn press(&mut self, key: Key) -> Result<(), EvalError> {
        match key {
            Key::Clear => {
                self.text.clear();
                self.last = None;
                self.open_next = true;
                self.depth = 0;
            }
            Key::Brackets => self.press_brackets(),
            Key::Backspace => {
                if let Some(removed) = self.text.pop() {
                    match removed {
                        '(' => self.depth = self.depth.saturating_sub(1),
                        ')' => self.depth += 1,
                        _ => {}
                    }
                    self.last = self.text.chars().last();
                }
            }
            Key::Operator(c) => {
                if self.last.is_some_and(|l| OPERATORS.contains(&l)) {
                    return Ok(());
                }
                self.push_tracked(c);
                self.last = Some(c);
            }
            Key::Digit(c) => {
                self.text.push(c);
                self.last = Some(c);
            }
            Key::Equals => match evaluate(&self.text) {
                Ok(result) => {
                    self.last = result.chars().last();
                    self.text = result;
                    self.depth = 0;
                }
                Err(e) => {
                    self.last = None;
                    return Err(e);
                }
            },
        }
        Ok(())
    }

    /// Press every key in order, collecting the errors `=` produced.
    pub fn press_all<I>(&mut self, keys: I) -> Vec<EvalError>
    where
        I: IntoIterator<Item = Key>,
    {
        keys.into_iter()
            .filter_map(|key| self.press(key).err())
            .collect()
    }

    fn press_brackets(&mut self) {
        match self.mode {
            BracketMode::Toggle => {
                self.text.push(if self.open_next { '(' } else { ')' });
                self.open_next = !self.open_next;
            }
            BracketMode::Depth => {
                let after_operator = match self.text.chars().last() {
                    None => true,
                    Some(c) => c == '(' || (OPERATORS.contains(&c) && !matches!(c, ')' | 'π' | '!')),
                };
                if self.depth == 0 || after_operator {
                    self.push_tracked('(');
                } else {
                    self.push_tracked(')');
                }
            }
        }
    }

    /// Append a character, keeping the depth counter in step with brackets.
    fn push_tracked(&mut self, c: char) {
        match c {
            '(' => self.depth += 1,
            ')' => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        self.text.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(labels: &[&str]) -> Vec<Key> {
        labels.iter().map(|l| l.parse().unwrap()).collect()
    }

    fn typed(mode: BracketMode, labels: &[&str]) -> DisplayBuffer {
        let mut buffer = DisplayBuffer::new(mode);
        let errors = buffer.press_all(keys(labels));
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        buffer
    }

    #[test]
    fn test_digits_and_equals() {
        let buffer = typed(BracketMode::Depth, &["1", "2", "+", "3", "="]);
        assert_eq!(buffer.text(), "15");
        assert_eq!(buffer.last(), Some('5'));
    }

    #[test]
    fn test_operator_debounce() {
        let buffer = typed(BracketMode::Depth, &["5", "+", "×", "-", "2"]);
        assert_eq!(buffer.text(), "5+2");
    }

    #[test]
    fn test_backspace_restores_last() {
        let mut buffer = typed(BracketMode::Depth, &["5", "+"]);
        buffer.press(Key::Backspace).unwrap();
        assert_eq!(buffer.text(), "5");
        assert_eq!(buffer.last(), Some('5'));

        // The operator is accepted again once the previous one is gone
        buffer.press(Key::Operator('×')).unwrap();
        assert_eq!(buffer.text(), "5×");

        let mut empty = DisplayBuffer::new(BracketMode::Depth);
        empty.press(Key::Backspace).unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_clear() {
        let mut buffer = typed(BracketMode::Toggle, &["()", "4"]);
        buffer.press(Key::Clear).unwrap();
        assert_eq!(buffer.text(), "");
        assert_eq!(buffer.last(), None);

        // Toggle restarts with an opening bracket
        buffer.press(Key::Brackets).unwrap();
        assert_eq!(buffer.text(), "(");
    }

    #[test]
    fn test_toggle_mode_alternates() {
        let buffer = typed(BracketMode::Toggle, &["()", "()", "()", "()"]);
        assert_eq!(buffer.text(), "()()");

        // Nesting is impossible in toggle mode
        let buffer = typed(BracketMode::Toggle, &["()", "2", "×", "()", "3"]);
        assert_eq!(buffer.text(), "(2×)3");
    }

    #[test]
    fn test_depth_mode_nests() {
        let buffer = typed(
            BracketMode::Depth,
            &["()", "2", "×", "()", "3", "+", "1", "()", "()", "="],
        );
        assert_eq!(buffer.text(), "8");
        assert_eq!(buffer.depth(), 0);
    }

    #[test]
    fn test_depth_mode_opens_at_zero_depth() {
        let buffer = typed(BracketMode::Depth, &["2", "()", "3"]);
        assert_eq!(buffer.text(), "2(3");
        assert_eq!(buffer.depth(), 1);
    }

    #[test]
    fn test_depth_mode_backspace() {
        let mut buffer = typed(BracketMode::Depth, &["()", "()"]);
        assert_eq!(buffer.text(), "((");
        buffer.press(Key::Backspace).unwrap();
        assert_eq!(buffer.depth(), 1);
    }

    #[test]
    fn test_equals_error_keeps_text() {
        let mut buffer = typed(BracketMode::Depth, &["5", "÷", "0"]);
        let err = buffer.press(Key::Equals).unwrap_err();
        assert_eq!(err, EvalError::DivisionByZero);
        assert_eq!(buffer.text(), "5÷0");
        assert_eq!(buffer.last(), None);
    }

    #[test]
    fn test_result_feeds_next_expression() {
        let buffer = typed(BracketMode::Depth, &["√", "9", "=", "+", "1", "="]);
        assert_eq!(buffer.text(), "4.0");
    }

    #[test]
    fn test_key_aliases() {
        assert_eq!("*".parse::<Key>().unwrap(), Key::Operator('×'));
        assert_eq!("/".parse::<Key>().unwrap(), Key::Operator('÷'));
        assert_eq!("enter".parse::<Key>().unwrap(), Key::Equals);
        assert_eq!("⌫".parse::<Key>().unwrap(), Key::Backspace);
        assert_eq!("7".parse::<Key>().unwrap(), Key::Digit('7'));
        assert!("77".parse::<Key>().is_err());
        assert!("a".parse::<Key>().is_err());
    }

    #[test]
    fn test_grid_labels_parse_back() {
        for row in Key::grid() {
            for key in row {
                assert_eq!(key.label().parse::<Key>().unwrap(), key);
            }
        }
    }
}
