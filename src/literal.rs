use std::fmt;

/// The payload a token carries when it is a number or string literal.
/// Non-empty only for `Number` and `String` tokens, per the scanner's
/// closed token set (every other token kind carries `None`).
#[derive(Debug, PartialEq, Clone)]
pub enum TokenLiteral {
    String(String),
    Number(f64),
}

impl fmt::Display for TokenLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenLiteral::String(s) => write!(f, "{s}"),
            TokenLiteral::Number(n) => write!(f, "{n}"),
        }
    }
}
