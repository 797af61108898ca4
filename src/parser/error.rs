/// Errors produced while tokenizing or parsing dice notation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Wraps another parse error with the input position it occurred at.
    #[error("at position {0} - {1}")]
    AtPosition(usize, Box<ParseError>),

    /// A character outside the notation alphabet.
    #[error("invalid token: {0}")]
    Token(char),

    /// A numeric field that does not fit the supported integer range.
    #[error("invalid number: {0}")]
    Number(#[from] std::num::ParseIntError),

    /// An alphabetic sequence that is not `d`, `k`, `l`, `A` or `D`.
    #[error("invalid identifier: {0}")]
    Identifier(String),

    /// The input contained no tokens at all.
    #[error("input string is empty")]
    Empty,

    /// A `(` without a matching `)`.
    #[error("parenthesis was not closed")]
    UnclosedParenthesis,

    /// Input left over after a complete expression was parsed.
    #[error("unexpected trailing token: {0}")]
    TrailingToken(String),

    /// The `d` separator was not followed by a number of sides.
    #[error("expected die sides after 'd', got {0}")]
    ExpectedSides(String),

    /// A `k` or `l` modifier was not followed by a keep count.
    #[error("expected keep count after modifier, got {0}")]
    ExpectedKeepCount(String),

    /// An `A`/`D` marker was applied to something other than a dice group.
    #[error("advantage marker requires a dice group, got {0}")]
    MarkerWithoutDice(String),

    /// A `d` separator with an operand that is not a plain dice count.
    #[error("unexpected dice expression, expected literal number, got {0}")]
    UnexpectedDiceExpression(String),

    /// A token that cannot start an operand. Covers leading unary signs,
    /// which the notation deliberately does not support.
    #[error("unexpected prefix: {0}")]
    UnexpectedPrefix(String),

    /// A token that cannot join two operands.
    #[error("unexpected infix: {0}")]
    UnexpectedInfix(String),
}

impl ParseError {
    /// Unwraps an [`ParseError::AtPosition`] to the underlying error.
    pub fn err(&self) -> &Self {
        match self {
            ParseError::AtPosition(_, err) => err.as_ref(),
            other => other,
        }
    }

    /// The input position, if this error carries one.
    pub fn pos(&self) -> Option<&usize> {
        match self {
            ParseError::AtPosition(position, _) => Some(position),
            _ => None,
        }
    }

    /// Wraps this error with an input position, unless already wrapped.
    pub fn at_pos(self, position: usize) -> Self {
        match self {
            ParseError::AtPosition(_, _) => self,
            other => ParseError::AtPosition(position, Box::new(other)),
        }
    }
}

pub(crate) type LexResult<T> = std::result::Result<T, ParseError>;
