use crate::{Dice, Edge, Error, Keep};
use crate::parser::error::ParseError;
use crate::parser::{Lexer, Token, Expr};


#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest = 1,
    Sum = 2,
    Product = 3,
    Power = 4,
    Dice = 5,
}

impl Precedence {
    fn of_token(token: &Token) -> Self {
        match token {
            Token::Plus | Token::Minus => Precedence::Sum,
            Token::Multiply | Token::Divide | Token::FloorDivide => Precedence::Product,
            Token::Power => Precedence::Power,
            Token::Dice => Precedence::Dice,
            _ => Precedence::Lowest,
        }
    }
}


/// A Pratt parser for dice notation strings.
///
/// The parser tokenizes its input and constructs an [`Expr`] tree. The `d`
/// separator binds tightest, then `**` (right-associative), then `* / //`,
/// then `+ -`. Unary signs are not part of the grammar; a sign can only join
/// two operands.
#[derive(Debug)]
pub struct Parser {
    lexer: Lexer,
    current: Token,
    peek: Token,
}

impl Parser {
    /// Creates a new `Parser` for the given input string.
    ///
    /// # Errors
    /// [`ParseError::Empty`] when the input holds no tokens, or a
    /// tokenization error for the first characters.
    ///
    /// # Examples
    /// ```
    /// use multi_dice::{Parser, ParseError, Error};
    ///
    /// assert!(Parser::new("1d6+3").is_ok());
    ///
    /// let empty = Parser::new("  ").unwrap_err();
    /// assert!(matches!(empty, Error::Parse(ParseError::Empty)));
    /// ```
    pub fn new(input: &str) -> Result<Self, Error> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;

        if current == Token::Eof {
            return Err(ParseError::Empty.into());
        }

        let peek = lexer.next_token()?;
        Ok(Self { lexer, current, peek })
    }

    /// Parses the entire input into an [`Expr`].
    ///
    /// # Errors
    /// Parse errors are wrapped with positional information via
    /// [`ParseError::at_pos()`]; dice-group bound violations surface as
    /// [`Error::Range`] unwrapped.
    ///
    /// # Examples
    /// ```
    /// use multi_dice::Parser;
    ///
    /// let expr = Parser::new("1+2").unwrap().parse().unwrap();
    /// assert_eq!(format!("{expr}"), "(1+2)");
    /// ```
    pub fn parse(&mut self) -> Result<Expr, Error> {
        let expr = self.parse_tokens(Precedence::Lowest)
            .map_err(|err| Self::position_wrap(err, self.lexer.position))?;

        if self.peek != Token::Eof {
            let err = ParseError::TrailingToken(format!("{:?}", self.peek));
            return Err(Self::position_wrap(err.into(), self.lexer.position));
        }

        Ok(expr)
    }

    fn position_wrap(err: Error, position: usize) -> Error {
        match err {
            Error::Parse(parse_err) => Error::Parse(parse_err.at_pos(position)),
            other => other,
        }
    }

    fn next_token(&mut self) -> Result<(), Error> {
        self.current = self.peek;
        self.peek = self.lexer.next_token()?;

        Ok(())
    }

    fn parse_tokens(&mut self, precedence: Precedence) -> Result<Expr, Error> {
        let mut expr = self.parse_prefix()?;

        while self.peek != Token::Eof && precedence < self.peek_precedence() {
            self.next_token()?;
            expr = self.parse_infix(expr)?;
        }

        Ok(expr)
    }

    fn parse_prefix(&mut self) -> Result<Expr, Error> {
        match self.current {
            Token::Number(v) => Ok(v.into()),

            Token::LeftParenthesis => {
                self.next_token()?;
                let expr = self.parse_tokens(Precedence::Lowest)?;

                if self.peek != Token::RightParenthesis {
                    return Err(ParseError::UnclosedParenthesis.into());
                }

                self.next_token()?;
                Ok(expr)
            }

            Token::Advantage | Token::Disadvantage => {
                let edge = match self.current {
                    Token::Advantage => Edge::Advantage,
                    _ => Edge::Disadvantage,
                };

                self.next_token()?;
                // Bind only the dice group, not a following operator.
                let operand = self.parse_tokens(Precedence::Power)?;

                match operand {
                    Expr::Dice(dice) => Ok(Expr::Dice(dice.with_edge(edge))),
                    other => Err(ParseError::MarkerWithoutDice(format!("{other:?}")).into()),
                }
            }

            other => {
                let token = format!("{other:?}");
                match (other, self.peek) {
                    (Token::Dice, _) | (_, Token::Dice) =>
                        Err(ParseError::UnexpectedDiceExpression(token).into()),
                    _ => Err(ParseError::UnexpectedPrefix(token).into()),
                }
            }
        }
    }

    fn parse_infix(&mut self, expr: Expr) -> Result<Expr, Error> {
        match self.current {
            Token::Dice => self.parse_dice(expr),
            Token::Plus | Token::Minus | Token::Multiply | Token::Divide
            | Token::FloorDivide | Token::Power => self.parse_binary_op(expr),
            other => Err(ParseError::UnexpectedInfix(format!("{other:?}")).into()),
        }
    }

    fn parse_binary_op(&mut self, left: Expr) -> Result<Expr, Error> {
        let op = self.current;
        self.next_token()?;

        // ** is right-associative, so its right operand is parsed one
        // precedence level lower to let another ** win the tie.
        let precedence = match op {
            Token::Power => Precedence::Product,
            _ => Precedence::of_token(&op),
        };
        let right = self.parse_tokens(precedence)?;

        match op {
            Token::Plus => Ok(Expr::add(left, right)),
            Token::Minus => Ok(Expr::sub(left, right)),
            Token::Multiply => Ok(Expr::mul(left, right)),
            Token::Divide => Ok(Expr::div(left, right)),
            Token::FloorDivide => Ok(Expr::floor_div(left, right)),
            Token::Power => Ok(Expr::pow(left, right)),
            other => unreachable!("{other:?}"),
        }
    }

    fn parse_dice(&mut self, count_expr: Expr) -> Result<Expr, Error> {
        let count = match count_expr {
            Expr::Literal(n) => n,
            other => return Err(ParseError::UnexpectedDiceExpression(format!("{other:?}")).into()),
        };

        let sides = match self.peek {
            Token::Number(sides) => sides,
            other => return Err(ParseError::ExpectedSides(format!("{other:?}")).into()),
        };

        self.next_token()?;

        let keep = self.parse_keep()?;

        Ok(
            Dice::builder(sides)
                .count(count)
                .keep(keep)
                .build()?
                .into()
        )
    }

    fn parse_keep(&mut self) -> Result<Keep, Error> {
        match self.peek {
            Token::KeepHighest | Token::KeepLowest => {
                self.next_token()?;
                let keep_token = self.current;

                let n = match self.peek {
                    Token::Number(n) => {
                        self.next_token()?;
                        n
                    }
                    other => {
                        return Err(ParseError::ExpectedKeepCount(format!("{other:?}")).into())
                    }
                };

                match keep_token {
                    Token::KeepHighest => Ok(Keep::Highest(n)),
                    Token::KeepLowest => Ok(Keep::Lowest(n)),
                    other => unreachable!("{other:?}"),
                }
            }
            _ => Ok(Keep::All),
        }
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of_token(&self.peek)
    }
}
