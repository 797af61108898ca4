use crate::parser::error::*;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Number(u16),
    Dice,
    KeepHighest,
    KeepLowest,
    Advantage,
    Disadvantage,
    Plus,
    Minus,
    Multiply,
    Divide,
    FloorDivide,
    Power,
    LeftParenthesis,
    RightParenthesis,
    Eof,
}


#[derive(Debug)]
pub(crate) struct Lexer {
    input: Vec<char>,
    pub position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token> {
        self.skip_whitespace();

        if self.position >= self.input.len() {
            return Ok(Token::Eof);
        }

        let ch = self.input[self.position];

        match ch {
            '+' => {
                self.position += 1;
                Ok(Token::Plus)
            }
            '-' => {
                self.position += 1;
                Ok(Token::Minus)
            }
            '*' => {
                self.position += 1;
                if self.peek_char() == Some('*') {
                    self.position += 1;
                    Ok(Token::Power)
                } else {
                    Ok(Token::Multiply)
                }
            }
            '/' => {
                self.position += 1;
                if self.peek_char() == Some('/') {
                    self.position += 1;
                    Ok(Token::FloorDivide)
                } else {
                    Ok(Token::Divide)
                }
            }
            // alias for **
            '^' => {
                self.position += 1;
                Ok(Token::Power)
            }
            '(' => {
                self.position += 1;
                Ok(Token::LeftParenthesis)
            }
            ')' => {
                self.position += 1;
                Ok(Token::RightParenthesis)
            }
            '0'..='9' => self.read_number(),
            'a'..='z' | 'A'..='Z' => self.read_identifier(),
            _ => Err(ParseError::Token(ch)),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.input.len() && self.input[self.position].is_whitespace() {
            self.position += 1;
        }
    }

    fn read_number(&mut self) -> LexResult<Token> {
        let start = self.position;
        while self.position < self.input.len() && self.input[self.position].is_ascii_digit() {
            self.position += 1;
        }

        let number_str: String = self.input[start..self.position].iter().collect();
        let number: u16 = number_str.parse()?;

        Ok(Token::Number(number))
    }

    fn read_identifier(&mut self) -> LexResult<Token> {
        let start = self.position;
        while self.position < self.input.len() && self.input[self.position].is_alphabetic() {
            self.position += 1;
        }

        let identifier: String = self.input[start..self.position].iter().collect();
        match identifier.as_str() {
            "d" => Ok(Token::Dice),
            "k" => Ok(Token::KeepHighest),
            "l" => Ok(Token::KeepLowest),
            "A" => Ok(Token::Advantage),
            "D" => Ok(Token::Disadvantage),
            other => Err(ParseError::Identifier(other.into())),
        }
    }
}
