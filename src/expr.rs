//! Expression compilation: tokenizer, Pratt parser, `f64` evaluator.
//!
//! Turns an equation string like `"2x sin(x) + 1"` into a callable
//! `f64 -> f64`. Evaluation is total: domain errors (`sqrt(-1)`, `ln(-2)`,
//! division by zero) surface as NaN/infinity through IEEE semantics and are
//! filtered downstream by the validity classifier. A parse failure is the
//! only error a caller ever sees.

use crate::{CourbeError, Result};
use error_stack::report;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Log10,
    Ln,
    Sqrt,
    Abs,
}

impl Func {
    /// Accepts both the usual names and the short hyperbolic aliases
    /// (`sh`, `ch`, `th`, `argsh`, ...) commonly typed into graphers.
    fn from_name(name: &str) -> Option<Func> {
        Some(match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "arcsin" | "asin" => Func::Asin,
            "arccos" | "acos" => Func::Acos,
            "arctan" | "atan" => Func::Atan,
            "sh" | "sinh" => Func::Sinh,
            "ch" | "cosh" => Func::Cosh,
            "th" | "tanh" => Func::Tanh,
            "argsh" | "asinh" => Func::Asinh,
            "argch" | "acosh" => Func::Acosh,
            "argth" | "atanh" => Func::Atanh,
            "log" => Func::Log10,
            "ln" => Func::Ln,
            "sqrt" => Func::Sqrt,
            "abs" => Func::Abs,
            _ => return None,
        })
    }

    fn apply(self, v: f64) -> f64 {
        match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Asin => v.asin(),
            Func::Acos => v.acos(),
            Func::Atan => v.atan(),
            Func::Sinh => v.sinh(),
            Func::Cosh => v.cosh(),
            Func::Tanh => v.tanh(),
            Func::Asinh => v.asinh(),
            Func::Acosh => v.acosh(),
            Func::Atanh => v.atanh(),
            Func::Log10 => v.log10(),
            Func::Ln => v.ln(),
            Func::Sqrt => v.sqrt(),
            Func::Abs => v.abs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Ast {
    Number(f64),
    Var,
    Add(Box<Ast>, Box<Ast>),
    Sub(Box<Ast>, Box<Ast>),
    Mul(Box<Ast>, Box<Ast>),
    Div(Box<Ast>, Box<Ast>),
    Pow(Box<Ast>, Box<Ast>),
    Neg(Box<Ast>),
    Call(Func, Box<Ast>),
}

impl Ast {
    pub(crate) fn eval(&self, x: f64) -> f64 {
        match self {
            Ast::Number(v) => *v,
            Ast::Var => x,
            Ast::Add(a, b) => a.eval(x) + b.eval(x),
            Ast::Sub(a, b) => a.eval(x) - b.eval(x),
            Ast::Mul(a, b) => a.eval(x) * b.eval(x),
            Ast::Div(a, b) => a.eval(x) / b.eval(x),
            Ast::Pow(a, b) => a.eval(x).powf(b.eval(x)),
            Ast::Neg(a) => -a.eval(x),
            Ast::Call(f, a) => f.apply(a.eval(x)),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut text = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        text.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: f64 = text.parse().map_err(|_| {
                    report!(CourbeError).attach_printable(format!("invalid number '{text}'"))
                })?;
                tokens.push(Token::Number(value));
            }
            'a'..='z' | 'A'..='Z' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphabetic() {
                        name.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '^' => {
                chars.next();
                tokens.push(Token::Caret);
            }
            '²' => {
                chars.next();
                tokens.push(Token::Caret);
                tokens.push(Token::Number(2.0));
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            _ => {
                return Err(report!(CourbeError)
                    .attach_printable(format!("unexpected character '{c}'")));
            }
        }
    }

    Ok(insert_implicit_mul(tokens))
}

/// Insert `*` where two value-like tokens are adjacent: `2x`, `2(x+1)`,
/// `x sin(x)`, `(x+1)(x-1)`. A function name followed by `(` stays a call.
fn insert_implicit_mul(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        let starts_value = matches!(
            token,
            Token::Number(_) | Token::Ident(_) | Token::LParen
        );
        if starts_value {
            let adjacent = match out.last() {
                Some(Token::Number(_)) | Some(Token::RParen) => true,
                Some(Token::Ident(name)) => {
                    // sin( is a call, x( and pi( are multiplications
                    !(Func::from_name(name).is_some() && token == Token::LParen)
                }
                _ => false,
            };
            if adjacent {
                out.push(Token::Star);
            }
        }
        out.push(token);
    }

    out
}

// Binding powers: Add/Sub < Mul/Div < unary minus < Pow, so that
// -x^2 parses as -(x^2) and 2^3^2 associates to the right.
const PREC_ADD: u8 = 10;
const PREC_MUL: u8 = 20;
const PREC_UNARY: u8 = 25;
const PREC_POW: u8 = 30;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expect_rparen(&mut self) -> Result<()> {
        match self.current() {
            Some(Token::RParen) => {
                self.advance();
                Ok(())
            }
            other => Err(report!(CourbeError)
                .attach_printable(format!("expected ')', got {other:?}"))),
        }
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Ast> {
        let mut left = self.parse_prefix()?;

        while let Some(token) = self.current() {
            let precedence = match token {
                Token::Plus | Token::Minus => PREC_ADD,
                Token::Star | Token::Slash => PREC_MUL,
                Token::Caret => PREC_POW,
                _ => break,
            };

            if precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Ast> {
        let token = self
            .current()
            .cloned()
            .ok_or_else(|| report!(CourbeError).attach_printable("unexpected end of expression"))?;

        match token {
            Token::Number(v) => {
                self.advance();
                Ok(Ast::Number(v))
            }

            Token::Ident(name) => {
                self.advance();

                if let Some(func) = Func::from_name(&name) {
                    // Function application requires parentheses
                    match self.current() {
                        Some(Token::LParen) => {
                            self.advance();
                            let arg = self.parse_expr(0)?;
                            self.expect_rparen()?;
                            Ok(Ast::Call(func, Box::new(arg)))
                        }
                        other => Err(report!(CourbeError).attach_printable(format!(
                            "expected '(' after '{name}', got {other:?}"
                        ))),
                    }
                } else {
                    match name.as_str() {
                        "x" => Ok(Ast::Var),
                        "pi" => Ok(Ast::Number(std::f64::consts::PI)),
                        "e" => Ok(Ast::Number(std::f64::consts::E)),
                        _ => Err(report!(CourbeError)
                            .attach_printable(format!("unknown name '{name}'"))),
                    }
                }
            }

            Token::Minus => {
                self.advance();
                let operand = self.parse_expr(PREC_UNARY)?;
                Ok(Ast::Neg(Box::new(operand)))
            }

            Token::Plus => {
                self.advance();
                self.parse_expr(PREC_UNARY)
            }

            Token::LParen => {
                self.advance();
                let inner = self.parse_expr(0)?;
                self.expect_rparen()?;
                Ok(inner)
            }

            other => Err(report!(CourbeError)
                .attach_printable(format!("unexpected token {other:?}"))),
        }
    }

    fn parse_infix(&mut self, left: Ast, precedence: u8) -> Result<Ast> {
        let token = self
            .current()
            .cloned()
            .ok_or_else(|| report!(CourbeError).attach_printable("unexpected end of expression"))?;
        self.advance();

        // Right associative for power, left for everything else
        let next_precedence = if token == Token::Caret {
            precedence
        } else {
            precedence + 1
        };

        let right = self.parse_expr(next_precedence)?;

        Ok(match token {
            Token::Plus => Ast::Add(Box::new(left), Box::new(right)),
            Token::Minus => Ast::Sub(Box::new(left), Box::new(right)),
            Token::Star => Ast::Mul(Box::new(left), Box::new(right)),
            Token::Slash => Ast::Div(Box::new(left), Box::new(right)),
            Token::Caret => Ast::Pow(Box::new(left), Box::new(right)),
            other => {
                return Err(report!(CourbeError)
                    .attach_printable(format!("unexpected token {other:?}")));
            }
        })
    }
}

pub(crate) fn parse(source: &str) -> Result<Ast> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(report!(CourbeError).attach_printable("empty expression"));
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
    };
    let ast = parser.parse_expr(0)?;

    if let Some(trailing) = parser.current() {
        return Err(report!(CourbeError)
            .attach_printable(format!("trailing input starting at {trailing:?}")));
    }

    Ok(ast)
}

/// Compile an equation in `x` into a callable.
pub fn compile(source: &str) -> Result<impl Fn(f64) -> f64 + Send + Sync + 'static> {
    let ast = parse(source)?;
    Ok(move |x: f64| ast.eval(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eval(source: &str, x: f64) -> f64 {
        compile(source).unwrap()(x)
    }

    #[test]
    fn parses_number() {
        assert_relative_eq!(eval("3.25", 0.0), 3.25);
    }

    #[test]
    fn parses_variable() {
        assert_relative_eq!(eval("x", 4.0), 4.0);
    }

    #[test]
    fn precedence_mul_over_add() {
        assert_relative_eq!(eval("1 + 2 * 3", 0.0), 7.0);
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_relative_eq!(eval("(1 + 2) * 3", 0.0), 9.0);
    }

    #[test]
    fn power_is_right_associative() {
        assert_relative_eq!(eval("2^3^2", 0.0), 512.0);
    }

    #[test]
    fn unary_minus_binds_below_power() {
        // -x^2 is -(x^2), not (-x)^2
        assert_relative_eq!(eval("-x^2", 3.0), -9.0);
    }

    #[test]
    fn implicit_multiplication() {
        assert_relative_eq!(eval("2x", 5.0), 10.0);
        assert_relative_eq!(eval("2(x+1)", 2.0), 6.0);
        assert_relative_eq!(eval("(x+1)(x-1)", 3.0), 8.0);
        assert_relative_eq!(eval("x sin(x)", 2.0), 2.0 * 2.0_f64.sin());
    }

    #[test]
    fn function_names_and_aliases() {
        assert_relative_eq!(eval("sin(pi)", 0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(eval("ch(1)", 0.0), 1.0_f64.cosh());
        assert_relative_eq!(eval("argsh(2)", 0.0), 2.0_f64.asinh());
        assert_relative_eq!(eval("abs(-3)", 0.0), 3.0);
    }

    #[test]
    fn log_is_base_ten_ln_is_natural() {
        assert_relative_eq!(eval("log(100)", 0.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(eval("ln(e)", 0.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn superscript_two_squares() {
        assert_relative_eq!(eval("x²", 4.0), 16.0);
    }

    #[test]
    fn domain_errors_yield_nan() {
        assert!(eval("sqrt(x)", -1.0).is_nan());
        assert!(eval("ln(x)", -2.0).is_nan());
        assert!(eval("arcsin(x)", 2.0).is_nan());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(compile("").is_err());
        assert!(compile("1 +").is_err());
        assert!(compile("()").is_err());
        assert!(compile("sin x").is_err());
        assert!(compile("y + 1").is_err());
        assert!(compile("(x + 1").is_err());
        assert!(compile("1 2 #").is_err());
    }
}
