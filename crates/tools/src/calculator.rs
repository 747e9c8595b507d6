//! Calculator tool — evaluates arithmetic expressions.
//!
//! Supports `+`, `-`, `*`, `/`, parentheses, unary negation, and decimal
//! numbers via a small precedence-climbing parser. No dependencies beyond
//! std.

use async_trait::async_trait;

use cogent_core::error::CapabilityError;
use cogent_core::file::File;
use cogent_core::tool::{Tool, ToolOutput};

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluate an arithmetic expression such as \"2+3\", \"3 - 4 * 6\" or \"(3 + 4) * (6 + 4)\"."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "The arithmetic expression to evaluate, e.g. '4+5*8'"
                }
            },
            "required": ["expression"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _input_files: &[File],
    ) -> Result<ToolOutput, CapabilityError> {
        let expression = arguments["expression"]
            .as_str()
            .ok_or_else(|| CapabilityError::InvalidArguments("missing 'expression'".into()))?;

        let value = evaluate(expression).map_err(|reason| CapabilityError::ExecutionFailed {
            name: "calculator".into(),
            reason,
        })?;
        Ok(ToolOutput::from_result(
            serde_json::json!({ "result": value }),
        ))
    }
}

/// Evaluate an arithmetic expression string.
pub fn evaluate(expression: &str) -> Result<f64, String> {
    let mut lexer = Lexer {
        input: expression.as_bytes(),
        pos: 0,
    };
    let value = parse_binary(&mut lexer, 0)?;
    lexer.skip_whitespace();
    if lexer.pos < lexer.input.len() {
        return Err(format!(
            "trailing input at byte {}: {:?}",
            lexer.pos,
            expression[lexer.pos..].chars().next().unwrap_or(' ')
        ));
    }
    Ok(value)
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek_op(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.input.get(self.pos).copied()
    }

    fn number(&mut self) -> Result<f64, String> {
        self.skip_whitespace();
        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_digit() || *b == b'.')
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(match self.input.get(self.pos) {
                Some(b) => format!("unexpected character {:?}", *b as char),
                None => "unexpected end of expression".into(),
            });
        }
        let text = std::str::from_utf8(&self.input[start..self.pos]).expect("digits are ascii");
        text.parse::<f64>()
            .map_err(|_| format!("invalid number {text:?}"))
    }
}

fn precedence(op: u8) -> Option<u8> {
    match op {
        b'+' | b'-' => Some(1),
        b'*' | b'/' => Some(2),
        _ => None,
    }
}

// Precedence climbing over the two binary levels.
fn parse_binary(lexer: &mut Lexer<'_>, min_prec: u8) -> Result<f64, String> {
    let mut lhs = parse_prefix(lexer)?;
    while let Some(op) = lexer.peek_op() {
        let Some(prec) = precedence(op) else { break };
        if prec < min_prec {
            break;
        }
        lexer.pos += 1;
        let rhs = parse_binary(lexer, prec + 1)?;
        lhs = match op {
            b'+' => lhs + rhs,
            b'-' => lhs - rhs,
            b'*' => lhs * rhs,
            b'/' => {
                if rhs == 0.0 {
                    return Err("division by zero".into());
                }
                lhs / rhs
            }
            _ => unreachable!(),
        };
    }
    Ok(lhs)
}

fn parse_prefix(lexer: &mut Lexer<'_>) -> Result<f64, String> {
    match lexer.peek_op() {
        Some(b'-') => {
            lexer.pos += 1;
            Ok(-parse_prefix(lexer)?)
        }
        Some(b'(') => {
            lexer.pos += 1;
            let value = parse_binary(lexer, 0)?;
            if lexer.peek_op() != Some(b')') {
                return Err("expected closing parenthesis".into());
            }
            lexer.pos += 1;
            Ok(value)
        }
        _ => lexer.number(),
    }
}
