//! Calculator tool: evaluates arithmetic expressions.
//!
//! Supports `+`, `-`, `*`, `/`, parentheses, unary negation, postfix `%`
//! (divide by 100) and `of` as multiplication, so `15% of 250` evaluates
//! to `37.5`. Uses a recursive-descent parser.

use std::time::Duration;

use async_trait::async_trait;
use concierge_core::error::ToolError;
use concierge_core::tool::{DEFAULT_TOOL_TIMEOUT, ToolAdapter, ToolOutput};

use crate::http::required_str;

pub struct CalculatorTool {
    timeout: Duration,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolAdapter for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluate an arithmetic expression. Supports +, -, *, /, parentheses, percentages and 'X% of Y'."
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn call(&self, parameters: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let expr = required_str(&parameters, "expression")?;
        let value = evaluate(expr).map_err(ToolError::InvalidInput)?;
        let formatted = format_number(value);

        Ok(ToolOutput::with_data(
            formatted,
            serde_json::json!({"expression": expr, "result": value}),
        ))
    }
}

/// Render a result without float noise: integers lose the `.0`,
/// everything else is rounded to ten decimal places.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let rounded = (value * 1e10).round() / 1e10;
        format!("{rounded}")
    }
}

// ── Expression extraction ─────────────────────────────────────────────────

const WORD_OPERATORS: &[(&str, &str)] = &[
    (" multiplied by ", " * "),
    (" divided by ", " / "),
    (" percent of ", "% of "),
    (" percent ", "% "),
    (" plus ", " + "),
    (" minus ", " - "),
    (" times ", " * "),
    ("×", "*"),
    ("÷", "/"),
];

/// Pull the arithmetic part out of a natural-language request.
///
/// `"Calculate 15% of 250"` gives `"15% of 250"`. Returns `None` when the
/// text holds no expression with at least one operator.
pub fn extract_expression(text: &str) -> Option<String> {
    let mut normalized = format!(" {} ", text.to_lowercase());
    for (word, symbol) in WORD_OPERATORS {
        normalized = normalized.replace(word, symbol);
    }

    let mut runs: Vec<Vec<&str>> = vec![Vec::new()];
    for word in normalized.split_whitespace() {
        let word = word.trim_end_matches(['?', '!', ',', ';', ':']);
        let word = word.strip_suffix('.').unwrap_or(word);
        if word.is_empty() {
            continue;
        }
        if is_math_word(word) {
            if let Some(run) = runs.last_mut() {
                run.push(word);
            }
        } else if runs.last().is_some_and(|r| !r.is_empty()) {
            runs.push(Vec::new());
        }
    }

    runs.into_iter().find_map(|mut run| {
        while run.first().is_some_and(|w| is_connective(w)) {
            run.remove(0);
        }
        while run.last().is_some_and(|w| is_connective(w)) {
            run.pop();
        }

        let has_digit = run.iter().any(|w| w.chars().any(|c| c.is_ascii_digit()));
        let has_operator = run.iter().enumerate().any(|(i, w)| {
            is_connective(w)
                || w.char_indices()
                    .any(|(j, c)| matches!(c, '+' | '*' | '/' | '%') || (c == '-' && (i, j) != (0, 0)))
        });

        (has_digit && has_operator).then(|| {
            run.iter()
                .map(|w| if *w == "x" { "*" } else { *w })
                .collect::<Vec<_>>()
                .join(" ")
        })
    })
}

fn is_connective(word: &str) -> bool {
    matches!(word, "of" | "x")
}

fn is_math_word(word: &str) -> bool {
    is_connective(word)
        || word
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '*' | '/' | '(' | ')' | '%'))
}

// ── Recursive-descent expression evaluator ────────────────────────────────

/// Evaluate a mathematical expression string.
pub fn evaluate(expr: &str) -> Result<f64, String> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser::new(&tokens);
    let result = parser.parse_expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(format!(
            "Unexpected token at position {}: {:?}",
            parser.pos, parser.tokens[parser.pos]
        ));
    }
    if !result.is_finite() {
        return Err("Result is not a finite number".into());
    }
    Ok(result)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Of,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '+' => { tokens.push(Token::Plus); i += 1; }
            '-' => { tokens.push(Token::Minus); i += 1; }
            '*' | '×' => { tokens.push(Token::Star); i += 1; }
            '/' | '÷' => { tokens.push(Token::Slash); i += 1; }
            '%' => { tokens.push(Token::Percent); i += 1; }
            '(' => { tokens.push(Token::LParen); i += 1; }
            ')' => { tokens.push(Token::RParen); i += 1; }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let num_str: String = chars[start..i].iter().collect();
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| format!("Invalid number: {num_str}"))?;
                tokens.push(Token::Number(num));
            }
            c if c.is_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_alphabetic() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect::<String>().to_lowercase();
                match word.as_str() {
                    "of" => tokens.push(Token::Of),
                    "x" => tokens.push(Token::Star),
                    _ => return Err(format!("Unexpected word: '{word}'")),
                }
            }
            c => return Err(format!("Unexpected character: '{c}'")),
        }
    }

    Ok(tokens)
}

/// Deepest nesting of parentheses and unary minus the parser accepts.
const MAX_NESTING: usize = 64;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, String>) -> Result<T, String> {
        if self.depth >= MAX_NESTING {
            return Err("Expression is nested too deeply".into());
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    // expr = term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<f64, String> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.consume();
                    left += self.parse_term()?;
                }
                Token::Minus => {
                    self.consume();
                    left -= self.parse_term()?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // term = unary (('*' | '/' | 'of') unary)*
    fn parse_term(&mut self) -> Result<f64, String> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star | Token::Of => {
                    self.consume();
                    left *= self.parse_unary()?;
                }
                Token::Slash => {
                    self.consume();
                    let right = self.parse_unary()?;
                    if right == 0.0 {
                        return Err("Division by zero".into());
                    }
                    left /= right;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // unary = '-' unary | postfix
    fn parse_unary(&mut self) -> Result<f64, String> {
        if let Some(Token::Minus) = self.peek() {
            self.consume();
            let val = self.nested(Self::parse_unary)?;
            return Ok(-val);
        }
        self.parse_postfix()
    }

    // postfix = primary '%'*
    fn parse_postfix(&mut self) -> Result<f64, String> {
        let mut val = self.parse_primary()?;
        while let Some(Token::Percent) = self.peek() {
            self.consume();
            val /= 100.0;
        }
        Ok(val)
    }

    // primary = NUMBER | '(' expr ')'
    fn parse_primary(&mut self) -> Result<f64, String> {
        match self.consume() {
            Some(Token::Number(n)) => Ok(*n),
            Some(Token::LParen) => {
                let val = self.nested(Self::parse_expr)?;
                match self.consume() {
                    Some(Token::RParen) => Ok(val),
                    _ => Err("Expected closing parenthesis".into()),
                }
            }
            Some(tok) => Err(format!("Unexpected token: {tok:?}")),
            None => Err("Unexpected end of expression".into()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_nesting_is_rejected_not_overflowed() {
        let parens = format!("{}1+1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(evaluate(&parens).unwrap_err(), "Expression is nested too deeply");

        let minuses = format!("{}5", "-".repeat(100_000));
        assert_eq!(evaluate(&minuses).unwrap_err(), "Expression is nested too deeply");

        let shallow = format!("{}2{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(evaluate(&shallow).unwrap(), 2.0);
        assert_eq!(evaluate("(1) + (2) * (3)").unwrap(), 7.0);
    }

    #[test]
    fn operator_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
    }

    #[test]
    fn division_and_zero() {
        assert_eq!(evaluate("10 / 4").unwrap(), 2.5);
        assert!(evaluate("1 / 0").is_err());
    }

    #[test]
    fn unary_negation() {
        assert_eq!(evaluate("-5 + 3").unwrap(), -2.0);
    }

    #[test]
    fn percent_of() {
        assert_eq!(evaluate("15% of 250").unwrap(), 37.5);
        assert_eq!(evaluate("250 * 15%").unwrap(), 37.5);
        assert_eq!(evaluate("50%").unwrap(), 0.5);
    }

    #[test]
    fn times_as_x() {
        assert_eq!(evaluate("6 x 7").unwrap(), 42.0);
    }

    #[test]
    fn invalid_expressions() {
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("").is_err());
        assert!(evaluate("two plus two").is_err());
        assert!(evaluate("(1 + 2").is_err());
    }

    #[test]
    fn format_strips_float_noise() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(37.5), "37.5");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
    }

    #[test]
    fn extract_from_sentences() {
        assert_eq!(extract_expression("Calculate 15% of 250").as_deref(), Some("15% of 250"));
        assert_eq!(extract_expression("What is 2+2?").as_deref(), Some("2+2"));
        assert_eq!(extract_expression("what's 12 times 3").as_deref(), Some("12 * 3"));
        assert_eq!(
            extract_expression("compute (10 + 5) / 3, please").as_deref(),
            Some("(10 + 5) / 3")
        );
        assert_eq!(extract_expression("20 percent of 80").as_deref(), Some("20% of 80"));
        assert_eq!(extract_expression("6 x 7").as_deref(), Some("6 * 7"));
    }

    #[test]
    fn extract_ignores_plain_numbers() {
        assert_eq!(extract_expression("What happened in 1969?"), None);
        assert_eq!(extract_expression("hello there"), None);
        assert_eq!(extract_expression("-5"), None);
    }

    #[tokio::test]
    async fn tool_invoke_percent() {
        let out = CalculatorTool::new()
            .invoke(serde_json::json!({"expression": "15% of 250"}))
            .await
            .unwrap();
        assert_eq!(out.output, "37.5");
        assert_eq!(out.data.unwrap()["result"], 37.5);
    }

    #[tokio::test]
    async fn tool_rejects_bad_expression() {
        let err = CalculatorTool::new()
            .invoke(serde_json::json!({"expression": "2 +"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn tool_missing_expression() {
        let err = CalculatorTool::new()
            .invoke(serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }
}
