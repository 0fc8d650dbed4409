//! Sandboxed arithmetic evaluator for property formulas.
//!
//! Property prompts accept small expressions such as `width / 2 - 40` in
//! addition to plain numbers. Only arithmetic and a fixed set of named
//! constants are understood; anything else fails evaluation and the caller
//! falls back to 0.

use kurbo::Size;

/// Named constants available to formulas.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext {
    screen: Size,
}

impl EvalContext {
    pub fn new(screen: Size) -> Self {
        Self { screen }
    }

    fn constant(&self, name: &str) -> Option<f64> {
        match name {
            "width" => Some(self.screen.width),
            "height" => Some(self.screen.height),
            _ => None,
        }
    }
}

/// Evaluate `text` and clamp the result into `min..=max`.
///
/// Evaluation failure, an empty string, and non-finite results all coerce to
/// 0 before clamping; the editor boundary never propagates an error.
pub fn eval_clamped(text: &str, min: f64, max: f64, ctx: &EvalContext) -> f64 {
    eval(text, ctx).unwrap_or(0.0).clamp(min, max)
}

/// Evaluate `text` as an arithmetic expression.
pub fn eval(text: &str, ctx: &EvalContext) -> Option<f64> {
    let mut parser = Parser {
        input: text.as_bytes(),
        pos: 0,
        ctx,
    };
    let value = parser.expr()?;
    parser.skip_ws();
    if parser.pos == parser.input.len() && value.is_finite() {
        Some(value)
    } else {
        None
    }
}

/// Recursive descent over `expr := term (('+'|'-') term)*`,
/// `term := unary (('*'|'/'|'%') unary)*`, `unary := '-'* primary`,
/// `primary := number | constant | '(' expr ')'`.
struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    ctx: &'a EvalContext,
}

impl Parser<'_> {
    fn skip_ws(&mut self) {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.input.get(self.pos).copied()
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                b'+' => {
                    self.pos += 1;
                    value += self.term()?;
                }
                b'-' => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.unary()?;
        while let Some(op) = self.peek() {
            match op {
                b'*' => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                b'/' => {
                    self.pos += 1;
                    value /= self.unary()?;
                }
                b'%' => {
                    self.pos += 1;
                    value %= self.unary()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn unary(&mut self) -> Option<f64> {
        if self.peek() == Some(b'-') {
            self.pos += 1;
            return Some(-self.unary()?);
        }
        self.primary()
    }

    fn primary(&mut self) -> Option<f64> {
        match self.peek()? {
            b'(' => {
                self.pos += 1;
                let value = self.expr()?;
                if self.peek() != Some(b')') {
                    return None;
                }
                self.pos += 1;
                Some(value)
            }
            c if c.is_ascii_digit() || c == b'.' => self.number(),
            c if c.is_ascii_alphabetic() || c == b'_' => self.identifier(),
            _ => None,
        }
    }

    fn number(&mut self) -> Option<f64> {
        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_digit() || *c == b'.')
        {
            self.pos += 1;
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }

    fn identifier(&mut self) -> Option<f64> {
        let start = self.pos;
        while self
            .input
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_alphanumeric() || *c == b'_')
        {
            self.pos += 1;
        }
        let name = std::str::from_utf8(&self.input[start..self.pos]).ok()?;
        self.ctx.constant(name)
    }
}
