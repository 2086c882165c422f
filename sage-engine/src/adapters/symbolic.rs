//! Symbolic-expression adapter — arithmetic consistency without disclosure.
//!
//! Recomputes `A op B` against a detected `=C` and flags mismatches. The
//! recomputed value is never formatted into any message.

use sage_core::types::{
    AdapterAnalysis, Observable, ObservableKind, ObservationState, StepValidation,
    TransformationEvent, TransformationKind,
};

use super::DomainAdapter;

/// Operator glyphs that OCR may confuse with letters or noise.
const AMBIGUOUS_GLYPHS: &[char] = &['x', 'X', '*', '·'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn glyph(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '−',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }
}

/// A parsed `A op B [= C]` equation over integers.
#[derive(Debug, Clone, Copy)]
pub struct ParsedEquation {
    pub lhs: i64,
    pub op: Operator,
    pub rhs: i64,
    pub stated: Option<i64>,
}

impl ParsedEquation {
    /// The recomputed value, when it exists over the integers.
    fn expected(&self) -> Option<i64> {
        match self.op {
            Operator::Add => self.lhs.checked_add(self.rhs),
            Operator::Subtract => self.lhs.checked_sub(self.rhs),
            Operator::Multiply => self.lhs.checked_mul(self.rhs),
            Operator::Divide => {
                if self.rhs != 0 && self.lhs % self.rhs == 0 {
                    Some(self.lhs / self.rhs)
                } else {
                    None
                }
            }
        }
    }

    /// Stated result disagrees with the recomputation.
    pub fn is_mismatch(&self) -> bool {
        match (self.stated, self.expected()) {
            (Some(stated), Some(expected)) => stated != expected,
            _ => false,
        }
    }

    /// The operand expression without any result: "5 × 11".
    fn operand_text(&self) -> String {
        format!("{} {} {}", self.lhs, self.op.glyph(), self.rhs)
    }
}

/// Parse content like "5×11=55", "12 + 3", "20÷4=5".
pub fn parse_equation(content: &str) -> Option<ParsedEquation> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let (expr, stated) = match compact.split_once('=') {
        Some((expr, result)) => {
            let stated = result.parse::<i64>().ok();
            // "=garbage" still leaves the expression checkable
            (expr.to_string(), stated)
        }
        None => (compact, None),
    };

    let mut op = None;
    let mut op_index = 0;
    for (i, c) in expr.char_indices() {
        // Leading sign is part of the first operand, not an operator
        if i == 0 {
            continue;
        }
        let found = match c {
            '+' => Some(Operator::Add),
            '-' | '−' => Some(Operator::Subtract),
            '×' | 'x' | 'X' | '*' | '·' => Some(Operator::Multiply),
            '÷' | '/' => Some(Operator::Divide),
            _ => None,
        };
        if let Some(found) = found {
            op = Some(found);
            op_index = i;
            break;
        }
    }
    let op = op?;
    let (left, right) = expr.split_at(op_index);
    let right = &right[right.chars().next()?.len_utf8()..];
    let lhs = left.parse::<i64>().ok()?;
    let rhs = right.parse::<i64>().ok()?;
    Some(ParsedEquation { lhs, op, rhs, stated })
}

/// Arithmetic mismatch check for the doubt engine. Only operands strictly
/// below `operand_limit` are checked.
pub fn result_suspicious(content: &str, operand_limit: i64) -> bool {
    match parse_equation(content) {
        Some(eq) => {
            eq.lhs.abs() < operand_limit && eq.rhs.abs() < operand_limit && eq.is_mismatch()
        }
        None => false,
    }
}

/// Whether the expression uses a glyph OCR commonly confuses (`x` for `×`).
pub fn has_ambiguous_operator(content: &str) -> bool {
    let chars: Vec<char> = content.chars().filter(|c| !c.is_whitespace()).collect();
    chars.windows(3).any(|w| {
        w[0].is_ascii_digit() && AMBIGUOUS_GLYPHS.contains(&w[1]) && w[2].is_ascii_digit()
    })
}

/// Reference adapter for handwritten arithmetic.
#[derive(Debug, Default)]
pub struct SymbolicExpressionAdapter;

impl DomainAdapter for SymbolicExpressionAdapter {
    fn domain(&self) -> &'static str {
        "symbolic-expression"
    }

    fn can_handle(&self, observable: &Observable) -> bool {
        observable.kind == ObservableKind::SymbolicExpression
    }

    fn analyze(
        &self,
        observable: &Observable,
        _state: &ObservationState,
        recent_event: Option<&TransformationEvent>,
    ) -> AdapterAnalysis {
        let Some(eq) = parse_equation(&observable.content) else {
            return AdapterAnalysis::silent();
        };

        match eq.stated {
            None => {
                let mut analysis = AdapterAnalysis::hint(format!(
                    "What do you get when you work out {}?",
                    eq.operand_text()
                ));
                analysis.next_step = Some("Finish the line with your result.".to_string());
                analysis
            }
            Some(_) if eq.is_mismatch() => {
                let mut analysis = AdapterAnalysis::hint(format!(
                    "Take another look at {} — does your written result follow from it?",
                    eq.operand_text()
                ));
                if eq.op == Operator::Multiply {
                    analysis.suggested_tool_id = Some("times-table".to_string());
                }
                analysis
            }
            Some(_) => {
                // Consistent line. Only speak up when it was just corrected.
                if recent_event.is_some_and(|e| e.kind == TransformationKind::Replace) {
                    AdapterAnalysis::encouragement(
                        "Nice revision — that line holds together now.",
                    )
                } else {
                    AdapterAnalysis::silent()
                }
            }
        }
    }

    fn validate_transition(
        &self,
        _prev: &Observable,
        curr: &Observable,
        _event: &TransformationEvent,
    ) -> StepValidation {
        match parse_equation(&curr.content) {
            Some(eq) if eq.is_mismatch() => StepValidation::invalid(format!(
                "Something in this step doesn't hold — re-check {} before moving on.",
                eq.operand_text()
            ))
            .with_correction_pointer(format!(
                "Work through {} one digit at a time.",
                eq.operand_text()
            )),
            _ => StepValidation::valid(),
        }
    }

    fn generate_guided_question(&self, observable: &Observable) -> String {
        match parse_equation(&observable.content) {
            Some(eq) if eq.stated.is_none() => {
                format!("What do you expect {} to come to?", eq.operand_text())
            }
            _ => "How did you arrive at your result?".to_string(),
        }
    }
}
