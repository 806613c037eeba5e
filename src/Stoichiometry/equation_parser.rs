use crate::coach_error::CoachError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// literal token separating reactants from products
pub const ARROW: &str = "->";

/// one "[coefficient ]species" term of an equation side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationTerm {
    pub coefficient: u32,
    pub species: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEquation {
    pub reactants: Vec<EquationTerm>,
    pub products: Vec<EquationTerm>,
}

impl ParsedEquation {
    /// number of terms on both sides
    pub fn term_count(&self) -> usize {
        self.reactants.len() + self.products.len()
    }
}

fn term_regex() -> &'static Regex {
    static TERM_RE: OnceLock<Regex> = OnceLock::new();
    TERM_RE.get_or_init(|| Regex::new(r"^(\d+)\s+(.+)$").expect("term regex is valid"))
}

fn parse_term(term: &str, equation: &str) -> Result<EquationTerm, CoachError> {
    let term = term.trim();
    if term.is_empty() {
        return Err(CoachError::malformed(equation, "empty term"));
    }
    match term_regex().captures(term) {
        Some(cap) => {
            let coefficient: u32 = cap[1]
                .parse()
                .map_err(|_| CoachError::malformed(equation, "coefficient out of range"))?;
            if coefficient == 0 {
                return Err(CoachError::malformed(equation, "zero coefficient"));
            }
            Ok(EquationTerm {
                coefficient,
                species: cap[2].trim().to_string(),
            })
        }
        None => Ok(EquationTerm {
            coefficient: 1,
            species: term.to_string(),
        }),
    }
}

fn parse_side(side: &str, equation: &str) -> Result<Vec<EquationTerm>, CoachError> {
    if side.trim().is_empty() {
        return Err(CoachError::malformed(equation, "empty side"));
    }
    side.split('+')
        .map(|term| parse_term(term, equation))
        .collect()
}

/// Parses a balanced equation "2 H2 + O2 -> 2 H2O".
/// Atom balance is not checked: the equation is taken as given.
pub fn parse_equation(equation: &str) -> Result<ParsedEquation, CoachError> {
    let (lhs, rhs) = equation
        .split_once(ARROW)
        .ok_or_else(|| CoachError::malformed(equation, "arrow '->' not found"))?;
    if rhs.contains(ARROW) {
        return Err(CoachError::malformed(equation, "more than one arrow"));
    }
    Ok(ParsedEquation {
        reactants: parse_side(lhs, equation)?,
        products: parse_side(rhs, equation)?,
    })
}
