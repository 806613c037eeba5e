//! # Answer evaluator
//!
//! Two evaluators share one tolerance rule, `|u - e| <= max(0.05, 0.015 * |e|)`:
//! - `evaluate` (guided mode) only says correct / too high / too low. The session calls it only
//!   after the setup validated; otherwise it answers with `setup_not_ready`.
//! - `evaluate_quiz` (quiz mode) also checks the selected unit and, on a wrong value, looks
//!   for the fingerprints of two common mistakes: a missing or inverted mole ratio
//!   (`expected / ratio`) and molar masses taken from the wrong substances
//!   (`expected * mm(R) / mm(P)`). The fingerprints are a heuristic; every one that matches is
//!   reported.
//!
//! `SessionStats` keeps the quiz streak and mastery counters.
use crate::Stoichiometry::problem_generator::{Problem, ProblemType, QuantityUnit};
use crate::Stoichiometry::worked_steps::round_sig;
use log::debug;
use serde::{Deserialize, Serialize};

pub const ABSOLUTE_TOLERANCE: f64 = 0.05;
pub const RELATIVE_TOLERANCE: f64 = 0.015;
// absorbs binary rounding right at the tolerance boundary
const BOUNDARY_SLACK: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub absolute: f64,
    pub relative: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            absolute: ABSOLUTE_TOLERANCE,
            relative: RELATIVE_TOLERANCE,
        }
    }
}

impl Tolerance {
    /// allowed absolute deviation from `expected`
    pub fn allowed(&self, expected: f64) -> f64 {
        self.absolute.max(self.relative * expected.abs())
    }

    pub fn accepts(&self, value: f64, expected: f64) -> bool {
        within(value, expected, self.allowed(expected))
    }
}

/// |value - target| <= allowed, up to the boundary slack
fn within(value: f64, target: f64, allowed: f64) -> bool {
    (value - target).abs() <= allowed + BOUNDARY_SLACK * allowed.max(1.0)
}

/// Strips thousands separators and surrounding whitespace, then parses a decimal number.
/// Empty and non-finite input is rejected.
pub fn parse_numeric_input(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    TooHigh,
    TooLow,
}

/// common-mistake nudges attached to a rejected quiz answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    ConvertBeforeRatio,
    RatioMissingOrFlipped,
    MolarMassSwapped,
}

impl Diagnostic {
    pub fn message(&self) -> &'static str {
        match self {
            Diagnostic::ConvertBeforeRatio => {
                "Check: did you convert to moles before using the mole ratio?"
            }
            Diagnostic::RatioMissingOrFlipped => {
                "It looks like the mole ratio step may be missing or flipped."
            }
            Diagnostic::MolarMassSwapped => {
                "It looks like a molar mass may be from the wrong substance."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect(Direction),
    NotANumber,
    /// guided mode: the setup has not been validated yet
    SetupNotReady,
    UnitMismatch {
        selected: QuantityUnit,
        required: QuantityUnit,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub verdict: Verdict,
    pub expected: f64,
    pub unit: QuantityUnit,
    pub diagnostics: Vec<Diagnostic>,
    pub message: String,
}

impl EvaluationResult {
    pub fn is_correct(&self) -> bool {
        self.verdict == Verdict::Correct
    }
}

fn direction(value: f64, expected: f64) -> Direction {
    if value > expected {
        Direction::TooHigh
    } else {
        Direction::TooLow
    }
}

fn direction_word(direction: Direction) -> &'static str {
    match direction {
        Direction::TooHigh => "high",
        Direction::TooLow => "low",
    }
}

/// Outcome for a final answer submitted before the setup is correct.
pub fn setup_not_ready(expected: f64, unit: QuantityUnit) -> EvaluationResult {
    EvaluationResult {
        verdict: Verdict::SetupNotReady,
        expected,
        unit,
        diagnostics: Vec::new(),
        message: "First, make sure your setup is correct (units cancel). Then calculate your final number here."
            .to_string(),
    }
}

/// Guided-mode check of a typed final answer.
pub fn evaluate(
    raw: &str,
    expected: f64,
    unit: QuantityUnit,
    tolerance: &Tolerance,
) -> EvaluationResult {
    let Some(value) = parse_numeric_input(raw) else {
        return EvaluationResult {
            verdict: Verdict::NotANumber,
            expected,
            unit,
            diagnostics: Vec::new(),
            message: "Type a number (example: 31.5).".to_string(),
        };
    };
    debug!("guided answer {} vs expected {}", value, expected);
    if tolerance.accepts(value, expected) {
        EvaluationResult {
            verdict: Verdict::Correct,
            expected,
            unit,
            diagnostics: Vec::new(),
            message: format!("Correct! (Expected about {:.3} {}.)", expected, unit),
        }
    } else {
        let dir = direction(value, expected);
        EvaluationResult {
            verdict: Verdict::Incorrect(dir),
            expected,
            unit,
            diagnostics: Vec::new(),
            message: format!(
                "Not yet: your answer is a bit too {}. Expected about {:.3} {}.\nTip: re-check (1) molar mass placement, (2) mole ratio direction, and (3) that you multiplied all top values and divided by all bottom values.",
                direction_word(dir),
                expected,
                unit
            ),
        }
    }
}

/// Quiz-mode check of a typed answer and the selected unit.
pub fn evaluate_quiz(
    raw: &str,
    selected_unit: QuantityUnit,
    problem: &Problem,
    tolerance: &Tolerance,
) -> EvaluationResult {
    let expected = problem.expected_answer;
    let required = problem.expected_unit;
    if selected_unit != required {
        return EvaluationResult {
            verdict: Verdict::UnitMismatch {
                selected: selected_unit,
                required,
            },
            expected,
            unit: required,
            diagnostics: Vec::new(),
            message: format!(
                "Your unit is {}, but the question asked for {}. Fix the unit first, then re-check.",
                selected_unit, required
            ),
        };
    }
    let Some(value) = parse_numeric_input(raw) else {
        return EvaluationResult {
            verdict: Verdict::NotANumber,
            expected,
            unit: required,
            diagnostics: Vec::new(),
            message: "Type a number (example: 12.5).".to_string(),
        };
    };
    if tolerance.accepts(value, expected) {
        return EvaluationResult {
            verdict: Verdict::Correct,
            expected,
            unit: required,
            diagnostics: Vec::new(),
            message: format!(
                "Correct! Nice. (Expected about {} {}.)",
                round_sig(expected, 4),
                required
            ),
        };
    }

    let mut diagnostics = Vec::new();
    if problem.problem_type == ProblemType::GramsToGrams {
        diagnostics.push(Diagnostic::ConvertBeforeRatio);
    }
    let allowed = tolerance.allowed(expected);
    if within(value, expected / problem.mole_ratio(), allowed) {
        diagnostics.push(Diagnostic::RatioMissingOrFlipped);
    }
    let swapped = expected * (problem.molar_mass_reactant / problem.molar_mass_product);
    if within(value, swapped, allowed) {
        diagnostics.push(Diagnostic::MolarMassSwapped);
    }
    let mut message = format!(
        "Not quite. Expected about {} {}.",
        round_sig(expected, 4),
        required
    );
    for d in &diagnostics {
        message.push('\n');
        message.push_str(d.message());
    }
    EvaluationResult {
        verdict: Verdict::Incorrect(direction(value, expected)),
        expected,
        unit: required,
        diagnostics,
        message,
    }
}

/// Quiz counters for the running session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub streak: u32,
    pub correct_count: u32,
    pub total_count: u32,
}

impl SessionStats {
    pub fn record(&mut self, result: &EvaluationResult) {
        self.total_count += 1;
        if result.is_correct() {
            self.correct_count += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }
    }

    /// correct / total as a whole percent; 0 before the first answer
    pub fn mastery_percent(&self) -> u32 {
        if self.total_count == 0 {
            return 0;
        }
        (self.correct_count as f64 / self.total_count as f64 * 100.0).round() as u32
    }
}
