//! Error types shared by the stoichiometry engine, the mole map and the session layer.
//!
//! Student mistakes (a wrong factor, an unparsable answer, a wrong unit) are NOT errors:
//! they are outcome values returned by the validator and the evaluators. Everything here
//! is a condition the caller has to handle or report.
use crate::Stoichiometry::factor_bank::FactorId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("Malformed equation '{equation}': {reason}")]
    MalformedEquation { equation: String, reason: String },
    #[error("Invalid molar mass for '{species}' in reaction '{reaction}'")]
    InvalidMolarMass { species: String, reaction: String },
    #[error("Dataset contains no reactions")]
    EmptyDataset,
    #[error("Dataset loading error: {0}")]
    DatasetLoad(String),
    #[error("Invalid designator '{0}' (expected grams|moles|particles|liters followed by A or B)")]
    InvalidDesignator(String),
    #[error("Slot {0} does not exist (slots are numbered 0..=2)")]
    SlotOutOfRange(usize),
    #[error("Factor {0:?} is not in the factor bank of this problem")]
    UnknownFactor(FactorId),
    #[error("No problem has been generated yet")]
    NoActiveProblem,
    #[error("Command is not available in {0} mode")]
    WrongMode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoachError {
    pub(crate) fn malformed(equation: &str, reason: &str) -> Self {
        CoachError::MalformedEquation {
            equation: equation.to_string(),
            reason: reason.to_string(),
        }
    }
}
