//! # Setup validator
//!
//! The student builds a setup by placing factor copies into three slots (in any order) and by
//! ticking a three-item "conceptual path" checklist (convert in, use the ratio, convert out).
//! `validate` is a pure function of the slots, the required sequence and the checklist. The
//! checklist is independent of the slot contents and both must be complete for `Correct`.
use crate::Stoichiometry::factor_bank::{Factor, FactorBank};
use crate::Stoichiometry::problem_generator::RequiredFactor;
use crate::coach_error::CoachError;
use serde::{Deserialize, Serialize};

pub const SLOT_COUNT: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorSlots {
    slots: [Option<Factor>; SLOT_COUNT],
}

impl FactorSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Option<Factor>, CoachError> {
        self.slots
            .get_mut(index)
            .ok_or(CoachError::SlotOutOfRange(index))
    }

    /// puts `factor` into the slot, replacing whatever was there
    pub fn place(&mut self, index: usize, factor: Factor) -> Result<(), CoachError> {
        *self.slot_mut(index)? = Some(factor);
        Ok(())
    }

    /// Flips the factor in the slot. Returns false when the slot is empty.
    pub fn flip(&mut self, index: usize) -> Result<bool, CoachError> {
        match self.slot_mut(index)? {
            Some(factor) => {
                factor.flip();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn clear(&mut self, index: usize) -> Result<(), CoachError> {
        *self.slot_mut(index)? = None;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Factor> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&Factor>> {
        self.slots.iter().map(|s| s.as_ref())
    }

    pub fn empty_positions(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// The required sequence laid out with copies taken from the bank.
    /// Positions whose factor is missing from the bank stay empty.
    pub fn from_required(required: &[RequiredFactor], bank: &FactorBank) -> Self {
        let mut slots = Self::new();
        for (i, need) in required.iter().take(SLOT_COUNT).enumerate() {
            slots.slots[i] = bank.placed_copy(need.id).map(|mut f| {
                f.flipped = need.flipped;
                f
            });
        }
        slots
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathStep {
    ConvertIn,
    UseRatio,
    ConvertOut,
}

impl PathStep {
    pub const ALL: [PathStep; 3] = [PathStep::ConvertIn, PathStep::UseRatio, PathStep::ConvertOut];

    pub fn label(&self) -> &'static str {
        match self {
            PathStep::ConvertIn => "Convert to moles (grams → moles)",
            PathStep::UseRatio => "Use mole ratio (balanced equation)",
            PathStep::ConvertOut => "Convert to grams (moles → grams)",
        }
    }
}

/// The convert → ratio → convert checklist. Starts unchecked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptualPath {
    pub convert_in: bool,
    pub use_ratio: bool,
    pub convert_out: bool,
}

impl ConceptualPath {
    pub fn all_checked() -> Self {
        Self {
            convert_in: true,
            use_ratio: true,
            convert_out: true,
        }
    }

    pub fn set(&mut self, step: PathStep, checked: bool) {
        match step {
            PathStep::ConvertIn => self.convert_in = checked,
            PathStep::UseRatio => self.use_ratio = checked,
            PathStep::ConvertOut => self.convert_out = checked,
        }
    }

    pub fn is_checked(&self, step: PathStep) -> bool {
        match step {
            PathStep::ConvertIn => self.convert_in,
            PathStep::UseRatio => self.use_ratio,
            PathStep::ConvertOut => self.convert_out,
        }
    }

    pub fn unchecked(&self) -> Vec<PathStep> {
        PathStep::ALL
            .into_iter()
            .filter(|s| !self.is_checked(*s))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.unchecked().is_empty()
    }
}

/// A problem in one filled slot. Positions are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotIssue {
    WrongFactor { position: usize },
    WrongOrientation { position: usize, needs_flipped: bool },
}

impl SlotIssue {
    pub fn message(&self) -> String {
        match self {
            SlotIssue::WrongFactor { position } => {
                format!("Box {}: wrong factor type.", position + 1)
            }
            SlotIssue::WrongOrientation {
                position,
                needs_flipped,
            } => format!(
                "Box {}: correct factor, but it needs to be {} so units cancel.",
                position + 1,
                if *needs_flipped { "flipped" } else { "not flipped" }
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResult {
    Correct,
    /// some slots are empty, or the slots are right but the checklist is not complete
    Incomplete {
        empty_slots: Vec<usize>,
        unchecked_path: Vec<PathStep>,
    },
    Mistakes {
        issues: Vec<SlotIssue>,
        unchecked_path: Vec<PathStep>,
    },
}

impl ValidationResult {
    pub fn is_correct(&self) -> bool {
        matches!(self, ValidationResult::Correct)
    }

    /// One feedback line per finding.
    pub fn messages(&self) -> Vec<String> {
        let path_message = |unchecked: &[PathStep]| {
            let missing: Vec<&str> = unchecked.iter().map(|s| s.label()).collect();
            format!(
                "Select the full path: convert → ratio → convert (still unchecked: {}).",
                missing.join("; ")
            )
        };
        match self {
            ValidationResult::Correct => vec![
                "Setup correct! Units cancel properly. Now multiply/divide and check your final answer."
                    .to_string(),
            ],
            ValidationResult::Incomplete {
                empty_slots,
                unchecked_path,
            } => {
                let mut out = Vec::new();
                if !unchecked_path.is_empty() {
                    out.push(path_message(unchecked_path));
                }
                for i in empty_slots {
                    out.push(format!(
                        "Box {} is still empty. Drag a factor into each box.",
                        i + 1
                    ));
                }
                out
            }
            ValidationResult::Mistakes {
                issues,
                unchecked_path,
            } => {
                let mut out = Vec::new();
                if !unchecked_path.is_empty() {
                    out.push(path_message(unchecked_path));
                }
                out.extend(issues.iter().map(|issue| issue.message()));
                out
            }
        }
    }
}

/// Compares the placed slots with the required sequence (id first, then orientation) and
/// checks the conceptual-path checklist.
pub fn validate(
    slots: &FactorSlots,
    required: &[RequiredFactor],
    path: &ConceptualPath,
) -> ValidationResult {
    let unchecked_path = path.unchecked();
    let empty_slots = slots.empty_positions();
    if !empty_slots.is_empty() {
        return ValidationResult::Incomplete {
            empty_slots,
            unchecked_path,
        };
    }

    let mut issues = Vec::new();
    for (position, placed) in slots.iter().enumerate() {
        let Some(placed) = placed else { continue };
        match required.get(position) {
            Some(need) if need.id == placed.id => {
                if need.flipped != placed.flipped {
                    issues.push(SlotIssue::WrongOrientation {
                        position,
                        needs_flipped: need.flipped,
                    });
                }
            }
            _ => issues.push(SlotIssue::WrongFactor { position }),
        }
    }

    if !issues.is_empty() {
        ValidationResult::Mistakes {
            issues,
            unchecked_path,
        }
    } else if !unchecked_path.is_empty() {
        ValidationResult::Incomplete {
            empty_slots,
            unchecked_path,
        }
    } else {
        ValidationResult::Correct
    }
}
