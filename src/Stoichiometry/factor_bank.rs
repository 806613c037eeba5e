//! # Factor bank
//!
//! A factor is a labeled unit fraction used in dimensional analysis, e.g.
//! `1 mol H2 / 2.016 g H2`. The bank for a problem holds the three factors of the correct
//! grams → moles → moles → grams chain and, optionally, two distractors that each model one
//! common student error:
//!
//! | id              | top                  | bottom               |
//! |-----------------|----------------------|----------------------|
//! | `mm_in`         | 1 mol R              | mm(R) g R            |
//! | `ratio`         | coef(P) mol P        | coef(R) mol R        |
//! | `mm_out`        | mm(P) g P            | 1 mol P              |
//! | `mm_in_wrong`   | 1 mol P              | mm(P) g P            |
//! | `ratio_flipped` | coef(R) mol R        | coef(P) mol P        |
//!
//! `top`/`bottom` always store the canonical orientation; `flipped` says which side is used as
//! numerator. Factors are identified by `FactorId`, and a factor placed into a slot is an
//! owned copy, so flipping it never touches the catalog entry.
use crate::Stoichiometry::equation_parser::EquationTerm;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorId {
    MmIn,
    Ratio,
    MmOut,
    MmInWrong,
    RatioFlipped,
}

impl FactorId {
    pub const ALL: [FactorId; 5] = [
        FactorId::MmIn,
        FactorId::Ratio,
        FactorId::MmOut,
        FactorId::MmInWrong,
        FactorId::RatioFlipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FactorId::MmIn => "mm_in",
            FactorId::Ratio => "ratio",
            FactorId::MmOut => "mm_out",
            FactorId::MmInWrong => "mm_in_wrong",
            FactorId::RatioFlipped => "ratio_flipped",
        }
    }

    pub fn from_str_id(id: &str) -> Option<FactorId> {
        FactorId::ALL.into_iter().find(|f| f.as_str() == id.trim())
    }

    pub fn is_distractor(&self) -> bool {
        matches!(self, FactorId::MmInWrong | FactorId::RatioFlipped)
    }
}

impl fmt::Display for FactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub id: FactorId,
    pub label: String,
    pub top: String,
    pub bottom: String,
    pub flipped: bool,
}

impl Factor {
    fn new(id: FactorId, label: &str, top: String, bottom: String) -> Self {
        Self {
            id,
            label: label.to_string(),
            top,
            bottom,
            flipped: false,
        }
    }
    /// side currently acting as numerator
    pub fn numerator(&self) -> &str {
        if self.flipped { &self.bottom } else { &self.top }
    }
    pub fn denominator(&self) -> &str {
        if self.flipped { &self.top } else { &self.bottom }
    }
    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} / {})", self.numerator(), self.denominator())
    }
}

/// Ordered catalog of the factors offered for one problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorBank {
    factors: Vec<Factor>,
}

impl FactorBank {
    /// Builds mm_in, ratio, mm_out and, when `include_distractors` is set, mm_in_wrong and
    /// ratio_flipped, in that order. Every factor starts unflipped.
    pub fn build(
        reactant: &EquationTerm,
        product: &EquationTerm,
        molar_mass_reactant: f64,
        molar_mass_product: f64,
        include_distractors: bool,
    ) -> Self {
        let r = &reactant.species;
        let p = &product.species;
        let ratio_top = format!("{} mol {}", product.coefficient, p);
        let ratio_bottom = format!("{} mol {}", reactant.coefficient, r);

        let mut factors = vec![
            Factor::new(
                FactorId::MmIn,
                "Molar mass (grams → moles)",
                format!("1 mol {}", r),
                format!("{} g {}", molar_mass_reactant, r),
            ),
            Factor::new(
                FactorId::Ratio,
                "Mole ratio (equation)",
                ratio_top.clone(),
                ratio_bottom.clone(),
            ),
            Factor::new(
                FactorId::MmOut,
                "Molar mass (moles → grams)",
                format!("{} g {}", molar_mass_product, p),
                format!("1 mol {}", p),
            ),
        ];
        if include_distractors {
            factors.push(Factor::new(
                FactorId::MmInWrong,
                "Wrong molar mass (product)",
                format!("1 mol {}", p),
                format!("{} g {}", molar_mass_product, p),
            ));
            factors.push(Factor::new(
                FactorId::RatioFlipped,
                "Mole ratio (flipped)",
                ratio_bottom,
                ratio_top,
            ));
        }
        Self { factors }
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn get(&self, id: FactorId) -> Option<&Factor> {
        self.factors.iter().find(|f| f.id == id)
    }

    /// independent copy of a catalog entry, ready to be placed into a slot
    pub fn placed_copy(&self, id: FactorId) -> Option<Factor> {
        self.get(id).cloned()
    }
}
