//! # Problem generator
//!
//! ## Aim
//! Synthesizes randomized stoichiometry problems from a set of balanced reactions and computes
//! their ground-truth answers.
//!
//! ## Main Data Structures and Logic
//! - `Reaction`: one dataset record, equation plus molar masses of its species
//! - `UniformSource`: the injected random source (uniform integer in an inclusive range),
//!   implemented for every `rand::Rng` so a seeded `StdRng` replays the same problems
//! - `ProblemType`: grams→grams, grams→moles, moles→grams
//! - `ProblemMode`: `Guided` (drag-and-place setup, always grams→grams, target unit hidden
//!   in the prompt) and `Quiz` (free response, any problem type)
//! - `Problem`: everything the session needs to check the student's work
//!
//! The answer is
//! `moles_in × (coef(P) / coef(R)) × unit_factor`, where `moles_in` is `grams / mm(R)` for a
//! grams input and the given amount otherwise, and `unit_factor` is `mm(P)` for a grams
//! target and 1 for a moles target.
use crate::Stoichiometry::equation_parser::{EquationTerm, parse_equation};
use crate::Stoichiometry::factor_bank::{FactorBank, FactorId};
use crate::coach_error::CoachError;
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// molar mass record of one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    #[serde(rename = "molarMass", default)]
    pub molar_mass: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub equation: String,
    #[serde(default)]
    pub species: HashMap<String, SpeciesData>,
}

impl Reaction {
    /// Molar mass of `species`; missing, non-finite or non-positive values are rejected
    /// instead of being allowed to turn into a NaN answer.
    pub fn molar_mass(&self, species: &str) -> Result<f64, CoachError> {
        match self.species.get(species).and_then(|s| s.molar_mass) {
            Some(mm) if mm.is_finite() && mm > 0.0 => Ok(mm),
            _ => Err(CoachError::InvalidMolarMass {
                species: species.to_string(),
                reaction: self.equation.clone(),
            }),
        }
    }
}

/// Source of uniform integers in `[low, high]`.
pub trait UniformSource {
    fn uniform_int(&mut self, low: i64, high: i64) -> i64;
}

impl<R: Rng> UniformSource for R {
    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.gen_range(low..=high)
    }
}

fn draw_index<U: UniformSource + ?Sized>(rng: &mut U, len: usize) -> usize {
    rng.uniform_int(0, len as i64 - 1).clamp(0, len as i64 - 1) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityUnit {
    Grams,
    Moles,
}

impl QuantityUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            QuantityUnit::Grams => "g",
            QuantityUnit::Moles => "mol",
        }
    }
    pub fn name(&self) -> &'static str {
        match self {
            QuantityUnit::Grams => "grams",
            QuantityUnit::Moles => "moles",
        }
    }
    /// accepts the symbol or the plural name, case-insensitive
    pub fn parse(s: &str) -> Option<QuantityUnit> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(QuantityUnit::Grams),
            "mol" | "mole" | "moles" => Some(QuantityUnit::Moles),
            _ => None,
        }
    }
}

impl fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemType {
    GramsToGrams,
    GramsToMoles,
    MolesToGrams,
}

impl ProblemType {
    pub const ALL: [ProblemType; 3] = [
        ProblemType::GramsToGrams,
        ProblemType::GramsToMoles,
        ProblemType::MolesToGrams,
    ];

    pub fn given_unit(&self) -> QuantityUnit {
        match self {
            ProblemType::MolesToGrams => QuantityUnit::Moles,
            _ => QuantityUnit::Grams,
        }
    }

    pub fn target_unit(&self) -> QuantityUnit {
        match self {
            ProblemType::GramsToMoles => QuantityUnit::Moles,
            _ => QuantityUnit::Grams,
        }
    }

    /// Conversion steps needed for this shape; all entries are unflipped.
    pub fn required_sequence(&self) -> Vec<RequiredFactor> {
        let ids: &[FactorId] = match self {
            ProblemType::GramsToGrams => &[FactorId::MmIn, FactorId::Ratio, FactorId::MmOut],
            ProblemType::GramsToMoles => &[FactorId::MmIn, FactorId::Ratio],
            ProblemType::MolesToGrams => &[FactorId::Ratio, FactorId::MmOut],
        };
        ids.iter()
            .map(|&id| RequiredFactor { id, flipped: false })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProblemMode {
    Guided,
    Quiz,
}

impl fmt::Display for ProblemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemMode::Guided => write!(f, "guided"),
            ProblemMode::Quiz => write!(f, "quiz"),
        }
    }
}

/// one position of the required factor sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredFactor {
    pub id: FactorId,
    pub flipped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub include_distractors: bool,
    /// inclusive range of the integer grams amount
    pub grams_range: (u32, u32),
    /// inclusive range of k for a k/2 moles amount
    pub moles_half_steps: (u32, u32),
    pub max_draw_attempts: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            include_distractors: true,
            grams_range: (6, 40),
            moles_half_steps: (1, 6),
            max_draw_attempts: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub mode: ProblemMode,
    pub reaction: Reaction,
    pub reactant: EquationTerm,
    pub product: EquationTerm,
    pub given_quantity: f64,
    pub given_unit: QuantityUnit,
    pub problem_type: ProblemType,
    pub molar_mass_reactant: f64,
    pub molar_mass_product: f64,
    pub prompt: String,
    pub factor_bank: FactorBank,
    pub required_sequence: Vec<RequiredFactor>,
    pub expected_answer: f64,
    pub expected_unit: QuantityUnit,
}

impl Problem {
    /// coef(P) / coef(R)
    pub fn mole_ratio(&self) -> f64 {
        self.product.coefficient as f64 / self.reactant.coefficient as f64
    }

    /// "20 g H2"
    pub fn given_label(&self) -> String {
        format!(
            "{} {} {}",
            self.given_quantity,
            self.given_unit.symbol(),
            self.reactant.species
        )
    }

    /// "g H2O"
    pub fn target_label(&self) -> String {
        format!("{} {}", self.expected_unit.symbol(), self.product.species)
    }
}

fn render_prompt(
    equation: &str,
    reactant: &EquationTerm,
    product: &EquationTerm,
    given_quantity: f64,
    problem_type: ProblemType,
    mode: ProblemMode,
) -> String {
    let given_unit = problem_type.given_unit().symbol();
    match mode {
        // the target unit stays hidden until the setup checks out
        ProblemMode::Guided => format!(
            "A reaction occurs: {}\nIf you start with {} {} of {}, build the setup to find how much {} is produced (assume excess of the other reactants).",
            equation, given_quantity, given_unit, reactant.species, product.species
        ),
        ProblemMode::Quiz => format!(
            "A reaction occurs: {}\nIf you start with {} {} of {}, how many {} of {} can be produced (assume excess)?",
            equation,
            given_quantity,
            given_unit,
            reactant.species,
            problem_type.target_unit().name(),
            product.species
        ),
    }
}

/// Builds a problem from already chosen ingredients. `generate` calls this after its random
/// draws; it is public so that a specific problem can be reproduced.
pub fn assemble_problem(
    reaction: &Reaction,
    reactant: EquationTerm,
    product: EquationTerm,
    given_quantity: f64,
    problem_type: ProblemType,
    mode: ProblemMode,
    include_distractors: bool,
) -> Result<Problem, CoachError> {
    let molar_mass_reactant = reaction.molar_mass(&reactant.species)?;
    let molar_mass_product = reaction.molar_mass(&product.species)?;

    let ratio = product.coefficient as f64 / reactant.coefficient as f64;
    let moles_in = match problem_type.given_unit() {
        QuantityUnit::Grams => given_quantity / molar_mass_reactant,
        QuantityUnit::Moles => given_quantity,
    };
    let unit_factor = match problem_type.target_unit() {
        QuantityUnit::Grams => molar_mass_product,
        QuantityUnit::Moles => 1.0,
    };
    let expected_answer = moles_in * ratio * unit_factor;

    let factor_bank = FactorBank::build(
        &reactant,
        &product,
        molar_mass_reactant,
        molar_mass_product,
        include_distractors,
    );
    let prompt = render_prompt(
        &reaction.equation,
        &reactant,
        &product,
        given_quantity,
        problem_type,
        mode,
    );
    debug!(
        "new {} problem: {} {} {} -> {} {}, expected {}",
        mode,
        given_quantity,
        problem_type.given_unit(),
        reactant.species,
        problem_type.target_unit(),
        product.species,
        expected_answer
    );
    Ok(Problem {
        mode,
        reaction: reaction.clone(),
        reactant,
        product,
        given_quantity,
        given_unit: problem_type.given_unit(),
        problem_type,
        molar_mass_reactant,
        molar_mass_product,
        prompt,
        factor_bank,
        required_sequence: problem_type.required_sequence(),
        expected_answer,
        expected_unit: problem_type.target_unit(),
    })
}

fn draw_given_quantity<U: UniformSource + ?Sized>(
    rng: &mut U,
    unit: QuantityUnit,
    options: &GenerationOptions,
) -> f64 {
    match unit {
        QuantityUnit::Grams => {
            let (low, high) = options.grams_range;
            rng.uniform_int(low as i64, high as i64) as f64
        }
        QuantityUnit::Moles => {
            let (low, high) = options.moles_half_steps;
            rng.uniform_int(low as i64, high as i64) as f64 / 2.0
        }
    }
}

/// Draws a reaction, a reactant, a product, a problem type (quiz mode only) and a given
/// quantity, then assembles the problem. A reaction whose equation does not parse is
/// logged and another one is drawn; a bad molar mass aborts generation.
pub fn generate<U: UniformSource + ?Sized>(
    reactions: &[Reaction],
    rng: &mut U,
    mode: ProblemMode,
    options: &GenerationOptions,
) -> Result<Problem, CoachError> {
    if reactions.is_empty() {
        return Err(CoachError::EmptyDataset);
    }
    let mut last_error = None;
    for attempt in 1..=options.max_draw_attempts.max(1) {
        let reaction = &reactions[draw_index(rng, reactions.len())];
        let parsed = match parse_equation(&reaction.equation) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("draw {} skipped: {}", attempt, e);
                last_error = Some(e);
                continue;
            }
        };
        let problem_type = match mode {
            ProblemMode::Guided => ProblemType::GramsToGrams,
            ProblemMode::Quiz => ProblemType::ALL[draw_index(rng, ProblemType::ALL.len())],
        };
        let reactant = parsed.reactants[draw_index(rng, parsed.reactants.len())].clone();
        let product = parsed.products[draw_index(rng, parsed.products.len())].clone();
        let given_quantity = draw_given_quantity(rng, problem_type.given_unit(), options);
        return assemble_problem(
            reaction,
            reactant,
            product,
            given_quantity,
            problem_type,
            mode,
            options.include_distractors,
        );
    }
    Err(last_error.unwrap_or(CoachError::EmptyDataset))
}
