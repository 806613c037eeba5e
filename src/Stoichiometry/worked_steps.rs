use crate::Stoichiometry::problem_generator::{Problem, ProblemType};
use serde::{Deserialize, Serialize};

pub const MAX_HINT_LEVEL: u8 = 3;

/// Rounds to `sig` significant figures for display.
pub fn round_sig(x: f64, sig: i32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let exponent = sig - x.abs().log10().floor() as i32 - 1;
    if exponent >= 0 {
        let p = 10f64.powi(exponent);
        (x * p).round() / p
    } else {
        let p = 10f64.powi(-exponent);
        (x / p).round() * p
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    Start,
    Convert,
    Ratio,
    Done,
}

impl StepKind {
    pub fn heading(&self) -> &'static str {
        match self {
            StepKind::Start => "Start",
            StepKind::Convert => "Convert",
            StepKind::Ratio => "Ratio",
            StepKind::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkedStep {
    pub kind: StepKind,
    pub title: String,
    pub calculation: String,
}

impl WorkedStep {
    fn new(kind: StepKind, title: &str, calculation: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            calculation,
        }
    }
}

/// Worked solution of the problem, one entry per step of its shape.
pub fn worked_steps(problem: &Problem) -> Vec<WorkedStep> {
    let r = &problem.reactant.species;
    let p = &problem.product.species;
    let rc = problem.reactant.coefficient;
    let pc = problem.product.coefficient;
    let mm_r = problem.molar_mass_reactant;
    let mm_p = problem.molar_mass_product;
    let given = problem.given_quantity;
    let ratio = problem.mole_ratio();

    let convert_in = |mol_r: f64| {
        WorkedStep::new(
            StepKind::Convert,
            "grams → moles (reactant)",
            format!(
                "{} g {} × (1 mol / {} g) = {} mol {}",
                given,
                r,
                mm_r,
                round_sig(mol_r, 4),
                r
            ),
        )
    };
    let use_ratio = |mol_r: f64, mol_p: f64, exact_start: bool| {
        let start = if exact_start {
            format!("{}", mol_r)
        } else {
            format!("{:.4}", mol_r)
        };
        WorkedStep::new(
            StepKind::Ratio,
            "use coefficients",
            format!(
                "{} mol {} × ({} mol {} / {} mol {}) = {} mol {}",
                start,
                r,
                pc,
                p,
                rc,
                r,
                round_sig(mol_p, 4),
                p
            ),
        )
    };
    let convert_out = |mol_p: f64| {
        WorkedStep::new(
            StepKind::Convert,
            "moles → grams (product)",
            format!(
                "{:.4} mol {} × ({} g / 1 mol) = {} g {}",
                mol_p,
                p,
                mm_p,
                round_sig(mol_p * mm_p, 4),
                p
            ),
        )
    };

    match problem.problem_type {
        ProblemType::GramsToGrams => {
            let mol_r = given / mm_r;
            let mol_p = mol_r * ratio;
            vec![
                convert_in(mol_r),
                use_ratio(mol_r, mol_p, false),
                convert_out(mol_p),
            ]
        }
        ProblemType::GramsToMoles => {
            let mol_r = given / mm_r;
            let mol_p = mol_r * ratio;
            vec![
                convert_in(mol_r),
                use_ratio(mol_r, mol_p, false),
                WorkedStep::new(
                    StepKind::Done,
                    "target was moles of product",
                    format!("{} mol {}", round_sig(mol_p, 4), p),
                ),
            ]
        }
        ProblemType::MolesToGrams => {
            let mol_p = given * ratio;
            vec![
                WorkedStep::new(
                    StepKind::Start,
                    "already in moles (reactant)",
                    format!("{} mol {}", given, r),
                ),
                use_ratio(given, mol_p, true),
                convert_out(mol_p),
            ]
        }
    }
}

/// The "numbers only" form of the setup: multiply the tops, divide by the bottoms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedNumbers {
    pub numerators: Vec<f64>,
    pub denominators: Vec<f64>,
}

impl GroupedNumbers {
    pub fn value(&self) -> f64 {
        self.numerators.iter().product::<f64>() / self.denominators.iter().product::<f64>()
    }
}

/// Numerators and denominators of the required setup with the 1s left out.
pub fn grouped_numbers(problem: &Problem) -> GroupedNumbers {
    let given = problem.given_quantity;
    let rc = problem.reactant.coefficient as f64;
    let pc = problem.product.coefficient as f64;
    let mm_r = problem.molar_mass_reactant;
    let mm_p = problem.molar_mass_product;
    let (numerators, denominators) = match problem.problem_type {
        ProblemType::GramsToGrams => (vec![given, pc, mm_p], vec![mm_r, rc]),
        ProblemType::GramsToMoles => (vec![given, pc], vec![mm_r, rc]),
        ProblemType::MolesToGrams => (vec![given, pc, mm_p], vec![rc]),
    };
    GroupedNumbers {
        numerators: numerators.into_iter().filter(|v| *v != 1.0).collect(),
        denominators: denominators.into_iter().filter(|v| *v != 1.0).collect(),
    }
}

/// Hint ladder; `level` is clamped to 1..=3.
pub fn hint(level: u8, problem: &Problem) -> String {
    match level.clamp(1, MAX_HINT_LEVEL) {
        1 => "Hint 1: Ask yourself: do I have moles yet? If not, convert first.".to_string(),
        2 => format!(
            "Hint 2: Your mole ratio comes from the balanced equation coefficients for {} and {}.",
            problem.reactant.species, problem.product.species
        ),
        _ => "Hint 3: Use Show steps and copy the structure, then try a new problem.".to_string(),
    }
}
