/// Parsing of balanced equations written as "2 H2 + O2 -> 2 H2O" into reactant and product terms
/// with their stoichiometric coefficients.
///
///  # Examples
/// ```
/// use MoleCoach::Stoichiometry::equation_parser::parse_equation;
/// let parsed = parse_equation("2 H2 + O2 -> 2 H2O").unwrap();
/// assert_eq!(parsed.reactants.len(), 2);
/// assert_eq!(parsed.products[0].coefficient, 2);
/// ```
pub mod equation_parser;
/// Unit-fraction factors ("1 mol H2 / 2.016 g H2") for a chosen reactant/product pair: the three
/// correct conversion factors and the two common-mistake distractors.
pub mod factor_bank;
/// Random problem synthesis: picks reaction, substances, given quantity and problem type,
/// computes the ground-truth answer and the required factor sequence.
/// Randomness is injected through the UniformSource trait so that problems are replayable.
///
///  # Examples
/// ```
/// use MoleCoach::Stoichiometry::problem_generator::{generate, GenerationOptions, ProblemMode};
/// use MoleCoach::Utils::load_from_file::Dataset;
/// use rand::{SeedableRng, rngs::StdRng};
/// let dataset = Dataset::from_json_str(r#"{"reactions":[{"equation":"2 H2 + O2 -> 2 H2O",
///   "species":{"H2":{"molarMass":2.016},"O2":{"molarMass":32.0},"H2O":{"molarMass":18.015}}}]}"#).unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
/// let problem = generate(&dataset.reactions, &mut rng, ProblemMode::Guided, &GenerationOptions::default()).unwrap();
/// assert_eq!(problem.required_sequence.len(), 3);
/// ```
pub mod problem_generator;
/// The three factor slots, the conceptual-path checklist and the pure setup validation.
pub mod setup_validator;
/// Tolerance-based checking of typed answers: the guided evaluator and the quiz evaluator
/// with common-mistake fingerprints, plus the session statistics they update.
pub mod answer_evaluator;
/// worked solutions, grouped numerators/denominators and hints
pub mod worked_steps;

mod stoichiometry_tests;
