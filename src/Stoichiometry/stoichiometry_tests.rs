/////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
/////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Stoichiometry::answer_evaluator::{Tolerance, evaluate};
    use crate::Stoichiometry::equation_parser::parse_equation;
    use crate::Stoichiometry::factor_bank::FactorId;
    use crate::Stoichiometry::problem_generator::{
        GenerationOptions, ProblemMode, ProblemType, QuantityUnit, Reaction, SpeciesData,
        generate,
    };
    use crate::Stoichiometry::setup_validator::{
        ConceptualPath, FactorSlots, ValidationResult, validate,
    };
    use crate::Stoichiometry::worked_steps::{StepKind, grouped_numbers, hint, worked_steps};
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn reaction(equation: &str, masses: &[(&str, f64)]) -> Reaction {
        let species: HashMap<String, SpeciesData> = masses
            .iter()
            .map(|(name, mm)| {
                (
                    name.to_string(),
                    SpeciesData {
                        molar_mass: Some(*mm),
                    },
                )
            })
            .collect();
        Reaction {
            equation: equation.to_string(),
            species,
        }
    }

    fn dataset() -> Vec<Reaction> {
        vec![
            reaction(
                "2 H2 + O2 -> 2 H2O",
                &[("H2", 2.016), ("O2", 32.0), ("H2O", 18.015)],
            ),
            reaction(
                "CH4 + 2 O2 -> CO2 + 2 H2O",
                &[("CH4", 16.043), ("O2", 31.998), ("CO2", 44.009), ("H2O", 18.015)],
            ),
            reaction(
                "N2 + 3 H2 -> 2 NH3",
                &[("N2", 28.014), ("H2", 2.016), ("NH3", 17.031)],
            ),
            reaction(
                "2 KClO3 -> 2 KCl + 3 O2",
                &[("KClO3", 122.55), ("KCl", 74.551), ("O2", 31.998)],
            ),
        ]
    }

    #[test]
    fn test_stoichiometric_identity_for_generated_problems() {
        let reactions = dataset();
        let options = GenerationOptions::default();
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..300 {
            let p = generate(&reactions, &mut rng, ProblemMode::Guided, &options).unwrap();
            let identity = (p.given_quantity / p.molar_mass_reactant)
                * (p.product.coefficient as f64 / p.reactant.coefficient as f64)
                * p.molar_mass_product;
            assert_eq!(p.expected_answer, identity);
            assert_eq!(p.expected_unit, QuantityUnit::Grams);

            // drawn terms really come from the equation sides
            let parsed = parse_equation(&p.reaction.equation).unwrap();
            assert!(parsed.reactants.contains(&p.reactant));
            assert!(parsed.products.contains(&p.product));
        }
    }

    #[test]
    fn test_required_sequence_always_validates() {
        let reactions = dataset();
        let options = GenerationOptions::default();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let p = generate(&reactions, &mut rng, ProblemMode::Guided, &options).unwrap();
            let slots = FactorSlots::from_required(&p.required_sequence, &p.factor_bank);
            assert_eq!(
                validate(&slots, &p.required_sequence, &ConceptualPath::all_checked()),
                ValidationResult::Correct
            );
            assert!(
                !validate(&slots, &p.required_sequence, &ConceptualPath::default()).is_correct()
            );
        }
    }

    #[test]
    fn test_grouped_numbers_reproduce_answer() {
        let reactions = dataset();
        let options = GenerationOptions::default();
        let mut rng = StdRng::seed_from_u64(77);
        for _ in 0..100 {
            let p = generate(&reactions, &mut rng, ProblemMode::Quiz, &options).unwrap();
            let grouped = grouped_numbers(&p);
            assert!(grouped.numerators.iter().all(|v| *v != 1.0));
            assert!(grouped.denominators.iter().all(|v| *v != 1.0));
            assert_relative_eq!(grouped.value(), p.expected_answer, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_worked_steps_shapes() {
        let reactions = dataset();
        let options = GenerationOptions::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = HashMap::new();
        for _ in 0..100 {
            let p = generate(&reactions, &mut rng, ProblemMode::Quiz, &options).unwrap();
            let kinds: Vec<StepKind> = worked_steps(&p).iter().map(|s| s.kind).collect();
            let expected = match p.problem_type {
                ProblemType::GramsToGrams => {
                    vec![StepKind::Convert, StepKind::Ratio, StepKind::Convert]
                }
                ProblemType::GramsToMoles => vec![StepKind::Convert, StepKind::Ratio, StepKind::Done],
                ProblemType::MolesToGrams => vec![StepKind::Start, StepKind::Ratio, StepKind::Convert],
            };
            assert_eq!(kinds, expected);
            seen.insert(p.problem_type, true);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_hydrogen_water_walkthrough() {
        let reactions = vec![dataset().remove(0)];
        let options = GenerationOptions {
            grams_range: (20, 20),
            ..GenerationOptions::default()
        };
        // one reaction, fixed grams: keep drawing until H2 -> H2O comes up
        let mut rng = StdRng::seed_from_u64(1);
        let problem = (0..100)
            .map(|_| generate(&reactions, &mut rng, ProblemMode::Guided, &options).unwrap())
            .find(|p| p.reactant.species == "H2")
            .unwrap();
        assert_eq!(problem.given_quantity, 20.0);
        assert_relative_eq!(problem.expected_answer, 178.72, epsilon = 0.01);

        let steps = worked_steps(&problem);
        assert!(steps[0].calculation.starts_with("20 g H2 × (1 mol / 2.016 g)"));
        assert!(steps[2].calculation.ends_with("178.7 g H2O"));
        assert!(hint(2, &problem).contains("H2 and H2O"));

        let mut slots = FactorSlots::new();
        slots
            .place(0, problem.factor_bank.placed_copy(FactorId::MmIn).unwrap())
            .unwrap();
        slots
            .place(1, problem.factor_bank.placed_copy(FactorId::Ratio).unwrap())
            .unwrap();
        slots
            .place(2, problem.factor_bank.placed_copy(FactorId::MmInWrong).unwrap())
            .unwrap();
        slots.flip(2).unwrap();
        let path = ConceptualPath::all_checked();
        assert!(!validate(&slots, &problem.required_sequence, &path).is_correct());

        slots
            .place(2, problem.factor_bank.placed_copy(FactorId::MmOut).unwrap())
            .unwrap();
        assert!(validate(&slots, &problem.required_sequence, &path).is_correct());
        assert!(!problem.factor_bank.get(FactorId::MmInWrong).unwrap().flipped);

        let result = evaluate(
            "178.72",
            problem.expected_answer,
            problem.expected_unit,
            &Tolerance::default(),
        );
        assert!(result.is_correct());
    }
}
