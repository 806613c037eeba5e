use crate::Stoichiometry::equation_parser::{ARROW, parse_equation};
use crate::Stoichiometry::problem_generator::Reaction;
use crate::coach_error::CoachError;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// The problem set: `{ "reactions": [ { "equation": ..., "species": { ... } } ] }`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub reactions: Vec<Reaction>,
}

impl Dataset {
    /// Parses a dataset document. Records that do not deserialize are logged and skipped;
    /// a document with no usable record is an error.
    pub fn from_json_str(content: &str) -> Result<Dataset, CoachError> {
        let document: Value = match serde_json::from_str(content) {
            Ok(document) => document,
            Err(e) => {
                let error_msg = format!(
                    "Error parsing dataset at line {}, column {}: {}",
                    e.line(),
                    e.column(),
                    e
                );
                error!("{}", error_msg);
                report_error_position(content, e.line(), e.column());
                return Err(CoachError::DatasetLoad(error_msg));
            }
        };

        let records = match document.get("reactions") {
            Some(Value::Array(records)) => records,
            Some(_) => {
                return Err(CoachError::DatasetLoad(
                    "'reactions' must be an array".to_string(),
                ));
            }
            None => {
                return Err(CoachError::DatasetLoad(
                    "no 'reactions' key in dataset".to_string(),
                ));
            }
        };

        let mut reactions = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            match serde_json::from_value::<Reaction>(record.clone()) {
                Ok(reaction) => reactions.push(reaction),
                Err(e) => error!("Skipping reaction record {}: {}", i, e),
            }
        }
        if reactions.is_empty() {
            return Err(CoachError::DatasetLoad(
                "dataset contains no usable reaction".to_string(),
            ));
        }

        let dataset = Dataset { reactions };
        dataset.validate();
        Ok(dataset)
    }

    /// Warns about records that will fail at generation time. Nothing is removed here: the
    /// generator reports them with typed errors when they are drawn.
    pub fn validate(&self) {
        for reaction in &self.reactions {
            if !reaction.equation.contains(ARROW) {
                warn!("Reaction '{}' has no '{}'", reaction.equation, ARROW);
                continue;
            }
            for (name, data) in &reaction.species {
                if let Some(mm) = data.molar_mass {
                    if !(mm > 0.0) {
                        warn!(
                            "Species '{}' in reaction '{}' has non-positive molar mass {}",
                            name, reaction.equation, mm
                        );
                    }
                }
            }
            let Ok(parsed) = parse_equation(&reaction.equation) else {
                warn!("Reaction '{}' does not parse", reaction.equation);
                continue;
            };
            for term in parsed.reactants.iter().chain(parsed.products.iter()) {
                let has_mass = reaction
                    .species
                    .get(&term.species)
                    .and_then(|s| s.molar_mass)
                    .is_some();
                if !has_mass {
                    warn!(
                        "Species '{}' in reaction '{}' is missing 'molarMass'",
                        term.species, reaction.equation
                    );
                }
            }
        }
    }
}

// logs the offending line with a caret under the column
fn report_error_position(content: &str, line: usize, column: usize) {
    if line == 0 {
        return;
    }
    if let Some(problem_line) = content.lines().nth(line - 1) {
        error!("Problematic line: {}", problem_line);
        if column >= 1 && column <= problem_line.len() + 1 {
            let pointer = " ".repeat(column - 1) + "^";
            error!("{}", pointer);
        }
    }
}

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }

    pub fn load_dataset(&self) -> Result<Dataset, CoachError> {
        load_dataset_from_file(&self.file_name)
    }

    /// The reactions of the problem set, or none when it cannot be loaded. Problem draws
    /// then fail with `CoachError::EmptyDataset`.
    pub fn load_reactions_or_empty(&self) -> Vec<Reaction> {
        match self.load_dataset() {
            Ok(dataset) => dataset.reactions,
            Err(e) => {
                error!("{}", e);
                error!("No problems can be drawn until the problem set loads");
                Vec::new()
            }
        }
    }
}

/// Reads and parses a dataset file.
pub fn load_dataset_from_file(file_name: &str) -> Result<Dataset, CoachError> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(CoachError::DatasetLoad(format!(
            "File '{}' does not exist",
            file_name
        )));
    }
    let content = fs::read_to_string(path)?;
    let dataset = Dataset::from_json_str(&content)?;
    info!(
        "Loaded {} reactions from file '{}'",
        dataset.reactions.len(),
        file_name
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_dataset_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{{").unwrap();
        writeln!(temp_file, "  \"reactions\": [").unwrap();
        writeln!(
            temp_file,
            "    {{ \"equation\": \"2 H2 + O2 -> 2 H2O\", \"species\": {{ \"H2\": {{ \"molarMass\": 2.016 }}, \"O2\": {{ \"molarMass\": 32.0 }}, \"H2O\": {{ \"molarMass\": 18.015 }} }} }},"
        )
        .unwrap();
        writeln!(
            temp_file,
            "    {{ \"equation\": \"N2 + 3 H2 -> 2 NH3\", \"species\": {{ \"N2\": {{ \"molarMass\": 28.014 }}, \"H2\": {{ \"molarMass\": 2.016 }}, \"NH3\": {{ \"molarMass\": 17.031 }} }} }}"
        )
        .unwrap();
        writeln!(temp_file, "  ]").unwrap();
        writeln!(temp_file, "}}").unwrap();

        let loader = LoadData::new(temp_file.path().to_str().unwrap().to_string());
        let dataset = loader.load_dataset().unwrap();
        assert_eq!(dataset.reactions.len(), 2);
        assert_eq!(dataset.reactions[1].equation, "N2 + 3 H2 -> 2 NH3");
        assert_relative_eq!(dataset.reactions[0].molar_mass("H2O").unwrap(), 18.015);
    }

    #[test]
    fn test_missing_file() {
        let result = load_dataset_from_file("no_such_dataset_file.json");
        assert!(matches!(result, Err(CoachError::DatasetLoad(msg)) if msg.contains("does not exist")));
    }

    #[test]
    fn test_unloadable_dataset_gives_no_reactions() {
        let missing = LoadData::new("missing_problems.json".to_string());
        assert!(missing.load_reactions_or_empty().is_empty());

        let mut broken = NamedTempFile::new().unwrap();
        writeln!(broken, "{{ \"reactions\": ").unwrap();
        let loader = LoadData::new(broken.path().to_str().unwrap().to_string());
        assert!(loader.load_reactions_or_empty().is_empty());

        let bundled = LoadData::new("data/problems.json".to_string());
        assert!(!bundled.load_reactions_or_empty().is_empty());
    }

    #[test]
    fn test_invalid_json_reports_position() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{{").unwrap();
        writeln!(temp_file, "  \"reactions\": [ {{ \"equation\": \"A -> B\" }}, ]").unwrap();
        writeln!(temp_file, "}}").unwrap();

        let result = load_dataset_from_file(temp_file.path().to_str().unwrap());
        match result {
            Err(CoachError::DatasetLoad(msg)) => assert!(msg.contains("line 2")),
            other => panic!("expected a load error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_records_are_skipped() {
        let content = r#"{
            "reactions": [
                { "equation": "2 H2 + O2 -> 2 H2O", "species": { "H2": { "molarMass": 2.016 } } },
                { "equation": 42 },
                { "species": {} },
                { "equation": "C + O2 -> CO2", "species": { "C": { "molarMass": "twelve" } } }
            ]
        }"#;
        let dataset = Dataset::from_json_str(content).unwrap();
        assert_eq!(dataset.reactions.len(), 1);
        // the missing masses are kept and surface when the reaction is drawn
        assert!(dataset.reactions[0].molar_mass("H2O").is_err());
    }

    #[test]
    fn test_no_usable_records() {
        assert!(matches!(
            Dataset::from_json_str(r#"{ "reactions": [ { "equation": 1 } ] }"#),
            Err(CoachError::DatasetLoad(_))
        ));
        assert!(matches!(
            Dataset::from_json_str(r#"{ "reactions": [] }"#),
            Err(CoachError::DatasetLoad(_))
        ));
        assert!(matches!(
            Dataset::from_json_str(r#"{ "problems": [] }"#),
            Err(CoachError::DatasetLoad(_))
        ));
    }

    #[test]
    fn test_bundled_problem_set() {
        use crate::Stoichiometry::equation_parser::parse_equation;
        let dataset = LoadData::new("data/problems.json".to_string())
            .load_dataset()
            .unwrap();
        assert!(dataset.reactions.len() >= 5);
        for reaction in &dataset.reactions {
            let parsed = parse_equation(&reaction.equation).unwrap();
            for term in parsed.reactants.iter().chain(parsed.products.iter()) {
                assert!(reaction.molar_mass(&term.species).is_ok());
            }
        }
    }

    #[test]
    fn test_species_without_molar_mass_deserializes() {
        let content = r#"{ "reactions": [ { "equation": "A -> B", "species": { "A": {} } } ] }"#;
        let dataset = Dataset::from_json_str(content).unwrap();
        assert_eq!(dataset.reactions[0].species["A"].molar_mass, None);
    }
}
