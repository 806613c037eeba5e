use crate::coach_error::CoachError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Grams,
    Moles,
    Particles,
    Liters,
}

impl UnitKind {
    pub const ALL: [UnitKind; 4] = [
        UnitKind::Grams,
        UnitKind::Moles,
        UnitKind::Particles,
        UnitKind::Liters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Grams => "grams",
            UnitKind::Moles => "moles",
            UnitKind::Particles => "particles",
            UnitKind::Liters => "liters",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubstanceTag {
    A,
    B,
}

/// unit kind + substance, written "gramsA", "molesB", ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Designator {
    pub unit: UnitKind,
    pub substance: SubstanceTag,
}

impl Designator {
    pub fn new(unit: UnitKind, substance: SubstanceTag) -> Self {
        Self { unit, substance }
    }
}

impl FromStr for Designator {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || CoachError::InvalidDesignator(s.to_string());
        let (unit_part, substance) = if let Some(unit) = s.strip_suffix('A') {
            (unit, SubstanceTag::A)
        } else if let Some(unit) = s.strip_suffix('B') {
            (unit, SubstanceTag::B)
        } else {
            return Err(invalid());
        };
        let unit = UnitKind::ALL
            .into_iter()
            .find(|u| u.as_str() == unit_part)
            .ok_or_else(invalid)?;
        Ok(Designator { unit, substance })
    }
}

impl fmt::Display for Designator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.substance {
            SubstanceTag::A => "A",
            SubstanceTag::B => "B",
        };
        write!(f, "{}{}", self.unit.as_str(), tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    GramsToMoles,
    MolesToGrams,
    ParticlesToMoles,
    MolesToParticles,
    LitersToMoles,
    MolesToLiters,
    MoleRatio,
}

impl StepId {
    pub const ALL: [StepId; 7] = [
        StepId::GramsToMoles,
        StepId::MolesToGrams,
        StepId::MolesToParticles,
        StepId::ParticlesToMoles,
        StepId::MolesToLiters,
        StepId::LitersToMoles,
        StepId::MoleRatio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::GramsToMoles => "grams_to_moles",
            StepId::MolesToGrams => "moles_to_grams",
            StepId::ParticlesToMoles => "particles_to_moles",
            StepId::MolesToParticles => "moles_to_particles",
            StepId::LitersToMoles => "liters_to_moles",
            StepId::MolesToLiters => "moles_to_liters",
            StepId::MoleRatio => "mole_ratio",
        }
    }

    /// step into moles from `unit`; None for moles itself
    fn into_moles(unit: UnitKind) -> Option<StepId> {
        match unit {
            UnitKind::Grams => Some(StepId::GramsToMoles),
            UnitKind::Particles => Some(StepId::ParticlesToMoles),
            UnitKind::Liters => Some(StepId::LitersToMoles),
            UnitKind::Moles => None,
        }
    }

    fn out_of_moles(unit: UnitKind) -> Option<StepId> {
        match unit {
            UnitKind::Grams => Some(StepId::MolesToGrams),
            UnitKind::Particles => Some(StepId::MolesToParticles),
            UnitKind::Liters => Some(StepId::MolesToLiters),
            UnitKind::Moles => None,
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Convert → ratio → convert, skipping what is not needed. Same unit and substance gives an
/// empty plan.
pub fn plan(start: Designator, target: Designator) -> Vec<StepId> {
    let mut path = Vec::with_capacity(3);
    path.extend(StepId::into_moles(start.unit));
    if start.substance != target.substance {
        path.push(StepId::MoleRatio);
    }
    path.extend(StepId::out_of_moles(target.unit));
    path
}

/// `plan` over designator strings
pub fn plan_str(start: &str, target: &str) -> Result<Vec<StepId>, CoachError> {
    Ok(plan(start.parse()?, target.parse()?))
}
