/// Planner of the "mole map" route between two designators like "gramsA" and "litersB":
/// convert to moles, use the mole ratio when the substance changes, convert out of moles.
///
///  # Examples
/// ```
/// use MoleCoach::MoleMap::path_planner::{plan_str, StepId};
/// let steps = plan_str("litersA", "particlesB").unwrap();
/// assert_eq!(steps, vec![StepId::LitersToMoles, StepId::MoleRatio, StepId::MolesToParticles]);
/// ```
pub mod path_planner;
/// Titles, badges and explanations of the mole-map steps, rendered as numbered cards.
pub mod step_catalog;
