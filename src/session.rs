//! # Session
//!
//! ## Aim
//! One student's running session: the current problem, the three placement slots, the
//! conceptual-path checklist, the hint level and the quiz counters. Every UI action is a
//! `Command`; `Session::dispatch` runs it to completion and answers with an `Event`.
//!
//! ## Main Data Structures
//! - `Command`: everything a front end can ask for
//! - `Event`: what the front end renders in response
//! - `Session<R>`: the state, generic over the injected random source
//!
//! Guided-mode commands (slots, checklist, setup check, final answer) are refused in quiz
//! mode and the quiz answer is refused in guided mode, with `CoachError::WrongMode`.
use crate::MoleMap::path_planner::{Designator, plan};
use crate::MoleMap::step_catalog::{StepCard, cards};
use crate::Stoichiometry::answer_evaluator::{
    EvaluationResult, SessionStats, Tolerance, evaluate, evaluate_quiz, setup_not_ready,
};
use crate::Stoichiometry::factor_bank::FactorId;
use crate::Stoichiometry::problem_generator::{
    GenerationOptions, Problem, ProblemMode, QuantityUnit, Reaction, UniformSource, generate,
};
use crate::Stoichiometry::setup_validator::{
    ConceptualPath, FactorSlots, PathStep, ValidationResult, validate,
};
use crate::Stoichiometry::worked_steps::{
    GroupedNumbers, MAX_HINT_LEVEL, WorkedStep, grouped_numbers, hint, round_sig, worked_steps,
};
use crate::coach_error::CoachError;
use crate::settings::CoachConfig;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Target-unit tag shown in guided mode before the setup has been validated.
pub const HIDDEN_TARGET_TAG: &str = "final";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    NewProblem(ProblemMode),
    PlaceFactor(usize, FactorId),
    FlipSlot(usize),
    ClearSlot(usize),
    SetPathFlag(PathStep, bool),
    CheckSetup,
    ShowCorrectSetup,
    SubmitFinalAnswer(String),
    SubmitQuizAnswer(String, QuantityUnit),
    RequestReveal,
    RequestHint,
    ShowSteps,
    RequestPathPlan(String, String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    pub expected: f64,
    pub unit: QuantityUnit,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ProblemReady(Box<Problem>),
    SlotsChanged(FactorSlots),
    Validation(ValidationResult),
    Evaluation(EvaluationResult),
    Reveal(Reveal),
    Hint { level: u8, text: String },
    Steps {
        steps: Vec<WorkedStep>,
        grouped: GroupedNumbers,
    },
    Path(Vec<StepCard>),
    /// The conceptual-path checklist after a tick or untick.
    Checklist(ConceptualPath),
}

pub struct Session<R: UniformSource> {
    reactions: Vec<Reaction>,
    rng: R,
    options: GenerationOptions,
    tolerance: Tolerance,
    video_links: HashMap<String, String>,
    problem: Option<Problem>,
    slots: FactorSlots,
    path: ConceptualPath,
    stats: SessionStats,
    hint_level: u8,
    setup_validated: bool,
}

impl<R: UniformSource> Session<R> {
    pub fn new(
        reactions: Vec<Reaction>,
        rng: R,
        options: GenerationOptions,
        tolerance: Tolerance,
    ) -> Self {
        Self {
            reactions,
            rng,
            options,
            tolerance,
            video_links: HashMap::new(),
            problem: None,
            slots: FactorSlots::new(),
            path: ConceptualPath::default(),
            stats: SessionStats::default(),
            hint_level: 0,
            setup_validated: false,
        }
    }

    pub fn from_config(reactions: Vec<Reaction>, rng: R, config: &CoachConfig) -> Self {
        let mut session = Self::new(
            reactions,
            rng,
            config.generation_options(),
            config.tolerance(),
        );
        session.video_links = config.video_links.clone();
        session
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Event, CoachError> {
        debug!("dispatch {:?}", command);
        match command {
            Command::NewProblem(mode) => self.new_problem(mode),
            Command::PlaceFactor(slot, id) => self.place_factor(slot, id),
            Command::FlipSlot(slot) => self.flip_slot(slot),
            Command::ClearSlot(slot) => self.clear_slot(slot),
            Command::SetPathFlag(step, checked) => self.set_path_flag(step, checked),
            Command::CheckSetup => self.check_setup(),
            Command::ShowCorrectSetup => self.show_correct_setup(),
            Command::SubmitFinalAnswer(raw) => self.submit_final_answer(&raw),
            Command::SubmitQuizAnswer(raw, unit) => self.submit_quiz_answer(&raw, unit),
            Command::RequestReveal => self.reveal(),
            Command::RequestHint => self.hint(),
            Command::ShowSteps => self.show_steps(),
            Command::RequestPathPlan(start, target) => self.path_plan(&start, &target),
        }
    }

    /// Replaces the current problem and clears the slots, the checklist and the hint level.
    pub fn new_problem(&mut self, mode: ProblemMode) -> Result<Event, CoachError> {
        let problem = generate(&self.reactions, &mut self.rng, mode, &self.options)?;
        info!(
            "new {} problem: {} -> {} ({})",
            mode,
            problem.given_label(),
            problem.product.species,
            problem.reaction.equation
        );
        self.slots = FactorSlots::new();
        self.path = ConceptualPath::default();
        self.hint_level = 0;
        self.setup_validated = false;
        self.problem = Some(problem.clone());
        Ok(Event::ProblemReady(Box::new(problem)))
    }

    pub fn place_factor(&mut self, slot: usize, id: FactorId) -> Result<Event, CoachError> {
        let problem = self.require_mode(ProblemMode::Guided)?;
        let factor = problem
            .factor_bank
            .placed_copy(id)
            .ok_or(CoachError::UnknownFactor(id))?;
        self.slots.place(slot, factor)?;
        self.setup_validated = false;
        Ok(Event::SlotsChanged(self.slots.clone()))
    }

    pub fn flip_slot(&mut self, slot: usize) -> Result<Event, CoachError> {
        self.require_mode(ProblemMode::Guided)?;
        if self.slots.flip(slot)? {
            self.setup_validated = false;
        }
        Ok(Event::SlotsChanged(self.slots.clone()))
    }

    pub fn clear_slot(&mut self, slot: usize) -> Result<Event, CoachError> {
        self.require_mode(ProblemMode::Guided)?;
        self.slots.clear(slot)?;
        self.setup_validated = false;
        Ok(Event::SlotsChanged(self.slots.clone()))
    }

    /// Ticks or unticks one step of the convert → ratio → convert checklist. Only the
    /// checklist comes back; the setup is graded by `check_setup`.
    pub fn set_path_flag(&mut self, step: PathStep, checked: bool) -> Result<Event, CoachError> {
        self.require_mode(ProblemMode::Guided)?;
        self.path.set(step, checked);
        self.setup_validated = self.setup_validated && self.path.is_complete();
        Ok(Event::Checklist(self.path))
    }

    pub fn check_setup(&mut self) -> Result<Event, CoachError> {
        let problem = self.require_mode(ProblemMode::Guided)?;
        let result = validate(&self.slots, &problem.required_sequence, &self.path);
        self.setup_validated = result.is_correct();
        debug!("setup check: {:?}", result);
        Ok(Event::Validation(result))
    }

    /// Lays the required sequence into the slots. The checklist is left as it is.
    pub fn show_correct_setup(&mut self) -> Result<Event, CoachError> {
        let problem = self.require_mode(ProblemMode::Guided)?;
        self.slots = FactorSlots::from_required(&problem.required_sequence, &problem.factor_bank);
        self.setup_validated = false;
        Ok(Event::SlotsChanged(self.slots.clone()))
    }

    /// Guided final answer. Answers are only graded once the current setup is correct.
    pub fn submit_final_answer(&mut self, raw: &str) -> Result<Event, CoachError> {
        let problem = self.require_mode(ProblemMode::Guided)?;
        let ready = validate(&self.slots, &problem.required_sequence, &self.path).is_correct();
        let result = if ready {
            evaluate(
                raw,
                problem.expected_answer,
                problem.expected_unit,
                &self.tolerance,
            )
        } else {
            setup_not_ready(problem.expected_answer, problem.expected_unit)
        };
        Ok(Event::Evaluation(result))
    }

    /// Quiz answer; every evaluation counts toward the session stats.
    pub fn submit_quiz_answer(
        &mut self,
        raw: &str,
        unit: QuantityUnit,
    ) -> Result<Event, CoachError> {
        let problem = self.require_mode(ProblemMode::Quiz)?;
        let result = evaluate_quiz(raw, unit, problem, &self.tolerance);
        self.stats.record(&result);
        info!(
            "quiz answer {:?}: streak {}, {}/{}",
            result.verdict, self.stats.streak, self.stats.correct_count, self.stats.total_count
        );
        Ok(Event::Evaluation(result))
    }

    pub fn reveal(&mut self) -> Result<Event, CoachError> {
        let problem = self.current()?;
        let expected = problem.expected_answer;
        let unit = problem.expected_unit;
        let message = match problem.mode {
            ProblemMode::Guided => {
                let mut message = String::new();
                if !validate(&self.slots, &problem.required_sequence, &self.path).is_correct() {
                    message.push_str("You can reveal the expected answer, but try to get your setup correct first so this helps you learn the pattern.\n");
                }
                message.push_str(&format!(
                    "Expected about {:.3} {}. Use this to diagnose where your setup/calculation went off.",
                    expected,
                    unit.symbol()
                ));
                message
            }
            ProblemMode::Quiz => {
                format!("Expected about {} {}.", round_sig(expected, 4), unit)
            }
        };
        Ok(Event::Reveal(Reveal {
            expected,
            unit,
            message,
        }))
    }

    /// Next rung of the hint ladder, capped at the last one.
    pub fn hint(&mut self) -> Result<Event, CoachError> {
        let problem = self.current()?;
        let level = (self.hint_level + 1).min(MAX_HINT_LEVEL);
        let text = hint(level, problem);
        self.hint_level = level;
        Ok(Event::Hint { level, text })
    }

    pub fn show_steps(&mut self) -> Result<Event, CoachError> {
        let problem = self.current()?;
        Ok(Event::Steps {
            steps: worked_steps(problem),
            grouped: grouped_numbers(problem),
        })
    }

    /// Mole-map route between two designators; independent of the current problem.
    pub fn path_plan(&self, start: &str, target: &str) -> Result<Event, CoachError> {
        let start: Designator = start.parse()?;
        let target: Designator = target.parse()?;
        let steps = plan(start, target);
        debug!("path {} -> {}: {:?}", start, target, steps);
        Ok(Event::Path(cards(&steps, &self.video_links)))
    }

    /// Unit tag of the target: hidden ("final") in guided mode until the setup checks out.
    pub fn target_unit_tag(&self) -> String {
        match &self.problem {
            Some(p) if p.mode == ProblemMode::Quiz || self.setup_validated => p.target_label(),
            _ => HIDDEN_TARGET_TAG.to_string(),
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn problem(&self) -> Option<&Problem> {
        self.problem.as_ref()
    }

    pub fn slots(&self) -> &FactorSlots {
        &self.slots
    }

    pub fn conceptual_path(&self) -> &ConceptualPath {
        &self.path
    }

    pub fn hint_level(&self) -> u8 {
        self.hint_level
    }

    fn current(&self) -> Result<&Problem, CoachError> {
        self.problem.as_ref().ok_or(CoachError::NoActiveProblem)
    }

    fn require_mode(&self, mode: ProblemMode) -> Result<&Problem, CoachError> {
        let problem = self.current()?;
        if problem.mode != mode {
            return Err(CoachError::WrongMode(problem.mode.to_string()));
        }
        Ok(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MoleMap::path_planner::StepId;
    use crate::Stoichiometry::answer_evaluator::Verdict;
    use crate::Stoichiometry::problem_generator::SpeciesData;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn water() -> Reaction {
        let species = [("H2", 2.016), ("O2", 32.0), ("H2O", 18.015)]
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
            equation: "2 H2 + O2 -> 2 H2O".to_string(),
            species,
        }
    }

    fn session(seed: u64) -> Session<StdRng> {
        Session::new(
            vec![water()],
            StdRng::seed_from_u64(seed),
            GenerationOptions::default(),
            Tolerance::default(),
        )
    }

    fn place_required(s: &mut Session<StdRng>) {
        let required = s.problem().unwrap().required_sequence.clone();
        for (i, need) in required.iter().enumerate() {
            s.dispatch(Command::PlaceFactor(i, need.id)).unwrap();
            if need.flipped {
                s.dispatch(Command::FlipSlot(i)).unwrap();
            }
        }
    }

    fn check_all(s: &mut Session<StdRng>) {
        for step in PathStep::ALL {
            s.dispatch(Command::SetPathFlag(step, true)).unwrap();
        }
    }

    #[test]
    fn test_commands_need_a_problem() {
        let mut s = session(1);
        assert!(matches!(
            s.dispatch(Command::CheckSetup),
            Err(CoachError::NoActiveProblem)
        ));
        assert!(matches!(
            s.dispatch(Command::RequestHint),
            Err(CoachError::NoActiveProblem)
        ));
        assert_eq!(s.target_unit_tag(), HIDDEN_TARGET_TAG);
        // the planner does not
        assert!(s.dispatch(Command::RequestPathPlan("gramsA".into(), "molesB".into())).is_ok());
    }

    #[test]
    fn test_guided_flow() {
        let mut s = session(3);
        let event = s.dispatch(Command::NewProblem(ProblemMode::Guided)).unwrap();
        assert!(matches!(event, Event::ProblemReady(_)));
        assert_eq!(s.target_unit_tag(), "final");

        // an answer before the setup is correct is not graded
        let expected = s.problem().unwrap().expected_answer;
        match s
            .dispatch(Command::SubmitFinalAnswer(expected.to_string()))
            .unwrap()
        {
            Event::Evaluation(r) => assert_eq!(r.verdict, Verdict::SetupNotReady),
            other => panic!("unexpected event {:?}", other),
        }

        place_required(&mut s);
        match s.dispatch(Command::CheckSetup).unwrap() {
            Event::Validation(ValidationResult::Incomplete { unchecked_path, .. }) => {
                assert_eq!(unchecked_path.len(), 3)
            }
            other => panic!("unexpected event {:?}", other),
        }
        check_all(&mut s);
        assert_eq!(
            s.dispatch(Command::CheckSetup).unwrap(),
            Event::Validation(ValidationResult::Correct)
        );
        let product = s.problem().unwrap().product.species.clone();
        assert_eq!(s.target_unit_tag(), format!("g {}", product));

        match s
            .dispatch(Command::SubmitFinalAnswer(format!("{:.2}", expected)))
            .unwrap()
        {
            Event::Evaluation(r) => assert!(r.is_correct()),
            other => panic!("unexpected event {:?}", other),
        }

        // touching the setup hides the unit again
        s.dispatch(Command::FlipSlot(1)).unwrap();
        assert_eq!(s.target_unit_tag(), "final");
        // guided answers leave the quiz counters alone
        assert_eq!(s.stats(), SessionStats::default());
    }

    #[test]
    fn test_path_flag_reports_checklist_only() {
        let mut s = session(8);
        s.dispatch(Command::NewProblem(ProblemMode::Guided)).unwrap();
        let event = s
            .dispatch(Command::SetPathFlag(PathStep::UseRatio, true))
            .unwrap();
        match event {
            Event::Checklist(path) => {
                assert!(path.is_checked(PathStep::UseRatio));
                assert_eq!(path.unchecked().len(), 2);
            }
            other => panic!("unexpected event {:?}", other),
        }

        place_required(&mut s);
        check_all(&mut s);
        s.dispatch(Command::CheckSetup).unwrap();
        assert_ne!(s.target_unit_tag(), HIDDEN_TARGET_TAG);
        // unticking a step withdraws the validated setup
        assert_eq!(
            s.dispatch(Command::SetPathFlag(PathStep::UseRatio, false))
                .unwrap(),
            Event::Checklist(*s.conceptual_path())
        );
        assert_eq!(s.target_unit_tag(), HIDDEN_TARGET_TAG);
    }

    #[test]
    fn test_empty_problem_set_keeps_the_map() {
        let mut s = Session::new(
            Vec::new(),
            StdRng::seed_from_u64(9),
            GenerationOptions::default(),
            Tolerance::default(),
        );
        assert!(matches!(
            s.dispatch(Command::NewProblem(ProblemMode::Guided)),
            Err(CoachError::EmptyDataset)
        ));
        assert!(matches!(
            s.dispatch(Command::NewProblem(ProblemMode::Quiz)),
            Err(CoachError::EmptyDataset)
        ));
        assert!(s.problem().is_none());
        match s
            .dispatch(Command::RequestPathPlan("gramsA".into(), "molesB".into()))
            .unwrap()
        {
            Event::Path(cards) => assert_eq!(cards.len(), 2),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_place_factor_errors() {
        let mut s = Session::new(
            vec![water()],
            StdRng::seed_from_u64(4),
            GenerationOptions {
                include_distractors: false,
                ..GenerationOptions::default()
            },
            Tolerance::default(),
        );
        s.dispatch(Command::NewProblem(ProblemMode::Guided)).unwrap();
        assert!(matches!(
            s.dispatch(Command::PlaceFactor(0, FactorId::RatioFlipped)),
            Err(CoachError::UnknownFactor(FactorId::RatioFlipped))
        ));
        assert!(matches!(
            s.dispatch(Command::PlaceFactor(3, FactorId::Ratio)),
            Err(CoachError::SlotOutOfRange(3))
        ));
        assert!(matches!(
            s.dispatch(Command::ClearSlot(7)),
            Err(CoachError::SlotOutOfRange(7))
        ));
    }

    #[test]
    fn test_show_correct_setup_and_bank_unchanged() {
        let mut s = session(5);
        s.dispatch(Command::NewProblem(ProblemMode::Guided)).unwrap();
        let bank_before = s.problem().unwrap().factor_bank.clone();
        s.dispatch(Command::PlaceFactor(0, FactorId::MmIn)).unwrap();
        s.dispatch(Command::FlipSlot(0)).unwrap();
        s.dispatch(Command::ShowCorrectSetup).unwrap();
        assert_eq!(s.problem().unwrap().factor_bank, bank_before);
        check_all(&mut s);
        assert!(matches!(
            s.dispatch(Command::CheckSetup).unwrap(),
            Event::Validation(ValidationResult::Correct)
        ));
    }

    #[test]
    fn test_new_problem_resets_state() {
        let mut s = session(6);
        s.dispatch(Command::NewProblem(ProblemMode::Guided)).unwrap();
        place_required(&mut s);
        check_all(&mut s);
        s.dispatch(Command::RequestHint).unwrap();
        s.dispatch(Command::NewProblem(ProblemMode::Guided)).unwrap();
        assert_eq!(s.slots(), &FactorSlots::new());
        assert_eq!(s.conceptual_path(), &ConceptualPath::default());
        assert_eq!(s.hint_level(), 0);
    }

    #[test]
    fn test_mode_gating() {
        let mut s = session(7);
        s.dispatch(Command::NewProblem(ProblemMode::Quiz)).unwrap();
        assert!(matches!(
            s.dispatch(Command::PlaceFactor(0, FactorId::MmIn)),
            Err(CoachError::WrongMode(_))
        ));
        assert!(matches!(
            s.dispatch(Command::SubmitFinalAnswer("1".into())),
            Err(CoachError::WrongMode(_))
        ));
        s.dispatch(Command::NewProblem(ProblemMode::Guided)).unwrap();
        assert!(matches!(
            s.dispatch(Command::SubmitQuizAnswer("1".into(), QuantityUnit::Grams)),
            Err(CoachError::WrongMode(_))
        ));
    }

    #[test]
    fn test_quiz_stats() {
        let mut s = session(8);
        s.dispatch(Command::NewProblem(ProblemMode::Quiz)).unwrap();
        let (expected, unit) = {
            let p = s.problem().unwrap();
            (p.expected_answer, p.expected_unit)
        };
        assert_eq!(s.target_unit_tag(), s.problem().unwrap().target_label());

        s.dispatch(Command::SubmitQuizAnswer(expected.to_string(), unit))
            .unwrap();
        s.dispatch(Command::SubmitQuizAnswer(expected.to_string(), unit))
            .unwrap();
        assert_eq!(s.stats().streak, 2);

        let other = match unit {
            QuantityUnit::Grams => QuantityUnit::Moles,
            QuantityUnit::Moles => QuantityUnit::Grams,
        };
        match s
            .dispatch(Command::SubmitQuizAnswer(expected.to_string(), other))
            .unwrap()
        {
            Event::Evaluation(r) => assert!(matches!(r.verdict, Verdict::UnitMismatch { .. })),
            other => panic!("unexpected event {:?}", other),
        }
        s.dispatch(Command::SubmitQuizAnswer("abc".into(), unit))
            .unwrap();
        let stats = s.stats();
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.correct_count, 2);
        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.mastery_percent(), 50);
    }

    #[test]
    fn test_hint_ladder_caps_at_three() {
        let mut s = session(9);
        s.dispatch(Command::NewProblem(ProblemMode::Quiz)).unwrap();
        let levels: Vec<u8> = (0..5)
            .map(|_| match s.dispatch(Command::RequestHint).unwrap() {
                Event::Hint { level, .. } => level,
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(levels, vec![1, 2, 3, 3, 3]);
    }

    #[test]
    fn test_reveal_and_steps() {
        let mut s = session(10);
        s.dispatch(Command::NewProblem(ProblemMode::Guided)).unwrap();
        match s.dispatch(Command::RequestReveal).unwrap() {
            Event::Reveal(r) => {
                assert!(r.message.starts_with("You can reveal"));
                assert_eq!(r.unit, QuantityUnit::Grams);
            }
            other => panic!("unexpected event {:?}", other),
        }
        match s.dispatch(Command::ShowSteps).unwrap() {
            Event::Steps { steps, grouped } => {
                assert_eq!(steps.len(), 3);
                approx::assert_relative_eq!(
                    grouped.value(),
                    s.problem().unwrap().expected_answer,
                    max_relative = 1e-12
                );
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_path_plan_with_video_links() {
        let mut config = CoachConfig::default();
        config
            .video_links
            .insert("moles_to_particles".to_string(), "https://example.org/np".to_string());
        let mut s = Session::from_config(vec![water()], StdRng::seed_from_u64(11), &config);
        match s
            .dispatch(Command::RequestPathPlan("litersA".into(), "particlesB".into()))
            .unwrap()
        {
            Event::Path(cards) => {
                let ids: Vec<StepId> = cards.iter().map(|c| c.id).collect();
                assert_eq!(
                    ids,
                    vec![StepId::LitersToMoles, StepId::MoleRatio, StepId::MolesToParticles]
                );
                assert_eq!(cards[2].video.as_deref(), Some("https://example.org/np"));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(matches!(
            s.dispatch(Command::RequestPathPlan("gramsA".into(), "ouncesB".into())),
            Err(CoachError::InvalidDesignator(_))
        ));
    }

    #[test]
    fn test_seeded_sessions_replay() {
        let mut a = session(42);
        let mut b = session(42);
        for _ in 0..10 {
            assert_eq!(
                a.dispatch(Command::NewProblem(ProblemMode::Quiz)).unwrap(),
                b.dispatch(Command::NewProblem(ProblemMode::Quiz)).unwrap()
            );
        }
    }
}
