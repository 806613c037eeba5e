//! # MoleCoach
//!
//! Stoichiometry tutoring engine: randomized problems from balanced equations, a bank of
//! unit-fraction factors with distractors, setup validation, tolerant answer checking and the
//! mole-map route planner. `session::Session` ties them together behind a command dispatch;
//! the binary drives it from the console.
#[allow(non_snake_case)]
pub mod MoleMap;
#[allow(non_snake_case)]
pub mod Stoichiometry;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod coach_error;
pub mod session;
pub mod settings;
