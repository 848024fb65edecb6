#![cfg(test)]

pub mod bootstrap_scenarios;
pub mod common;
pub mod interaction_tests;
