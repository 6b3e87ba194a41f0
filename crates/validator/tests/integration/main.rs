//! Integration tests for precond-validator.

mod common;
mod conditional;
mod config;
mod evaluator;
mod properties;
