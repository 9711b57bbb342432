//! Field-level checks for numbers typed by the user.
//!
//! Invalid input is rejected before it reaches the store; nothing keeps the
//! raw text around.

use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: '{input}' is not a valid {expected}")]
pub struct ValidationError {
    pub field: &'static str,
    pub input: String,
    pub expected: &'static str,
}

fn parse_field<T: FromStr>(
    field: &'static str,
    input: &str,
    expected: &'static str,
) -> Result<T, ValidationError> {
    input.trim().parse::<T>().map_err(|_| ValidationError {
        field,
        input: input.to_string(),
        expected,
    })
}

/// Hit points, damage and healing amounts.
pub fn parse_amount(field: &'static str, input: &str) -> Result<u32, ValidationError> {
    parse_field(field, input, "non-negative whole number")
}

/// Armor class and initiative.
pub fn parse_score(field: &'static str, input: &str) -> Result<i32, ValidationError> {
    parse_field(field, input, "whole number")
}

pub fn parse_party_level(input: &str) -> Result<u8, ValidationError> {
    let level: u8 = parse_field("party level", input, "level between 1 and 20")?;
    if (1..=20).contains(&level) {
        Ok(level)
    } else {
        Err(ValidationError {
            field: "party level",
            input: input.to_string(),
            expected: "level between 1 and 20",
        })
    }
}
