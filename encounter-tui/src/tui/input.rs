//! Parsing of popup input. Every parser rejects bad input with a
//! [`ValidationError`] so nothing invalid reaches the store.

use encounter_core::{
    validation::{parse_amount, parse_party_level, parse_score, ValidationError},
    Combatant, Condition, ConditionTarget, StandardCondition,
};

fn invalid(field: &'static str, input: &str, expected: &'static str) -> ValidationError {
    ValidationError {
        field,
        input: input.to_string(),
        expected,
    }
}

/// Splits a trailing number off `input`, e.g. "Goblin 3" -> ("Goblin", Some("3")).
fn split_trailing_number(input: &str) -> (&str, Option<&str>) {
    let input = input.trim();
    match input.rsplit_once(char::is_whitespace) {
        Some((head, tail)) if tail.chars().all(|c| c.is_ascii_digit()) => (head.trim(), Some(tail)),
        _ => (input, None),
    }
}

/// "3", "3 2", "Hexed" or "Hexed 10": a standard condition number or a
/// custom name, optionally followed by a duration in rounds.
pub fn parse_condition(input: &str) -> Result<Condition, ValidationError> {
    let (name, duration) = split_trailing_number(input);
    if name.is_empty() {
        return Err(invalid("condition", input, "condition name or number"));
    }
    let name = match name.parse::<usize>() {
        Ok(n) if (1..=StandardCondition::ALL.len()).contains(&n) => {
            StandardCondition::ALL[n - 1].to_string()
        }
        Ok(_) => return Err(invalid("condition", input, "condition name or number")),
        Err(_) => name.to_string(),
    };
    match duration {
        Some(rounds) => Ok(Condition::with_duration(name, parse_amount("duration", rounds)?)),
        None => Ok(Condition::new(name)),
    }
}

/// A 1-based position or a condition name.
pub fn parse_condition_target(input: &str) -> Result<ConditionTarget, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(invalid("condition", input, "condition name or number"));
    }
    match input.parse::<usize>() {
        Ok(0) => Err(invalid("condition", input, "condition number starting at 1")),
        Ok(n) => Ok(ConditionTarget::Index(n - 1)),
        Err(_) => Ok(ConditionTarget::Name(input.to_string())),
    }
}

/// "Goblin" or "Goblin 4".
pub fn parse_creature_request(input: &str) -> Result<(String, usize), ValidationError> {
    let (name, count) = split_trailing_number(input);
    if name.is_empty() {
        return Err(invalid("creature", input, "creature name"));
    }
    let count = match count {
        Some(count) => parse_amount("count", count)? as usize,
        None => 1,
    };
    Ok((name.to_string(), count))
}

/// "name level max_hp ac"; the name may contain spaces.
pub fn parse_player(input: &str) -> Result<Combatant, ValidationError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(invalid("player", input, "'name level max_hp ac'"));
    }
    let (name, numbers) = tokens.split_at(tokens.len() - 3);
    let level = parse_party_level(numbers[0])?;
    let max_hp = parse_amount("max hp", numbers[1])?;
    let ac = parse_score("ac", numbers[2])?;
    Ok(Combatant::player(&name.join(" "), level, max_hp, ac))
}

/// "size level".
pub fn parse_party(input: &str) -> Result<(u32, u8), ValidationError> {
    let mut tokens = input.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(size), Some(level), None) => Ok((
            parse_amount("party size", size)?,
            parse_party_level(level)?,
        )),
        _ => Err(invalid("party", input, "'size level'")),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("3", "Deafened", None)]
    #[case("3 2", "Deafened", Some(2))]
    #[case("Hexed", "Hexed", None)]
    #[case(" Hunter's Mark 10 ", "Hunter's Mark", Some(10))]
    #[case("14", "Unconscious", None)]
    fn test_parse_condition(#[case] input: &str, #[case] name: &str, #[case] duration: Option<u32>) {
        let condition = parse_condition(input).unwrap();
        assert_eq!(condition.name, name);
        assert_eq!(condition.duration, duration);
    }

    #[rstest]
    #[case("")]
    #[case("0")]
    #[case("15")]
    fn test_parse_condition_rejects(#[case] input: &str) {
        assert!(parse_condition(input).is_err());
    }

    #[test]
    fn test_parse_condition_target() {
        assert_eq!(parse_condition_target("2"), Ok(ConditionTarget::Index(1)));
        assert_eq!(
            parse_condition_target("Prone"),
            Ok(ConditionTarget::Name("Prone".to_string()))
        );
        assert!(parse_condition_target("0").is_err());
        assert!(parse_condition_target(" ").is_err());
    }

    #[test]
    fn test_parse_creature_request() {
        assert_eq!(
            parse_creature_request("Dire Wolf 3"),
            Ok(("Dire Wolf".to_string(), 3))
        );
        assert_eq!(parse_creature_request("Ogre"), Ok(("Ogre".to_string(), 1)));
        assert!(parse_creature_request("").is_err());
    }

    #[test]
    fn test_parse_player() {
        let player = parse_player("Sir Robin 4 32 17").unwrap();
        assert_eq!(player.name, "Sir Robin");
        assert_eq!(player.level(), Some(4));
        assert_eq!((player.hp, player.max_hp, player.ac), (32, 32, 17));
        assert!(parse_player("Robin 4 lots 17").is_err());
        assert!(parse_player("Robin 4 32").is_err());
    }

    #[test]
    fn test_parse_party() {
        assert_eq!(parse_party("5 3"), Ok((5, 3)));
        assert!(parse_party("5").is_err());
        assert!(parse_party("5 0").is_err());
        assert!(parse_party("5 3 1").is_err());
    }
}
