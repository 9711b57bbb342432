use serde::{Deserialize, Serialize};
use std::fmt;

/// The conditions defined by the 5e rules. Custom condition names are still
/// allowed on a [`Condition`]; this list only feeds pickers and shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardCondition {
    Blinded,
    Charmed,
    Deafened,
    Frightened,
    Grappled,
    Incapacitated,
    Invisible,
    Paralyzed,
    Petrified,
    Poisoned,
    Prone,
    Restrained,
    Stunned,
    Unconscious,
}

impl StandardCondition {
    pub const ALL: [StandardCondition; 14] = [
        StandardCondition::Blinded,
        StandardCondition::Charmed,
        StandardCondition::Deafened,
        StandardCondition::Frightened,
        StandardCondition::Grappled,
        StandardCondition::Incapacitated,
        StandardCondition::Invisible,
        StandardCondition::Paralyzed,
        StandardCondition::Petrified,
        StandardCondition::Poisoned,
        StandardCondition::Prone,
        StandardCondition::Restrained,
        StandardCondition::Stunned,
        StandardCondition::Unconscious,
    ];
}

impl fmt::Display for StandardCondition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A condition applied to a combatant. `duration` counts rounds and is only
/// decremented when a tick is requested explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl Condition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: None,
        }
    }

    pub fn with_duration(name: impl Into<String>, rounds: u32) -> Self {
        Self {
            name: name.into(),
            duration: Some(rounds),
        }
    }

    /// Decrements a timed condition. Returns `false` once it has run out.
    pub fn tick(&mut self) -> bool {
        match self.duration {
            Some(rounds) => {
                let left = rounds.saturating_sub(1);
                self.duration = Some(left);
                left > 0
            }
            None => true,
        }
    }
}

impl From<StandardCondition> for Condition {
    fn from(condition: StandardCondition) -> Self {
        Condition::new(condition.to_string())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.duration {
            Some(rounds) => write!(f, "{} ({}r)", self.name, rounds),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Selects a condition for removal, either by its position or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionTarget {
    Index(usize),
    Name(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_expires_timed_condition() {
        let mut condition = Condition::with_duration("Frightened", 2);
        assert!(condition.tick());
        assert_eq!(condition.duration, Some(1));
        assert!(!condition.tick());
        assert_eq!(condition.duration, Some(0));
    }

    #[test]
    fn test_tick_keeps_untimed_condition() {
        let mut condition = Condition::new("Prone");
        assert!(condition.tick());
        assert_eq!(condition.duration, None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Condition::from(StandardCondition::Stunned).to_string(), "Stunned");
        assert_eq!(
            Condition::with_duration("Poisoned", 3).to_string(),
            "Poisoned (3r)"
        );
    }
}
