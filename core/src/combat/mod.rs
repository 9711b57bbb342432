pub mod combatant;
pub mod condition;
pub mod dice;
pub mod initiative;
pub mod turn;
