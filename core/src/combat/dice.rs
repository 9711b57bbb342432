use rand::Rng;

pub const D20: i32 = 20;

pub fn roll_dice<R: Rng + ?Sized>(rng: &mut R, sides: i32, modifier: i32) -> i32 {
    rng.random_range(1..=sides) + modifier
}

/// Rolls a single d20 and adds `modifier`.
pub fn roll_d20<R: Rng + ?Sized>(rng: &mut R, modifier: i32) -> i32 {
    roll_dice(rng, D20, modifier)
}
