pub mod roster;
pub mod seed;
