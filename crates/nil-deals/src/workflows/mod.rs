pub mod deals;
pub mod roster;
