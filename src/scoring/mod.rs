// Danger scoring: the additive risk formula and its distance helper.

pub mod geo;
pub mod risk;
