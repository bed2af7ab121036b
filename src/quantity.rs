#[macro_use]
mod macros;

pub mod energy;
pub mod intensity;
pub mod mass;
pub mod power;
