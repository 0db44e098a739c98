pub mod grid;
pub mod montecarlo;
