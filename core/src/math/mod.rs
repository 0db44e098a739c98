pub mod decibel;
pub mod gamma;

pub use decibel::DecibelHelper;
pub use gamma::GammaHelper;
