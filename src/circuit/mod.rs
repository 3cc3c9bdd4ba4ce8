pub mod aig;
pub mod aiger;
