pub mod stocks;
pub mod system;
