pub mod currency;
pub mod rate;
