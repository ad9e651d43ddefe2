pub mod indicators;
pub mod period;
pub mod territory;
