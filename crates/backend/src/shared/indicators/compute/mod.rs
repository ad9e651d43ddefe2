pub mod fmc;
pub mod revenue;

pub use fmc::compute_fmc_ratios;
pub use revenue::compute_ratios;
