// Dashboard handlers
pub mod d100_revenue;
pub mod d101_fmc;

// Master data handlers
pub mod a001_territory;
