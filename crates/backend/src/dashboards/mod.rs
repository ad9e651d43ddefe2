pub mod d100_revenue;
pub mod d101_fmc;
