pub mod a001_territory;
