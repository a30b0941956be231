pub mod production_reader;

pub use production_reader::ProductionReader;
