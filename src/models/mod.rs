pub mod category;
pub mod production;
pub mod wide;

pub use category::{CategoryValues, EnergyCategory};
pub use production::{CleanedRecord, RawRecord};
pub use wide::{CellValue, Column, WideRecord, WideTable};
