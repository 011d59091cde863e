pub mod table_store;
pub mod workbook;

pub use table_store::{TableFormat, TableStore};
