pub mod input_loader;

pub use input_loader::{load_items, parse_items};
