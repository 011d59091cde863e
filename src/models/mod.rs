pub mod item;
pub mod loaders;
pub mod payload;
pub mod record;
pub mod table;

pub use item::{CardKind, LearningItem};
pub use loaders::load_items;
pub use payload::{ChunkPayload, PayloadEntry};
pub use record::{GeneratedRecord, GenerationReply, COLUMNS};
pub use table::ResultTable;
