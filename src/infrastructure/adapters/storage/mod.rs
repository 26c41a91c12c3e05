pub mod in_memory_table_adapter;

pub use in_memory_table_adapter::{InMemoryTableAdapter, TableWriteStats};
