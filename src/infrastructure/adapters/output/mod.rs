pub mod rest_table_adapter;

pub use rest_table_adapter::{RestTableAdapter, RestTableConfig};
