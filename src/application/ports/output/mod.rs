pub mod notice_port;
pub mod table_port;
