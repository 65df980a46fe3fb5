pub mod errors;
pub mod pretty;
pub mod writer;

pub use errors::{OutputError, OutputResult};
pub use pretty::render_table;
pub use writer::{write_csv, write_stream, write_stream_file, write_table_file};
