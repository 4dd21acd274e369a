//! Configuration readers.

mod file;
mod reader;

pub use file::FileReader;
pub use reader::ConfigReader;
pub(crate) use reader::read_isolated;
