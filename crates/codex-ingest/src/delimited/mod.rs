//! Character-separated sources.

mod reader;
mod sniff;

pub(crate) use reader::{DelimitedLayout, read_delimited};
pub use sniff::sniff_separator;
