pub mod outline_parser;

pub use outline_parser::{parse_item, parse_outline, ItemFields, OutlineOptions};
