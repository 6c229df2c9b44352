pub mod logging;

pub use logging::{format_keywords, truncate_text};
