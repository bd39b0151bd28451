mod analytics_handler;

pub use analytics_handler::{__path_get_summary, get_summary};
