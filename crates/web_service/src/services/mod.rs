pub mod ui_stream_builder;

pub use ui_stream_builder::{spawn_ui_stream, ResponseBudget};
