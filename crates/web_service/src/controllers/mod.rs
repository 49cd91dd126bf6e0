pub mod chat_controller;
pub mod library_controller;
