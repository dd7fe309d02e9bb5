pub mod content;
pub mod dialog;
pub mod relation;
