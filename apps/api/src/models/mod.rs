pub mod content;
pub mod feedback;
