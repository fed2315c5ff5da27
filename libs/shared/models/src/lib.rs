pub mod clinical;
pub mod error;
