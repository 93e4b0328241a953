pub mod corpus;
pub mod document;

pub use corpus::*;
pub use document::*;
