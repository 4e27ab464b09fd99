//! Document analysis: prompt construction, model completion and response
//! structuring.

pub mod completion;
pub mod prompt;
pub mod structurer;

pub use completion::CompletionClient;
pub use structurer::structure;
