pub mod agent;
pub mod confidence;
pub mod error;
pub mod loader;
pub mod models;
pub mod prober;
pub mod report;
pub mod scan;

// Re-export commonly used items
pub use confidence::*;
pub use error::*;
pub use models::*;
pub use scan::*;
