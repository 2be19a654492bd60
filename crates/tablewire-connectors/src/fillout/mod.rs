pub mod client;
pub mod hooks;
pub mod ops;
pub mod options;
pub mod schema;

pub use client::FilloutClient;
pub use hooks::FilloutTrigger;
pub use ops::{Operation, execute};
