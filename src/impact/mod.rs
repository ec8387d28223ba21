pub mod errors;
pub mod keys;
pub mod resolver;

pub use errors::ImpactError;
pub use keys::ChangeKeys;
pub use resolver::{resolve, Impact};
