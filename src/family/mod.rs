mod person;
pub mod store;

pub use person::*;
pub use store::PersonStore;
