pub mod definition;
pub mod session;
mod settings;

pub use self::definition::{Catalog, Question, Subject};
pub use self::session::{EndReason, Score, Session};
pub use self::settings::Settings;
