mod artifact;
mod assist;
mod extraction;
mod interaction;
mod language;
mod settings;
mod task;

pub use artifact::*;
pub use assist::*;
pub use extraction::*;
pub use interaction::*;
pub use language::*;
pub use settings::*;
pub use task::*;
