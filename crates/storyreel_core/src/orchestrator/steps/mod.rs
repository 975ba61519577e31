//! Pipeline step implementations.

pub mod compose;
pub mod mix;
pub mod narrate;
pub mod probe;
pub mod render;

pub use compose::ComposeStep;
pub use mix::MixStep;
pub use narrate::NarrateStep;
pub use probe::ProbeStep;
pub use render::RenderStep;
