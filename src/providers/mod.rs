//! Counter source implementations

mod scripted;
mod system;

pub use scripted::ScriptedCounters;
pub use system::SystemCounters;
