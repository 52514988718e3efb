pub mod enums;
pub mod conversation;
pub mod time_context;

pub use conversation::Turn;
pub use enums::*;
pub use time_context::TimeContext;
