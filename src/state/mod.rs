//! Controller state module

mod app_state;
mod forms;
mod notification;

pub use app_state::*;
pub use forms::*;
pub use notification::*;
