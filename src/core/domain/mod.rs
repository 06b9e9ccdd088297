//! Domain types.

mod recipient;
mod report;
mod user;

pub use recipient::Recipients;
pub use report::{Advisory, Drift, WalkReport};
pub use user::UserInfo;
