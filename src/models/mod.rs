mod board;
mod thumbnail;
mod user;

pub use board::*;
pub use thumbnail::*;
pub use user::*;
