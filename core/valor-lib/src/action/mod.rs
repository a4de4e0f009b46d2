//! action：單位在棋盤上的主動行為。
//! - movement：走位、傳送、回城與障礙排除。
//! - combat：範圍查詢、普攻與施法。
mod combat;
mod movement;

pub use combat::*;
pub use movement::*;
