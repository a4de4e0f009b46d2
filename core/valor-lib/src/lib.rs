//! valor-lib：三線戰場（Legends of Valor）核心邏輯
//! - 8x8 棋盤、線道移動與傳送規則、範圍戰鬥、回合流程、怪物 AI。
//! - 資料載入、市場、存檔與畫面輸出皆為外部協作者，不在本 crate 範圍。
//! - 對外僅暴露型別化的戰鬥紀錄事件與每格符號查詢，渲染由呼叫端自理。
use serde::{Deserialize, Serialize};

mod action;
mod ai;
mod battle;
mod board;
mod error;
mod log;
mod spawn;
mod stats;
mod terrain;
mod unit;

pub use action::*;
pub use ai::*;
pub use battle::*;
pub use board::*;
pub use error::*;
pub use log::*;
pub use spawn::*;
pub use stats::*;
pub use terrain::*;
pub use unit::*;

pub type HeroID = u64;
pub type MonsterID = u64;
/// 線道編號：0 = TOP、1 = MID、2 = BOT
pub type Lane = usize;

#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}
