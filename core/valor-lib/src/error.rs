// 戰場核心錯誤型別，攜帶 function name 與 context。
// 只用於結構性違規（版面錯誤、覆寫佔位）；
// 被阻擋的行動（移動失敗、閃避、法力不足）一律以 bool/no-op 表示，不是錯誤。
use crate::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("`{func}`: 版面錯誤: {detail}")]
    InvalidLayout { func: &'static str, detail: String },

    #[error("`{func}`: 位置 {pos:?} 不在棋盤上")]
    OutOfBounds { func: &'static str, pos: Pos },

    #[error("`{func}`: 位置 {pos:?} 已被佔用")]
    PosOccupied { func: &'static str, pos: Pos },
}
