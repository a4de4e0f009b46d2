//! ai.rs：
//! - 怪物走位決策：優先南進逼近英雄主堡，受阻時同線道內側移，
//!   仍無路可走才北退一步。
//! - 側移順序隨機，避免整排怪物走出相同路徑。
use crate::*;
use rand::seq::SliceRandom;

/// 依優先序推進怪物一步；四個方向皆受阻時原地不動
pub fn advance_monster(board: &mut Board, id: MonsterID, rng: &mut impl rand::Rng) {
    // 首選：朝英雄主堡南進
    if move_monster(board, id, Direction::South) {
        return;
    }

    let Some(pos) = board.find_monster(id) else {
        return;
    };
    let Some(lane) = lane_of_col(pos.col) else {
        return;
    };

    let mut sides = [Direction::West, Direction::East];
    sides.shuffle(rng);
    for dir in sides {
        // 側移不得跨出線道
        let Some(to) = dir.step(pos) else {
            continue;
        };
        if lane_of_col(to.col) != Some(lane) {
            continue;
        }
        if move_monster(board, id, dir) {
            return;
        }
    }

    // 僅剩的退路：北退一步
    move_monster(board, id, Direction::North);
}
