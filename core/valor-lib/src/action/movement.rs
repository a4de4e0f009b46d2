//! movement.rs：
//! - 英雄與怪物的單步走位，含線道「不可繞過」規則。
//! - 傳送（跨線道落點限制）、回城與障礙排除。
//! - 英雄換格時觸發地形離開/進入效果（terrain.rs）。
use crate::*;

/// 英雄往 dir 走一步。出界、不可進入、或會繞過線道上
/// 尚存活的怪物時回傳 false。
pub fn move_hero(board: &mut Board, id: HeroID, dir: Direction, log: &mut CombatLog) -> bool {
    let Some(from) = board.find_hero(id) else {
        return false;
    };
    let Some(to) = dir.step(from) else {
        return false;
    };
    if !board.can_hero_enter(to) {
        return false;
    }
    if would_hero_bypass_monster(board, from, to) {
        return false;
    }
    relocate_hero_with_terrain(board, id, from, to, log)
}

/// 怪物往 dir 走一步；不可繞過身後尚存活的英雄。
/// 怪物不受地形加成，無進出效果。
pub fn move_monster(board: &mut Board, id: MonsterID, dir: Direction) -> bool {
    let Some(from) = board.find_monster(id) else {
        return false;
    };
    let Some(to) = dir.step(from) else {
        return false;
    };
    if !board.can_monster_enter(to) {
        return false;
    }
    if would_monster_bypass_hero(board, from, to) {
        return false;
    }
    board.relocate_monster(from, to).is_ok()
}

/// 英雄由 from 到 to 是否繞過同線道最近的存活怪物。
/// 任一端不在線道欄上視為違規。
pub fn would_hero_bypass_monster(board: &Board, from: Pos, to: Pos) -> bool {
    let (Some(lane_from), Some(lane_to)) = (lane_of_col(from.col), lane_of_col(to.col)) else {
        return true;
    };
    // 規則只約束同一線道內的走位
    if lane_from != lane_to {
        return false;
    }
    match closest_blocking_monster_row(board, from.row, lane_from) {
        Some(block) => to.row < block,
        None => false,
    }
}

pub fn would_monster_bypass_hero(board: &Board, from: Pos, to: Pos) -> bool {
    let (Some(lane_from), Some(lane_to)) = (lane_of_col(from.col), lane_of_col(to.col)) else {
        return true;
    };
    if lane_from != lane_to {
        return false;
    }
    match closest_blocking_hero_row(board, from.row, lane_from) {
        Some(block) => to.row > block,
        None => false,
    }
}

/// 英雄可否合法傳送到 to（只檢查，不執行）。
/// 同線道比照走位的繞過規則；跨線道不得落在
/// 目標線道推進最深的存活怪物之前。
pub fn can_teleport_hero_to(board: &Board, id: HeroID, to: Pos) -> bool {
    let Some(from) = board.find_hero(id) else {
        return false;
    };
    if !board.can_hero_enter(to) {
        return false;
    }
    let (Some(lane_from), Some(lane_to)) = (lane_of_col(from.col), lane_of_col(to.col)) else {
        return false;
    };
    if lane_from == lane_to {
        return !would_hero_bypass_monster(board, from, to);
    }
    match closest_blocking_monster_row(board, ROWS, lane_to) {
        Some(front) => to.row >= front,
        None => true,
    }
}

/// 執行傳送：先以 can_teleport_hero_to 檢查，再搬移並觸發地形效果
pub fn teleport_hero_to(board: &mut Board, id: HeroID, to: Pos, log: &mut CombatLog) -> bool {
    if !can_teleport_hero_to(board, id, to) {
        return false;
    }
    let Some(from) = board.find_hero(id) else {
        return false;
    };
    relocate_hero_with_terrain(board, id, from, to, log)
}

/// 列出傳送到 target 英雄身旁的合法落點：
/// target 的四鄰格中，不在 target 前方（row 不得更小）且通過
/// 傳送檢查者。target 與自身同線道時無合法落點。
pub fn teleport_candidates(board: &Board, id: HeroID, target: HeroID) -> Vec<Pos> {
    let (Some(my_pos), Some(target_pos)) = (board.find_hero(id), board.find_hero(target)) else {
        return vec![];
    };
    if lane_of_col(my_pos.col) == lane_of_col(target_pos.col) {
        return vec![];
    }

    [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ]
    .into_iter()
    .filter_map(|dir| dir.step(target_pos))
    .filter(|&pos| lane_of_col(pos.col).is_some())
    .filter(|&pos| pos.row >= target_pos.row)
    .filter(|&pos| can_teleport_hero_to(board, id, pos))
    .collect()
}

/// 回城：傳回原屬線道主堡列，首選欄被佔時退而求次欄。
/// 兩欄皆被佔時失敗。
pub fn recall_hero(board: &mut Board, id: HeroID, home_lane: Lane, log: &mut CombatLog) -> bool {
    let Some(from) = board.find_hero(id) else {
        return false;
    };
    let row = ROWS - 1;
    let dest = board
        .nexus_columns_for_lane(home_lane)
        .into_iter()
        .map(|col| Pos { row, col })
        .find(|&pos| board.can_hero_enter(pos));
    let Some(to) = dest else {
        return false;
    };
    if !relocate_hero_with_terrain(board, id, from, to, log) {
        return false;
    }
    if let Some(hero) = board.heroes.get(&id) {
        log.info(format!("{} 回到主堡", hero.name));
    }
    true
}

/// 排除英雄相鄰一格的障礙物，格子變回平原
pub fn remove_obstacle(board: &mut Board, id: HeroID, dir: Direction) -> bool {
    let Some(from) = board.find_hero(id) else {
        return false;
    };
    let Some(target) = dir.step(from) else {
        return false;
    };
    let Some(tile) = board.get_tile_mut(target) else {
        return false;
    };
    if tile.cell() != CellType::Obstacle {
        return false;
    }
    tile.set_cell(CellType::Plain);
    true
}

use inner::*;
mod inner {
    use super::*;

    /// 線道內 referenceRow 之前（row 較小）推進最深的存活怪物列。
    /// 傳入 ROWS 可取得全線道最前緣。
    pub fn closest_blocking_monster_row(
        board: &Board,
        reference_row: usize,
        lane: Lane,
    ) -> Option<usize> {
        board
            .nexus_columns_for_lane(lane)
            .into_iter()
            .flat_map(|col| (0..ROWS).map(move |row| Pos { row, col }))
            .filter(|&pos| board.living_monster_at(pos).is_some())
            .map(|pos| pos.row)
            .filter(|&row| row < reference_row)
            .max()
    }

    /// 線道內 referenceRow 之後（row 較大）最近的存活英雄列
    pub fn closest_blocking_hero_row(
        board: &Board,
        reference_row: usize,
        lane: Lane,
    ) -> Option<usize> {
        board
            .nexus_columns_for_lane(lane)
            .into_iter()
            .flat_map(|col| (0..ROWS).map(move |row| Pos { row, col }))
            .filter(|&pos| board.living_hero_at(pos).is_some())
            .map(|pos| pos.row)
            .filter(|&row| row > reference_row)
            .min()
    }

    /// 搬移英雄並維持地形加成一致：離開舊格還原、進入新格套用
    pub fn relocate_hero_with_terrain(
        board: &mut Board,
        id: HeroID,
        from: Pos,
        to: Pos,
        log: &mut CombatLog,
    ) -> bool {
        let (Some(from_cell), Some(to_cell)) = (
            board.get_tile(from).map(|t| t.cell()),
            board.get_tile(to).map(|t| t.cell()),
        ) else {
            return false;
        };
        if board.relocate_hero(from, to).is_err() {
            return false;
        }
        if let Some(hero) = board.heroes.get_mut(&id) {
            revert_exit_bonus(from_cell, hero, log);
            apply_enter_bonus(to_cell, hero, log);
        }
        true
    }
}
