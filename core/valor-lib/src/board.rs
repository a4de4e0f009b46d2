//! board.rs：
//! - 定義棋盤（Board）、格子（Tile）、格子類型（CellType）與方向（Direction）。
//! - 負責線道/主堡幾何查詢、佔位搬移、單位掃描定位與勝負判定。
//! - 不負責移動合法性（action/movement.rs）與戰鬥判定（action/combat.rs）。
use crate::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter};

pub const ROWS: usize = 8;
pub const COLS: usize = 8;
pub const LANE_COUNT: usize = 3;

// 固定牆壁欄位，把棋盤切成三條線道
const WALL_COLS: [usize; 2] = [2, 5];

// 每條線道對應的兩個欄位
const LANE_COLS: [[usize; 2]; LANE_COUNT] = [[0, 1], [3, 4], [6, 7]];

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Display, EnumIter, PartialEq, Eq)]
pub enum CellType {
    // 特殊格
    Nexus,
    Inaccessible,
    Obstacle,
    // 線道地形格
    Plain,
    Bush,
    Cave,
    Koulou,
}

impl CellType {
    /// 單位是否允許進入此類型的格子
    pub fn is_accessible(self) -> bool {
        !matches!(self, CellType::Inaccessible | CellType::Obstacle)
    }

    /// 是否提供地形加成（見 terrain.rs）
    pub fn has_terrain_bonus(self) -> bool {
        matches!(self, CellType::Bush | CellType::Cave | CellType::Koulou)
    }

    /// 渲染用符號，佔位符號由 Board::symbol_at 決定
    pub fn symbol(self) -> char {
        match self {
            CellType::Nexus => 'N',
            CellType::Inaccessible => 'X',
            CellType::Obstacle => 'O',
            CellType::Plain => '.',
            CellType::Bush => 'B',
            CellType::Cave => 'C',
            CellType::Koulou => 'K',
        }
    }
}

/// 四方向移動。列數向下遞增：North 朝怪物主堡（row - 1），South 朝英雄主堡（row + 1）。
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Display, EnumIter, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
        }
    }

    /// 由 from 往此方向走一步；出界回傳 None
    pub fn step(self, from: Pos) -> Option<Pos> {
        let (dr, dc) = self.delta();
        let row = from.row as isize + dr;
        let col = from.col as isize + dc;
        if row < 0 || col < 0 || row as usize >= ROWS || col as usize >= COLS {
            return None;
        }
        Some(Pos {
            row: row as usize,
            col: col as usize,
        })
    }
}

/// 棋盤上的一格：固定類型 + 每陣營至多一個佔位者。
/// Tile 只記錄佔位 id，不擁有單位本體（單位存活於 Board 的 map）。
#[derive(Debug, Clone)]
pub struct Tile {
    cell: CellType,
    hero: Option<HeroID>,
    monster: Option<MonsterID>,
}

impl Tile {
    pub fn new(cell: CellType) -> Self {
        Tile {
            cell,
            hero: None,
            monster: None,
        }
    }

    pub fn cell(&self) -> CellType {
        self.cell
    }

    /// 變更格子類型（例如移除障礙物後設回 Plain）。
    /// 地形行為是 cell 的純函式，換類型即換行為。
    pub fn set_cell(&mut self, cell: CellType) {
        self.cell = cell;
    }

    pub fn hero(&self) -> Option<HeroID> {
        self.hero
    }

    pub fn monster(&self) -> Option<MonsterID> {
        self.monster
    }

    /// 英雄可否合法佔據此格（可進入且無其他英雄；怪物在場不阻擋）
    pub fn is_empty_for_hero(&self) -> bool {
        self.cell.is_accessible() && self.hero.is_none()
    }

    pub fn is_empty_for_monster(&self) -> bool {
        self.cell.is_accessible() && self.monster.is_none()
    }

    /// 放置英雄；同格已有英雄時回傳錯誤，絕不靜默覆寫
    pub fn place_hero(&mut self, id: HeroID, pos: Pos) -> Result<(), Error> {
        let func = "Tile::place_hero";
        if self.hero.is_some() {
            return Err(Error::PosOccupied { func, pos });
        }
        self.hero = Some(id);
        Ok(())
    }

    pub fn remove_hero(&mut self) {
        self.hero = None;
    }

    pub fn place_monster(&mut self, id: MonsterID, pos: Pos) -> Result<(), Error> {
        let func = "Tile::place_monster";
        if self.monster.is_some() {
            return Err(Error::PosOccupied { func, pos });
        }
        self.monster = Some(id);
        Ok(())
    }

    pub fn remove_monster(&mut self) {
        self.monster = None;
    }
}

/// 8x8 戰場。持有格子與兩陣營單位；單位位置不存在單位身上，
/// 一律以棋盤掃描取得（單一事實來源，無法產生雙狀態漂移）。
#[derive(Debug, Default)]
pub struct Board {
    tiles: Vec<Vec<Tile>>,
    pub heroes: BTreeMap<HeroID, Hero>,
    pub monsters: BTreeMap<MonsterID, Monster>,
}

impl Board {
    /// 產生初始版面：牆壁、主堡列與加權隨機線道地形
    pub fn generate(rng: &mut impl rand::Rng) -> Self {
        let mut tiles = Vec::with_capacity(ROWS);
        for row in 0..ROWS {
            let mut line = Vec::with_capacity(COLS);
            for col in 0..COLS {
                let cell = if is_wall_col(col) {
                    CellType::Inaccessible
                } else if is_nexus_row(row) {
                    CellType::Nexus
                } else {
                    random_lane_cell(rng)
                };
                line.push(Tile::new(cell));
            }
            tiles.push(line);
        }
        Board {
            tiles,
            heroes: BTreeMap::new(),
            monsters: BTreeMap::new(),
        }
    }

    /// 從指定版面建立棋盤，驗證尺寸與固定結構（牆壁欄、主堡列）。
    /// 測試與外部資料來源使用。
    pub fn from_cells(cells: Vec<Vec<CellType>>) -> Result<Self, Error> {
        let func = "Board::from_cells";

        if cells.len() != ROWS || cells.iter().any(|row| row.len() != COLS) {
            return Err(Error::InvalidLayout {
                func,
                detail: format!("版面必須是 {ROWS}x{COLS}"),
            });
        }
        for (row, line) in cells.iter().enumerate() {
            for (col, &cell) in line.iter().enumerate() {
                if is_wall_col(col) && cell != CellType::Inaccessible {
                    return Err(Error::InvalidLayout {
                        func,
                        detail: format!("({row},{col}) 應為牆壁欄"),
                    });
                }
                if !is_wall_col(col) && is_nexus_row(row) && cell != CellType::Nexus {
                    return Err(Error::InvalidLayout {
                        func,
                        detail: format!("({row},{col}) 應為主堡格"),
                    });
                }
            }
        }

        let tiles = cells
            .into_iter()
            .map(|line| line.into_iter().map(Tile::new).collect())
            .collect();
        Ok(Board {
            tiles,
            heroes: BTreeMap::new(),
            monsters: BTreeMap::new(),
        })
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row < ROWS && pos.col < COLS
    }

    pub fn get_tile(&self, pos: Pos) -> Option<&Tile> {
        self.tiles.get(pos.row)?.get(pos.col)
    }

    pub fn get_tile_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        self.tiles.get_mut(pos.row)?.get_mut(pos.col)
    }

    /// 欄位所屬線道；牆壁欄回傳 None
    pub fn lane_of_col(&self, col: usize) -> Option<Lane> {
        lane_of_col(col)
    }

    /// 線道對應的兩個欄位（主堡欄與線道欄相同）
    pub fn nexus_columns_for_lane(&self, lane: Lane) -> [usize; 2] {
        LANE_COLS[lane]
    }

    /// 英雄預設出生格：該線道主堡列的第一欄
    pub fn hero_spawn_cell(&self, lane: Lane) -> Pos {
        Pos {
            row: ROWS - 1,
            col: LANE_COLS[lane][0],
        }
    }

    /// 怪物預設出生格：該線道頂列的第二欄
    pub fn monster_spawn_cell(&self, lane: Lane) -> Pos {
        Pos {
            row: 0,
            col: LANE_COLS[lane][1],
        }
    }

    pub fn can_hero_enter(&self, pos: Pos) -> bool {
        self.get_tile(pos).is_some_and(|t| t.is_empty_for_hero())
    }

    pub fn can_monster_enter(&self, pos: Pos) -> bool {
        self.get_tile(pos).is_some_and(|t| t.is_empty_for_monster())
    }

    /// 無條件搬移英雄佔位（合法性由呼叫端負責）
    pub fn relocate_hero(&mut self, from: Pos, to: Pos) -> Result<(), Error> {
        let func = "Board::relocate_hero";

        let id = self
            .get_tile(from)
            .and_then(|t| t.hero())
            .ok_or(Error::OutOfBounds { func, pos: from })?;
        // 先確認目的格存在且空位，失敗時來源格不動
        let dest = self
            .get_tile(to)
            .ok_or(Error::OutOfBounds { func, pos: to })?;
        if dest.hero().is_some() {
            return Err(Error::PosOccupied { func, pos: to });
        }
        if let Some(t) = self.get_tile_mut(from) {
            t.remove_hero();
        }
        match self.get_tile_mut(to) {
            Some(t) => t.place_hero(id, to),
            None => Err(Error::OutOfBounds { func, pos: to }),
        }
    }

    pub fn relocate_monster(&mut self, from: Pos, to: Pos) -> Result<(), Error> {
        let func = "Board::relocate_monster";

        let id = self
            .get_tile(from)
            .and_then(|t| t.monster())
            .ok_or(Error::OutOfBounds { func, pos: from })?;
        let dest = self
            .get_tile(to)
            .ok_or(Error::OutOfBounds { func, pos: to })?;
        if dest.monster().is_some() {
            return Err(Error::PosOccupied { func, pos: to });
        }
        if let Some(t) = self.get_tile_mut(from) {
            t.remove_monster();
        }
        match self.get_tile_mut(to) {
            Some(t) => t.place_monster(id, to),
            None => Err(Error::OutOfBounds { func, pos: to }),
        }
    }

    /// 掃描棋盤尋找英雄位置；不在場（陣亡待重生）回傳 None
    pub fn find_hero(&self, id: HeroID) -> Option<Pos> {
        for row in 0..ROWS {
            for col in 0..COLS {
                let pos = Pos { row, col };
                if self.get_tile(pos)?.hero() == Some(id) {
                    return Some(pos);
                }
            }
        }
        None
    }

    pub fn find_monster(&self, id: MonsterID) -> Option<Pos> {
        for row in 0..ROWS {
            for col in 0..COLS {
                let pos = Pos { row, col };
                if self.get_tile(pos)?.monster() == Some(id) {
                    return Some(pos);
                }
            }
        }
        None
    }

    /// 指定格上存活英雄的 id（佔位存在且 HP > 0）
    pub fn living_hero_at(&self, pos: Pos) -> Option<HeroID> {
        let id = self.get_tile(pos)?.hero()?;
        self.heroes.get(&id).filter(|h| h.is_alive()).map(|_| id)
    }

    pub fn living_monster_at(&self, pos: Pos) -> Option<MonsterID> {
        let id = self.get_tile(pos)?.monster()?;
        self.monsters.get(&id).filter(|m| m.is_alive()).map(|_| id)
    }

    /// 英雄獲勝：任一英雄佔據怪物主堡列（row 0）
    pub fn heroes_reached_enemy_nexus(&self) -> bool {
        (0..COLS).any(|col| {
            self.get_tile(Pos { row: 0, col })
                .is_some_and(|t| t.hero().is_some())
        })
    }

    /// 怪物獲勝：任一怪物佔據英雄主堡列（row 7）
    pub fn monsters_reached_heroes_nexus(&self) -> bool {
        (0..COLS).any(|col| {
            self.get_tile(Pos { row: ROWS - 1, col })
                .is_some_and(|t| t.monster().is_some())
        })
    }

    /// 渲染介面：單格符號。佔位優先於地形，英雄與怪物同格顯示 '*'。
    pub fn symbol_at(&self, pos: Pos) -> char {
        let Some(tile) = self.get_tile(pos) else {
            return '?';
        };
        match (tile.hero(), tile.monster()) {
            (Some(_), Some(_)) => '*',
            (Some(_), None) => 'H',
            (None, Some(_)) => 'M',
            (None, None) => tile.cell().symbol(),
        }
    }
}

pub fn is_wall_col(col: usize) -> bool {
    WALL_COLS.contains(&col)
}

pub fn is_nexus_row(row: usize) -> bool {
    row == 0 || row == ROWS - 1
}

pub fn lane_of_col(col: usize) -> Option<Lane> {
    LANE_COLS.iter().position(|cols| cols.contains(&col))
}

/// 線道顯示名稱
pub fn lane_label(lane: Lane) -> &'static str {
    match lane {
        0 => "TOP",
        1 => "MID",
        2 => "BOT",
        _ => "-",
    }
}

use inner::*;
mod inner {
    use super::*;

    /// 加權抽選線道地形：20 取 8 平原、4 草叢、4 洞穴、3 丘陵、1 障礙
    pub fn random_lane_cell(rng: &mut impl rand::Rng) -> CellType {
        let v = rng.random_range(0..20);
        if v < 8 {
            CellType::Plain
        } else if v < 12 {
            CellType::Bush
        } else if v < 16 {
            CellType::Cave
        } else if v < 19 {
            CellType::Koulou
        } else {
            CellType::Obstacle
        }
    }
}

/// 測試用：全平原線道的標準版面
#[cfg(test)]
pub(crate) fn plain_board() -> Board {
    let cells = (0..ROWS)
        .map(|row| {
            (0..COLS)
                .map(|col| {
                    if is_wall_col(col) {
                        CellType::Inaccessible
                    } else if is_nexus_row(row) {
                        CellType::Nexus
                    } else {
                        CellType::Plain
                    }
                })
                .collect()
        })
        .collect();
    Board::from_cells(cells).unwrap()
}
