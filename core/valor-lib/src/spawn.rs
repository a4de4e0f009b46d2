//! spawn.rs：
//! - 開局英雄落位（線道主堡列，首欄佔用時退次欄）。
//! - 週期性怪物增援：每線道至多一隻，出生格被佔則跳過。
//! - 怪物資料由 MonsterProvider 供應，id 由 IdGenerator 發放。
use crate::*;
use rand::seq::SliceRandom;

/// 怪物資料來源。party_level 為隊伍最高等級，count 為本波需求數。
pub trait MonsterProvider {
    fn generate_monsters(&mut self, party_level: u32, count: usize) -> Vec<MonsterTemplate>;
}

/// 單調遞增的單位 id 發放器
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

/// 預設落位策略：依隊伍順序分派線道（第四人起擠在 BOT）
pub fn place_heroes(board: &mut Board, party: &[HeroID], log: &mut CombatLog) -> bool {
    party
        .iter()
        .enumerate()
        .all(|(i, &id)| place_hero_in_lane(board, id, i.min(LANE_COUNT - 1), log))
}

/// 依指定線道落位
pub fn place_heroes_with_lanes(
    board: &mut Board,
    assignments: &[(HeroID, Lane)],
    log: &mut CombatLog,
) -> bool {
    assignments
        .iter()
        .all(|&(id, lane)| place_hero_in_lane(board, id, lane, log))
}

/// 將英雄放進線道主堡列：首欄被佔退次欄，兩欄皆滿回傳 false
pub fn place_hero_in_lane(board: &mut Board, id: HeroID, lane: Lane, log: &mut CombatLog) -> bool {
    let lane = if lane < LANE_COUNT { lane } else { 1 };
    let primary = board.hero_spawn_cell(lane);
    let dest = [primary.col, board.nexus_columns_for_lane(lane)[1]]
        .into_iter()
        .map(|col| Pos {
            row: primary.row,
            col,
        })
        .find(|&pos| board.can_hero_enter(pos));
    let Some(pos) = dest else {
        return false;
    };

    let placed = board
        .get_tile_mut(pos)
        .map(|t| t.place_hero(id, pos).is_ok())
        .unwrap_or(false);
    if placed {
        if let Some(hero) = board.heroes.get(&id) {
            log.info(format!(
                "{} 進駐 {} 線道 ({},{})",
                hero.name,
                lane_label(lane),
                pos.row,
                pos.col
            ));
        }
    }
    placed
}

/// 每線道生出一隻怪物。供應不足或出生格被佔的線道跳過。
/// 回傳實際生出的怪物 id。
pub fn spawn_lane_monsters(
    board: &mut Board,
    provider: &mut impl MonsterProvider,
    ids: &mut IdGenerator,
    log: &mut CombatLog,
    rng: &mut impl rand::Rng,
) -> Vec<MonsterID> {
    let party_level = board.heroes.values().map(|h| h.level).max().unwrap_or(1);
    let mut pool = provider.generate_monsters(party_level, LANE_COUNT);
    // 打散供應順序，避免每波線道拿到固定怪物
    pool.shuffle(rng);

    let mut spawned = vec![];
    let mut pool = pool.into_iter();
    for lane in 0..LANE_COUNT {
        let pos = board.monster_spawn_cell(lane);
        if !board.can_monster_enter(pos) {
            continue;
        }
        let Some(template) = pool.next() else {
            break;
        };

        let id = ids.next_id();
        let monster = Monster::from_template(&template);
        let name = monster.name.clone();
        board.monsters.insert(id, monster);
        let placed = board
            .get_tile_mut(pos)
            .map(|t| t.place_monster(id, pos).is_ok())
            .unwrap_or(false);
        if placed {
            log.info(format!(
                "{} 出現在 {} 線道 ({},{})",
                name,
                lane_label(lane),
                pos.row,
                pos.col
            ));
            spawned.push(id);
        } else {
            board.monsters.remove(&id);
        }
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct FixedProvider {
        templates: Vec<MonsterTemplate>,
    }

    impl MonsterProvider for FixedProvider {
        fn generate_monsters(&mut self, _party_level: u32, count: usize) -> Vec<MonsterTemplate> {
            self.templates.iter().take(count).cloned().collect()
        }
    }

    fn provider(count: usize) -> FixedProvider {
        let templates = (0..count)
            .map(|i| MonsterTemplate {
                name: format!("Monster-{i}"),
                level: 3,
                hp: 300.0,
                damage: 300.0,
                defense: 400.0,
                dodge_chance: 0.35,
            })
            .collect();
        FixedProvider { templates }
    }

    #[test]
    fn test_place_heroes_by_index() {
        let mut board = crate::board::plain_board();
        for id in 1..=3 {
            board.heroes.insert(id, crate::unit::sample_hero());
        }
        let mut log = CombatLog::new();

        assert!(place_heroes(&mut board, &[1, 2, 3], &mut log));
        assert_eq!(board.find_hero(1), Some(Pos { row: 7, col: 0 }));
        assert_eq!(board.find_hero(2), Some(Pos { row: 7, col: 3 }));
        assert_eq!(board.find_hero(3), Some(Pos { row: 7, col: 6 }));
    }

    #[test]
    fn test_place_hero_falls_back_to_alternate_column() {
        let mut board = crate::board::plain_board();
        for id in 1..=3 {
            board.heroes.insert(id, crate::unit::sample_hero());
        }
        let mut log = CombatLog::new();

        assert!(place_hero_in_lane(&mut board, 1, 0, &mut log));
        assert!(place_hero_in_lane(&mut board, 2, 0, &mut log));
        assert_eq!(board.find_hero(2), Some(Pos { row: 7, col: 1 }));
        // 兩欄皆滿
        assert!(!place_hero_in_lane(&mut board, 3, 0, &mut log));
        assert_eq!(board.find_hero(3), None);
    }

    #[test]
    fn test_spawn_one_monster_per_lane() {
        let mut board = crate::board::plain_board();
        let mut ids = IdGenerator::new();
        let mut log = CombatLog::new();
        let mut rng = StdRng::seed_from_u64(1);

        let spawned =
            spawn_lane_monsters(&mut board, &mut provider(3), &mut ids, &mut log, &mut rng);
        assert_eq!(spawned.len(), 3);
        for lane in 0..LANE_COUNT {
            let pos = board.monster_spawn_cell(lane);
            assert!(board.get_tile(pos).unwrap().monster().is_some(), "{lane} 線道應有怪物");
        }
    }

    #[test]
    fn test_spawn_skips_occupied_cell() {
        let mut board = crate::board::plain_board();
        let mut ids = IdGenerator::new();
        let mut log = CombatLog::new();
        let mut rng = StdRng::seed_from_u64(1);

        // 第一波佔住全部出生格
        spawn_lane_monsters(&mut board, &mut provider(3), &mut ids, &mut log, &mut rng);
        let second =
            spawn_lane_monsters(&mut board, &mut provider(3), &mut ids, &mut log, &mut rng);
        assert!(second.is_empty(), "出生格被佔時跳過");
        assert_eq!(board.monsters.len(), 3);
    }

    #[test]
    fn test_spawn_with_short_supply() {
        let mut board = crate::board::plain_board();
        let mut ids = IdGenerator::new();
        let mut log = CombatLog::new();
        let mut rng = StdRng::seed_from_u64(1);

        let spawned =
            spawn_lane_monsters(&mut board, &mut provider(1), &mut ids, &mut log, &mut rng);
        assert_eq!(spawned.len(), 1);
        assert_eq!(board.monsters.len(), 1);
    }
}
