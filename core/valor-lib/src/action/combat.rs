//! combat.rs：
//! - 範圍查詢：自身格加周圍八格（Chebyshev 距離 1 以內）。
//! - 英雄普攻、怪物普攻與施法，含閃避、減益與擊殺清理。
//! - 戰績記帳與戰鬥事件皆在此落帳。
use crate::*;

pub const MONSTER_DAMAGE_FACTOR: f64 = 0.30;
pub const DEBUFF_PCT: f64 = 0.10;
pub const DEX_SPELL_SCALE_DIVISOR: f64 = 10000.0;

// 射程：自身格 + 八鄰格
const RANGE_OFFSETS: [(isize, isize); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 英雄射程內的存活怪物，依掃描順序排列
pub fn monsters_in_range(board: &Board, hero: HeroID) -> Vec<MonsterID> {
    let Some(pos) = board.find_hero(hero) else {
        return vec![];
    };
    cells_in_range(pos)
        .filter_map(|p| board.living_monster_at(p))
        .collect()
}

/// 怪物射程內的存活英雄，依掃描順序排列
pub fn heroes_in_range(board: &Board, monster: MonsterID) -> Vec<HeroID> {
    let Some(pos) = board.find_monster(monster) else {
        return vec![];
    };
    cells_in_range(pos)
        .filter_map(|p| board.living_hero_at(p))
        .collect()
}

/// 英雄普攻。回傳是否擊殺目標；閃避或目標已亡回傳 false。
pub fn hero_attack(
    board: &mut Board,
    hero: HeroID,
    monster: MonsterID,
    lane_monsters: &mut Vec<MonsterID>,
    log: &mut CombatLog,
    stats: &mut GameStats,
    rng: &mut impl rand::Rng,
) -> bool {
    let Some(h) = board.heroes.get(&hero) else {
        return false;
    };
    let hero_name = h.name.clone();
    let damage = h.attack_damage();

    let Some(m) = board.monsters.get_mut(&monster) else {
        return false;
    };
    if !m.is_alive() {
        return false;
    }
    // 閃避判定先於傷害
    if roll_dodge(m.dodge_chance, rng) {
        log.dodge(&m.name, m.dodge_chance);
        return false;
    }

    let hp_before = m.hp;
    m.take_damage(damage);
    let hp_after = m.hp;
    let slain = !m.is_alive();
    let monster_name = m.name.clone();

    stats.stats_mut(hero).damage_dealt += damage;
    log.push(LogEvent::HeroAttack {
        hero: hero_name,
        monster: monster_name.clone(),
        damage,
        hp_before,
        hp_after,
    });

    if slain {
        stats.stats_mut(hero).kills += 1;
        log.push(LogEvent::MonsterSlain {
            monster: monster_name,
        });
        remove_slain_monster(board, monster, lane_monsters);
    }
    slain
}

/// 怪物普攻。回傳英雄是否倒地。
pub fn monster_attack(
    board: &mut Board,
    monster: MonsterID,
    hero: HeroID,
    log: &mut CombatLog,
    stats: &mut GameStats,
    rng: &mut impl rand::Rng,
) -> bool {
    let Some(m) = board.monsters.get(&monster) else {
        return false;
    };
    let monster_name = m.name.clone();
    // 怪物傷害 = 原始傷害值 x 0.30，四捨五入
    let damage = (m.damage * MONSTER_DAMAGE_FACTOR).round();

    let Some(h) = board.heroes.get_mut(&hero) else {
        return false;
    };
    if !h.is_alive() {
        return false;
    }
    if roll_dodge(h.dodge_chance(), rng) {
        let chance = h.dodge_chance();
        log.dodge(&h.name, chance);
        return false;
    }

    let hp_before = h.hp;
    h.take_damage(damage);
    let hp_after = h.hp;
    let fallen = !h.is_alive();
    let hero_name = h.name.clone();

    // 統計與記錄皆取減免前傷害，護甲效果反映在 HP 差
    stats.stats_mut(hero).damage_taken += damage;
    log.push(LogEvent::MonsterAttack {
        monster: monster_name,
        hero: hero_name.clone(),
        damage,
        hp_before,
        hp_after,
    });

    if fallen {
        stats.stats_mut(hero).faints += 1;
        log.push(LogEvent::HeroFallen { hero: hero_name });
        // 倒地英雄離場，等待回合結束重生
        if let Some(pos) = board.find_hero(hero) {
            if let Some(t) = board.get_tile_mut(pos) {
                t.remove_hero();
            }
        }
    }
    fallen
}

/// 英雄施法。回傳行動是否被消耗：目標不在射程或法力不足時
/// 回傳 false；法力一經扣除（含被閃避）即視為消耗。
pub fn hero_cast_spell(
    board: &mut Board,
    hero: HeroID,
    spell: &Spell,
    target: MonsterID,
    lane_monsters: &mut Vec<MonsterID>,
    log: &mut CombatLog,
    stats: &mut GameStats,
    rng: &mut impl rand::Rng,
) -> bool {
    if !monsters_in_range(board, hero).contains(&target) {
        return false;
    }
    let Some(h) = board.heroes.get_mut(&hero) else {
        return false;
    };
    if !h.is_alive() || !h.can_cast(spell) {
        return false;
    }
    // 施放既成立即扣法力，之後的閃避不退費
    h.spend_mana(spell.mana_cost);
    let hero_name = h.name.clone();
    let dexterity = h.dexterity;

    let Some(m) = board.monsters.get_mut(&target) else {
        return false;
    };
    if roll_dodge(m.dodge_chance, rng) {
        log.dodge(&m.name, m.dodge_chance);
        return true;
    }

    let damage = spell_damage(dexterity, spell);
    // 減益先於傷害結算
    apply_spell_effect(spell, m, log);

    let m = match board.monsters.get_mut(&target) {
        Some(m) => m,
        None => return true,
    };
    let hp_before = m.hp;
    m.take_damage(damage);
    let hp_after = m.hp;
    let slain = !m.is_alive();
    let monster_name = m.name.clone();

    stats.stats_mut(hero).damage_dealt += damage;
    log.push(LogEvent::SpellCast {
        hero: hero_name,
        spell: spell.name.clone(),
        monster: monster_name.clone(),
        damage,
        hp_before,
        hp_after,
    });

    if slain {
        stats.stats_mut(hero).kills += 1;
        log.push(LogEvent::MonsterSlain {
            monster: monster_name,
        });
        remove_slain_monster(board, target, lane_monsters);
    }
    true
}

/// 法術傷害 = round(基礎 + 靈巧 / 10000 x 基礎)
pub fn spell_damage(dexterity: f64, spell: &Spell) -> f64 {
    (spell.base_damage + dexterity / DEX_SPELL_SCALE_DIVISOR * spell.base_damage).round()
}

use inner::*;
mod inner {
    use super::*;

    pub fn cells_in_range(center: Pos) -> impl Iterator<Item = Pos> {
        RANGE_OFFSETS.into_iter().filter_map(move |(dr, dc)| {
            let row = center.row as isize + dr;
            let col = center.col as isize + dc;
            if row < 0 || col < 0 || row as usize >= ROWS || col as usize >= COLS {
                return None;
            }
            Some(Pos {
                row: row as usize,
                col: col as usize,
            })
        })
    }

    pub fn roll_dodge(chance: f64, rng: &mut impl rand::Rng) -> bool {
        rng.random::<f64>() < chance
    }

    /// 依法術屬性施加減益
    pub fn apply_spell_effect(spell: &Spell, target: &mut Monster, log: &mut CombatLog) {
        match spell.spell_type {
            SpellType::Fire => {
                target.debuff_defense(DEBUFF_PCT);
                log.info(format!("{} 防禦下降 10%（火焰）", target.name));
            }
            SpellType::Ice => {
                target.debuff_damage(DEBUFF_PCT);
                log.info(format!("{} 傷害下降 10%（冰霜）", target.name));
            }
            SpellType::Lightning => {
                target.debuff_dodge(DEBUFF_PCT);
                log.info(format!("{} 閃避下降 10%（閃電）", target.name));
            }
        }
    }

    /// 擊殺清理：移出格子佔位、線道名冊與怪物表
    pub fn remove_slain_monster(
        board: &mut Board,
        monster: MonsterID,
        lane_monsters: &mut Vec<MonsterID>,
    ) {
        if let Some(pos) = board.find_monster(monster) {
            if let Some(t) = board.get_tile_mut(pos) {
                t.remove_monster();
            }
        }
        lane_monsters.retain(|&id| id != monster);
        board.monsters.remove(&monster);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup(hero_pos: Pos, monster_pos: Pos, monster: Monster) -> Board {
        let mut board = crate::board::plain_board();
        let mut hero = crate::unit::sample_hero();
        hero.agility = 0.0; // 測試預設不閃避
        board.heroes.insert(1, hero);
        board
            .get_tile_mut(hero_pos)
            .unwrap()
            .place_hero(1, hero_pos)
            .unwrap();
        board.monsters.insert(9, monster);
        board
            .get_tile_mut(monster_pos)
            .unwrap()
            .place_monster(9, monster_pos)
            .unwrap();
        board
    }

    fn soft_monster() -> Monster {
        Monster {
            name: "Casper".to_string(),
            level: 1,
            hp: 30.0,
            damage: 35.0,
            defense: 0.0,
            dodge_chance: 0.0,
        }
    }

    #[test]
    fn test_range_includes_own_cell_and_diagonals() {
        let center = Pos { row: 4, col: 0 };
        let test_data = [
            (Pos { row: 4, col: 0 }, true),  // 同格
            (Pos { row: 3, col: 1 }, true),  // 斜角
            (Pos { row: 5, col: 0 }, true),
            (Pos { row: 2, col: 0 }, false), // 距離 2
            (Pos { row: 4, col: 3 }, false), // 隔著牆壁欄
        ];
        for (monster_pos, expect) in test_data {
            let board = setup(center, monster_pos, soft_monster());
            assert_eq!(
                monsters_in_range(&board, 1).contains(&9),
                expect,
                "{monster_pos:?} 是否在射程內"
            );
            assert_eq!(
                heroes_in_range(&board, 9).contains(&1),
                expect,
                "射程應對稱"
            );
        }
    }

    #[test]
    fn test_hero_attack_kill_cleanup() {
        let mut board = setup(Pos { row: 4, col: 0 }, Pos { row: 4, col: 1 }, soft_monster());
        let mut lane_monsters = vec![9];
        let mut log = CombatLog::new();
        let mut stats = GameStats::new();
        let mut rng = StdRng::seed_from_u64(1);

        // 217 傷害對 30 HP：必殺
        assert!(hero_attack(
            &mut board,
            1,
            9,
            &mut lane_monsters,
            &mut log,
            &mut stats,
            &mut rng
        ));
        assert!(board.find_monster(9).is_none(), "屍體不得留在棋盤");
        assert!(!board.monsters.contains_key(&9));
        assert!(lane_monsters.is_empty(), "名冊須同步清理");
        assert_eq!(stats.get(1).kills, 1);
        assert_eq!(stats.get(1).damage_dealt, 217.0);

        let events = log.drain();
        assert!(matches!(events[0], LogEvent::HeroAttack { .. }));
        assert!(matches!(events[1], LogEvent::MonsterSlain { .. }));
    }

    #[test]
    fn test_monster_defense_does_not_reduce_damage() {
        let mut monster = crate::unit::sample_monster();
        monster.dodge_chance = 0.0;
        let mut board = setup(Pos { row: 4, col: 0 }, Pos { row: 4, col: 1 }, monster);
        let mut lane_monsters = vec![9];
        let mut log = CombatLog::new();
        let mut stats = GameStats::new();
        let mut rng = StdRng::seed_from_u64(1);

        // 防禦 400 不減傷：217 全額入帳
        assert!(!hero_attack(
            &mut board,
            1,
            9,
            &mut lane_monsters,
            &mut log,
            &mut stats,
            &mut rng
        ));
        assert_eq!(board.monsters[&9].hp, 83.0);
        assert_eq!(stats.get(1).damage_dealt, 217.0);

        // 第二擊致死並清場
        assert!(hero_attack(
            &mut board,
            1,
            9,
            &mut lane_monsters,
            &mut log,
            &mut stats,
            &mut rng
        ));
        assert!(board.find_monster(9).is_none());
        assert!(!board.monsters.contains_key(&9));
        assert_eq!(stats.get(1).kills, 1);
    }

    #[test]
    fn test_hero_armor_reduces_hp_loss_but_stats_record_raw() {
        let mut board = setup(Pos { row: 4, col: 0 }, Pos { row: 4, col: 1 }, soft_monster());
        board.monsters.get_mut(&9).unwrap().damage = 300.0;
        board.heroes.get_mut(&1).unwrap().armor = Some(Armor {
            name: "Platinum_Shield".to_string(),
            reduction: 50.0,
        });
        let mut log = CombatLog::new();
        let mut stats = GameStats::new();
        let mut rng = StdRng::seed_from_u64(1);

        // 原始傷害 300 x 0.30 = 90，護甲 50 只影響 HP 差
        assert!(!monster_attack(&mut board, 9, 1, &mut log, &mut stats, &mut rng));
        assert_eq!(board.heroes[&1].hp, 260.0);
        assert_eq!(stats.get(1).damage_taken, 90.0, "統計取減免前傷害");
    }

    #[test]
    fn test_guaranteed_dodge_blocks_attack() {
        let mut monster = soft_monster();
        monster.dodge_chance = 1.0;
        let mut board = setup(Pos { row: 4, col: 0 }, Pos { row: 4, col: 1 }, monster);
        let mut lane_monsters = vec![9];
        let mut log = CombatLog::new();
        let mut stats = GameStats::new();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(!hero_attack(
            &mut board,
            1,
            9,
            &mut lane_monsters,
            &mut log,
            &mut stats,
            &mut rng
        ));
        assert_eq!(board.monsters[&9].hp, 30.0);
        let events = log.drain();
        assert!(matches!(events[0], LogEvent::Dodge { attempts: 1, .. }));
    }

    #[test]
    fn test_monster_attack_faint_removes_hero_from_board() {
        let mut board = setup(Pos { row: 4, col: 0 }, Pos { row: 4, col: 1 }, soft_monster());
        board.heroes.get_mut(&1).unwrap().hp = 10.0;
        let mut log = CombatLog::new();
        let mut stats = GameStats::new();
        let mut rng = StdRng::seed_from_u64(1);

        // 35 x 0.30 = 10.5，四捨五入 11
        assert!(monster_attack(&mut board, 9, 1, &mut log, &mut stats, &mut rng));
        assert!(board.find_hero(1).is_none(), "倒地英雄離場");
        assert!(board.heroes.contains_key(&1), "英雄資料保留以供重生");
        assert_eq!(stats.get(1).faints, 1);
    }

    #[test]
    fn test_spell_consumes_mana_even_on_dodge() {
        let mut monster = soft_monster();
        monster.dodge_chance = 1.0;
        let mut board = setup(Pos { row: 4, col: 0 }, Pos { row: 4, col: 1 }, monster);
        let mut lane_monsters = vec![9];
        let mut log = CombatLog::new();
        let mut stats = GameStats::new();
        let mut rng = StdRng::seed_from_u64(1);
        let spell = Spell {
            name: "Hellstorm".to_string(),
            spell_type: SpellType::Fire,
            base_damage: 100.0,
            mana_cost: 40.0,
        };

        assert!(hero_cast_spell(
            &mut board,
            1,
            &spell,
            9,
            &mut lane_monsters,
            &mut log,
            &mut stats,
            &mut rng
        ));
        assert_eq!(board.heroes[&1].mp, 60.0, "被閃避仍扣法力");
        assert_eq!(board.monsters[&9].hp, 30.0);
    }

    #[test]
    fn test_spell_damage_and_fire_debuff_order() {
        let mut monster = soft_monster();
        monster.hp = 300.0;
        monster.defense = 100.0;
        let mut board = setup(Pos { row: 4, col: 0 }, Pos { row: 4, col: 1 }, monster);
        let mut lane_monsters = vec![9];
        let mut log = CombatLog::new();
        let mut stats = GameStats::new();
        let mut rng = StdRng::seed_from_u64(1);
        let spell = Spell {
            name: "Hellstorm".to_string(),
            spell_type: SpellType::Fire,
            base_damage: 100.0,
            mana_cost: 40.0,
        };

        assert!(hero_cast_spell(
            &mut board,
            1,
            &spell,
            9,
            &mut lane_monsters,
            &mut log,
            &mut stats,
            &mut rng
        ));
        // 傷害 = round(100 + 500/10000 x 100) = 105，全額扣 HP
        // 火焰降防只改屬性：100 -> 90
        assert_eq!(board.monsters[&9].defense, 90.0);
        assert_eq!(board.monsters[&9].hp, 195.0);
        assert_eq!(stats.get(1).damage_dealt, 105.0);
    }

    #[test]
    fn test_spell_requires_range_and_mana() {
        let mut board = setup(Pos { row: 4, col: 0 }, Pos { row: 1, col: 1 }, soft_monster());
        let mut lane_monsters = vec![9];
        let mut log = CombatLog::new();
        let mut stats = GameStats::new();
        let mut rng = StdRng::seed_from_u64(1);
        let spell = Spell {
            name: "Hellstorm".to_string(),
            spell_type: SpellType::Fire,
            base_damage: 100.0,
            mana_cost: 40.0,
        };

        // 射程外：行動不消耗
        assert!(!hero_cast_spell(
            &mut board,
            1,
            &spell,
            9,
            &mut lane_monsters,
            &mut log,
            &mut stats,
            &mut rng
        ));
        assert_eq!(board.heroes[&1].mp, 100.0);

        // 法力不足：行動不消耗
        let mut board = setup(Pos { row: 4, col: 0 }, Pos { row: 4, col: 1 }, soft_monster());
        board.heroes.get_mut(&1).unwrap().mp = 10.0;
        assert!(!hero_cast_spell(
            &mut board,
            1,
            &spell,
            9,
            &mut lane_monsters,
            &mut log,
            &mut stats,
            &mut rng
        ));
        assert_eq!(board.heroes.get(&1).unwrap().mp, 10.0);
    }
}
