//! terrain.rs：
//! - 地形加成：草叢加敏捷、洞穴加靈巧、丘陵加力量，各 10%。
//! - 進入時乘上加成、離開時除回，僅作用於英雄。
use crate::*;

pub const TERRAIN_BONUS: f64 = 0.10;

/// 地形對應的加成屬性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusStat {
    Strength,
    Dexterity,
    Agility,
}

pub fn bonus_stat(cell: CellType) -> Option<BonusStat> {
    match cell {
        CellType::Bush => Some(BonusStat::Dexterity),
        CellType::Cave => Some(BonusStat::Agility),
        CellType::Koulou => Some(BonusStat::Strength),
        _ => None,
    }
}

/// 進入地形格：對應屬性乘上 (1 + 10%)
pub fn apply_enter_bonus(cell: CellType, hero: &mut Hero, log: &mut CombatLog) {
    let Some(stat) = bonus_stat(cell) else {
        return;
    };
    let factor = 1.0 + TERRAIN_BONUS;
    match stat {
        BonusStat::Strength => hero.strength *= factor,
        BonusStat::Dexterity => hero.dexterity *= factor,
        BonusStat::Agility => hero.agility *= factor,
    }
    log.info(format!("{} 進入 {cell}，{stat:?} 提升 10%", hero.name));
}

/// 離開地形格：除回進入時的倍率，屬性還原
pub fn revert_exit_bonus(cell: CellType, hero: &mut Hero, log: &mut CombatLog) {
    let Some(stat) = bonus_stat(cell) else {
        return;
    };
    let factor = 1.0 + TERRAIN_BONUS;
    match stat {
        BonusStat::Strength => hero.strength /= factor,
        BonusStat::Dexterity => hero.dexterity /= factor,
        BonusStat::Agility => hero.agility /= factor,
    }
    log.info(format!("{} 離開 {cell}，{stat:?} 還原", hero.name));
}
