//! unit.rs：
//! - 定義英雄（Hero）、怪物（Monster）、裝備與法術資料。
//! - 負責個體屬性運算：攻擊力、閃避率、承傷、法力與回復。
//! - 不負責目標選擇與命中流程（action/combat.rs）。
use crate::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

pub const HP_PER_LEVEL: f64 = 100.0;
pub const MP_PER_LEVEL: f64 = 50.0;
pub const REGEN_PCT: f64 = 0.10;
pub const HERO_ATTACK_FACTOR: f64 = 0.31;
pub const DODGE_PER_AGILITY: f64 = 0.002;
pub const DODGE_CAP: f64 = 0.5;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Display, EnumIter, PartialEq, Eq)]
pub enum HeroClass {
    Warrior,
    Sorcerer,
    Paladin,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Weapon {
    pub name: String,
    pub damage: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Armor {
    pub name: String,
    pub reduction: f64,
}

/// 法術屬性，決定命中後施加的減益種類
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Display, EnumIter, PartialEq, Eq)]
pub enum SpellType {
    Fire,
    Ice,
    Lightning,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Spell {
    pub name: String,
    pub spell_type: SpellType,
    pub base_damage: f64,
    pub mana_cost: f64,
}

/// 英雄資料來源（外部 JSON）
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HeroTemplate {
    pub name: String,
    pub class: HeroClass,
    pub level: u32,
    pub mana: f64,
    pub strength: f64,
    pub dexterity: f64,
    pub agility: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MonsterTemplate {
    pub name: String,
    pub level: u32,
    pub hp: f64,
    pub damage: f64,
    pub defense: f64,
    pub dodge_chance: f64,
}

#[derive(Debug, Clone)]
pub struct Hero {
    pub name: String,
    pub class: HeroClass,
    pub level: u32,
    pub hp: f64,
    pub mp: f64,
    pub strength: f64,
    pub dexterity: f64,
    pub agility: f64,
    pub weapon: Option<Weapon>,
    pub armor: Option<Armor>,
    pub spells: Vec<Spell>,
}

impl Hero {
    pub fn from_template(t: &HeroTemplate) -> Self {
        Hero {
            name: t.name.clone(),
            class: t.class,
            level: t.level,
            hp: t.level as f64 * HP_PER_LEVEL,
            mp: t.mana,
            strength: t.strength,
            dexterity: t.dexterity,
            agility: t.agility,
            weapon: None,
            armor: None,
            spells: vec![],
        }
    }

    pub fn max_hp(&self) -> f64 {
        self.level as f64 * HP_PER_LEVEL
    }

    pub fn max_mp(&self) -> f64 {
        self.level as f64 * MP_PER_LEVEL
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// 普攻傷害 = (力量 + 武器傷害) x 0.31，四捨五入
    pub fn attack_damage(&self) -> f64 {
        let weapon = self.weapon.as_ref().map(|w| w.damage).unwrap_or(0.0);
        ((self.strength + weapon) * HERO_ATTACK_FACTOR).round()
    }

    /// 閃避率 = 敏捷 x 0.002，上限 0.5
    pub fn dodge_chance(&self) -> f64 {
        (self.agility * DODGE_PER_AGILITY).min(DODGE_CAP)
    }

    /// 承傷：先扣護甲減免（不低於 0），HP 下限 0
    pub fn take_damage(&mut self, raw: f64) -> f64 {
        let reduction = self.armor.as_ref().map(|a| a.reduction).unwrap_or(0.0);
        let dealt = (raw - reduction).max(0.0);
        self.hp = (self.hp - dealt).max(0.0);
        dealt
    }

    pub fn can_cast(&self, spell: &Spell) -> bool {
        self.mp >= spell.mana_cost
    }

    /// 扣除法力；施放流程保證先以 can_cast 檢查
    pub fn spend_mana(&mut self, cost: f64) {
        self.mp = (self.mp - cost).max(0.0);
    }

    /// 回合結束回復：各回 10% 上限值，不超過上限
    pub fn regenerate(&mut self) {
        self.hp = (self.hp + self.max_hp() * REGEN_PCT).min(self.max_hp());
        self.mp = (self.mp + self.max_mp() * REGEN_PCT).min(self.max_mp());
    }

    /// 重生後回滿；僅在成功放回棋盤時呼叫
    pub fn restore_full(&mut self) {
        self.hp = self.max_hp();
        self.mp = self.max_mp();
    }
}

#[derive(Debug, Clone)]
pub struct Monster {
    pub name: String,
    pub level: u32,
    pub hp: f64,
    pub damage: f64,
    pub defense: f64,
    pub dodge_chance: f64,
}

impl Monster {
    pub fn from_template(t: &MonsterTemplate) -> Self {
        Monster {
            name: t.name.clone(),
            level: t.level,
            hp: t.hp,
            damage: t.damage,
            defense: t.defense,
            dodge_chance: t.dodge_chance,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// 承傷：傷害全額扣 HP，下限 0。防禦不參與減傷，
    /// 只是火焰減益作用的屬性。
    pub fn take_damage(&mut self, amount: f64) {
        self.hp = (self.hp - amount).max(0.0);
    }

    /// 火焰減益：防禦下修 pct，下限 0
    pub fn debuff_defense(&mut self, pct: f64) {
        self.defense = (self.defense * (1.0 - pct)).max(0.0);
    }

    /// 冰霜減益：傷害下修 pct，下限 0
    pub fn debuff_damage(&mut self, pct: f64) {
        self.damage = (self.damage * (1.0 - pct)).max(0.0);
    }

    /// 閃電減益：閃避率下修 pct，下限 0
    pub fn debuff_dodge(&mut self, pct: f64) {
        self.dodge_chance = (self.dodge_chance * (1.0 - pct)).max(0.0);
    }
}

/// 測試用標準英雄
#[cfg(test)]
pub(crate) fn sample_hero() -> Hero {
    Hero::from_template(&HeroTemplate {
        name: "Gaerdal".to_string(),
        class: HeroClass::Warrior,
        level: 3,
        mana: 100.0,
        strength: 700.0,
        dexterity: 500.0,
        agility: 600.0,
    })
}

/// 測試用標準怪物
#[cfg(test)]
pub(crate) fn sample_monster() -> Monster {
    Monster::from_template(&MonsterTemplate {
        name: "Desghidorrah".to_string(),
        level: 3,
        hp: 300.0,
        damage: 300.0,
        defense: 400.0,
        dodge_chance: 0.35,
    })
}
