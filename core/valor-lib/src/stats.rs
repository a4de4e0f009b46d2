//! stats.rs：
//! - 按英雄累計戰績：造成傷害、承受傷害、擊殺與倒地次數。
//! - 只做記帳，不影響任何戰鬥判定。
use crate::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub struct HeroStats {
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub kills: u32,
    pub faints: u32,
}

#[derive(Debug, Default)]
pub struct GameStats {
    records: BTreeMap<HeroID, HeroStats>,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats_mut(&mut self, id: HeroID) -> &mut HeroStats {
        self.records.entry(id).or_default()
    }

    pub fn get(&self, id: HeroID) -> HeroStats {
        self.records.get(&id).copied().unwrap_or_default()
    }
}
