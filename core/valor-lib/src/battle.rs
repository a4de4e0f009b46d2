//! battle.rs：
//! - 回合編排：英雄階段（每人一動、動後即判勝）、怪物階段
//!   （射程內先攻擊，否則交給 AI 推進）、回合收尾重生。
//! - 維護每位英雄的原屬線道，供回城與重生落點使用。
//! - play_match_round 在單回合外再加上回復與週期性增援。
use crate::*;
use std::collections::BTreeMap;

pub const SPAWN_INTERVAL: u32 = 4;
pub const DEFAULT_LANE: Lane = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HeroWin,
    MonsterWin,
}

/// 英雄單回合可選的行動
#[derive(Debug, Clone, PartialEq)]
pub enum HeroAction {
    Move(Direction),
    Attack(MonsterID),
    CastSpell(Spell, MonsterID),
    Teleport(Pos),
    Recall,
    RemoveObstacle(Direction),
    Pass,
}

/// 英雄行動的決策來源：互動輸入、腳本或機器人皆可
pub trait HeroActionSource {
    fn next_action(&mut self, board: &Board, hero: HeroID) -> HeroAction;
}

#[derive(Debug, Default)]
pub struct TurnManager {
    round: u32,
    home_lane: BTreeMap<HeroID, Lane>,
}

impl TurnManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已開打的回合數（第一回合為 1）
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn home_lane(&self, id: HeroID) -> Lane {
        self.home_lane.get(&id).copied().unwrap_or(DEFAULT_LANE)
    }

    /// 進行一個完整回合。分出勝負時回傳 Some，否則 None。
    #[allow(clippy::too_many_arguments)]
    pub fn play_one_round(
        &mut self,
        board: &mut Board,
        party: &[HeroID],
        lane_monsters: &mut Vec<MonsterID>,
        actions: &mut impl HeroActionSource,
        log: &mut CombatLog,
        stats: &mut GameStats,
        rng: &mut impl rand::Rng,
    ) -> Option<Outcome> {
        self.round += 1;

        // 英雄階段：依隊伍順序每位存活英雄一動，動後立即判勝
        for &id in party {
            self.bind_home_lane_if_missing(board, id);
            if !board.heroes.get(&id).is_some_and(|h| h.is_alive()) {
                continue;
            }

            let action = actions.next_action(board, id);
            self.execute_hero_action(board, id, action, lane_monsters, log, stats, rng);

            if board.heroes_reached_enemy_nexus() {
                log.flush();
                return Some(Outcome::HeroWin);
            }
        }

        // 怪物階段：逐一對快照行動，途中死亡者跳過
        for id in lane_monsters.clone() {
            if !board.monsters.get(&id).is_some_and(|m| m.is_alive()) {
                continue;
            }
            match heroes_in_range(board, id).first() {
                Some(&target) => {
                    monster_attack(board, id, target, log, stats, rng);
                }
                None => {
                    // 走位前沖出戰鬥訊息，維持階段內的事件順序
                    log.flush();
                    advance_monster(board, id, rng);
                }
            }
        }

        if board.monsters_reached_heroes_nexus() {
            log.flush();
            return Some(Outcome::MonsterWin);
        }

        log.flush();
        self.respawn_dead_heroes(board, party, log);
        log.flush();
        None
    }

    /// 單回合外的整場節奏：收尾回復，每 SPAWN_INTERVAL 回合增援
    #[allow(clippy::too_many_arguments)]
    pub fn play_match_round(
        &mut self,
        board: &mut Board,
        party: &[HeroID],
        lane_monsters: &mut Vec<MonsterID>,
        actions: &mut impl HeroActionSource,
        provider: &mut impl MonsterProvider,
        ids: &mut IdGenerator,
        log: &mut CombatLog,
        stats: &mut GameStats,
        rng: &mut impl rand::Rng,
    ) -> Option<Outcome> {
        let outcome =
            self.play_one_round(board, party, lane_monsters, actions, log, stats, rng);
        if outcome.is_some() {
            return outcome;
        }

        regenerate_party(board);

        if self.round % SPAWN_INTERVAL == 0 {
            let spawned = spawn_lane_monsters(board, provider, ids, log, rng);
            lane_monsters.extend(spawned);
        }
        None
    }

    /// 執行英雄行動；不合法的行動落空，不重試
    pub fn execute_hero_action(
        &self,
        board: &mut Board,
        id: HeroID,
        action: HeroAction,
        lane_monsters: &mut Vec<MonsterID>,
        log: &mut CombatLog,
        stats: &mut GameStats,
        rng: &mut impl rand::Rng,
    ) -> bool {
        match action {
            HeroAction::Move(dir) => move_hero(board, id, dir, log),
            HeroAction::Attack(target) => {
                if !monsters_in_range(board, id).contains(&target) {
                    return false;
                }
                hero_attack(board, id, target, lane_monsters, log, stats, rng);
                true
            }
            HeroAction::CastSpell(spell, target) => {
                hero_cast_spell(board, id, &spell, target, lane_monsters, log, stats, rng)
            }
            HeroAction::Teleport(to) => teleport_hero_to(board, id, to, log),
            HeroAction::Recall => recall_hero(board, id, self.home_lane(id), log),
            HeroAction::RemoveObstacle(dir) => remove_obstacle(board, id, dir),
            HeroAction::Pass => true,
        }
    }

    /// 首次見到英雄時，以當下所在線道綁定為原屬線道；此後不再變更
    pub fn bind_home_lane_if_missing(&mut self, board: &Board, id: HeroID) {
        if self.home_lane.contains_key(&id) {
            return;
        }
        let Some(pos) = board.find_hero(id) else {
            return;
        };
        if let Some(lane) = lane_of_col(pos.col) {
            self.home_lane.insert(id, lane);
        }
    }

    /// 重生倒地英雄：放回原屬線道主堡（首欄滿退次欄）。
    /// 兩欄皆滿時維持倒地，留待下回合收尾再試；
    /// HP/MP 僅在成功落位時回滿。
    fn respawn_dead_heroes(&self, board: &mut Board, party: &[HeroID], log: &mut CombatLog) {
        for &id in party {
            if board.heroes.get(&id).is_none_or(|h| h.is_alive()) {
                continue;
            }
            // 落位前先清掉殘留佔位
            if let Some(pos) = board.find_hero(id) {
                if let Some(t) = board.get_tile_mut(pos) {
                    t.remove_hero();
                }
            }

            let lane = self.home_lane(id);
            let row = ROWS - 1;
            let dest = board
                .nexus_columns_for_lane(lane)
                .into_iter()
                .map(|col| Pos { row, col })
                .find(|&pos| board.can_hero_enter(pos));
            let Some(pos) = dest else {
                continue;
            };

            let placed = board
                .get_tile_mut(pos)
                .map(|t| t.place_hero(id, pos).is_ok())
                .unwrap_or(false);
            if placed {
                if let Some(hero) = board.heroes.get_mut(&id) {
                    hero.restore_full();
                    log.push(LogEvent::HeroRespawned {
                        hero: hero.name.clone(),
                    });
                }
            }
        }
    }
}

/// 回合收尾回復：存活英雄各回復 10% 上限 HP/MP
pub fn regenerate_party(board: &mut Board) {
    for hero in board.heroes.values_mut() {
        if hero.is_alive() {
            hero.regenerate();
        }
    }
}
