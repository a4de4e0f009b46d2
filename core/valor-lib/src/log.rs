//! log.rs：
//! - 以結構化事件記錄戰鬥過程，呈現層自行決定格式。
//! - 連續同名同機率的閃避事件合併為單筆累計，避免洗版。
use serde::{Deserialize, Serialize};

/// 戰鬥事件。damage 為減免前的公式傷害，
/// hp_before / hp_after 為受擊方結算前後的 HP（護甲效果見其差值）。
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub enum LogEvent {
    HeroAttack {
        hero: String,
        monster: String,
        damage: f64,
        hp_before: f64,
        hp_after: f64,
    },
    MonsterAttack {
        monster: String,
        hero: String,
        damage: f64,
        hp_before: f64,
        hp_after: f64,
    },
    SpellCast {
        hero: String,
        spell: String,
        monster: String,
        damage: f64,
        hp_before: f64,
        hp_after: f64,
    },
    /// attempts 為連續閃避次數（合併後）
    Dodge {
        name: String,
        chance: f64,
        attempts: u32,
    },
    MonsterSlain {
        monster: String,
    },
    HeroFallen {
        hero: String,
    },
    HeroRespawned {
        hero: String,
    },
    Info {
        message: String,
    },
}

/// 事件緩衝。閃避事件先暫存於 pending，遇到其他事件或不同來源的
/// 閃避時沖出，使連續閃避合併為一筆。
#[derive(Debug, Default)]
pub struct CombatLog {
    events: Vec<LogEvent>,
    pending_dodge: Option<(String, f64, u32)>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 沖出暫存的閃避事件
    pub fn flush(&mut self) {
        if let Some((name, chance, attempts)) = self.pending_dodge.take() {
            self.events.push(LogEvent::Dodge {
                name,
                chance,
                attempts,
            });
        }
    }

    /// 記錄一次閃避；與暫存者同名同機率則累計次數
    pub fn dodge(&mut self, name: &str, chance: f64) {
        match &mut self.pending_dodge {
            Some((pending, pending_chance, attempts))
                if pending == name && (*pending_chance - chance).abs() < 1e-6 =>
            {
                *attempts += 1;
            }
            _ => {
                self.flush();
                self.pending_dodge = Some((name.to_string(), chance, 1));
            }
        }
    }

    pub fn push(&mut self, event: LogEvent) {
        self.flush();
        self.events.push(event);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogEvent::Info {
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// 取出全部事件並清空緩衝（含暫存閃避）
    pub fn drain(&mut self) -> Vec<LogEvent> {
        self.flush();
        std::mem::take(&mut self.events)
    }
}
