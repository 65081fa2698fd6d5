use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::character::Pool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub id: String,
    pub campaign_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub stats: EnemyStats,
    #[serde(default)]
    pub abilities: Vec<EnemyAbility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistances: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerabilities: Option<Vec<String>>,
    pub is_alive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defeated_by: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loot: Option<Vec<LootItem>>,
    #[serde(default)]
    pub xp_reward: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combat_log: Option<Vec<CombatAction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub hp: Pool,
    pub armor: i32,
    pub speed: String,
    pub size: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnemyAbilityKind {
    Attack,
    Special,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyAbility {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EnemyAbilityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(rename = "saveDC", default, skip_serializing_if = "Option::is_none")]
    pub save_dc: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(default)]
    pub description: String,
}

// One entry of an enemy's per-turn combat log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatAction {
    pub turn: u32,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
