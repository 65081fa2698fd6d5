use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::campaign::Quest;
use crate::character::{Character, InventoryItem, Pool};
use crate::dice::DiceRoll;
use crate::enemy::Enemy;

/// Opaque key-value metadata whose shape is defined by the client or the model provider.
///
/// Non-exhaustive by nature: nothing in this crate inspects its keys.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Snapshot of the game sent with every player action to ground the narration.
///
/// Built fresh for each request and owned by the caller; the narration core only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameContext {
    pub campaign: CampaignInfo,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub enemies: Vec<Enemy>,
    #[serde(default)]
    pub current_combat: CombatState,
    #[serde(default)]
    pub recent_actions: Vec<Action>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub quest_log: Vec<Quest>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInfo {
    pub name: String,
    pub session_number: u32,
    pub total_sessions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mood {
    Dangerous,
    Peaceful,
    Mysterious,
    Epic,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatState {
    pub in_combat: bool,
    #[serde(default)]
    pub turn_order: Vec<Actor>,
    // Signed: the client may send any index, including negative ones.
    #[serde(default)]
    pub current_turn: i64,
    #[serde(default)]
    pub round: i64,
}

impl CombatState {
    // The actor whose turn it is, if the turn index points into the turn order.
    pub fn current_actor(&self) -> Option<&Actor> {
        usize::try_from(self.current_turn)
            .ok()
            .and_then(|index| self.turn_order.get(index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActorKind {
    Character,
    Enemy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ActorKind,
    pub initiative: i32,
    pub hp: Pool,
    #[serde(default)]
    pub status_effects: Vec<StatusEffect>,
}

// A status effect lasts either a number of rounds or a described span ("until dawn").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectDuration {
    Rounds(u32),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    pub description: String,
    pub duration: EffectDuration,
    pub effect: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub actor_id: String,
    pub actor_name: String,
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<DiceRoll>,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}
