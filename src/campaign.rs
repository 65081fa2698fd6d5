// Campaign-level records. These are type definitions only: nothing in this crate stores them.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::Display;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub settings: CampaignSettings,
    pub progress: CampaignProgress,
    #[serde(default)]
    pub players: Vec<String>,
    pub location: LocationState,
    #[serde(default)]
    pub quest_log: Vec<Quest>,
    pub enemies: EnemyTracker,
    pub party_inventory: PartyInventory,
    #[serde(default)]
    pub session_history: Vec<SessionSummary>,
    pub dm_context: DmContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_session: Option<NextSessionPreview>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Difficulty {
    Strict,
    Narrative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSettings {
    pub total_duration: u32,   // Planned campaign length, in minutes.
    pub session_duration: u32, // Planned length of one session, in minutes.
    pub tone: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProgress {
    pub current_session: u32,
    pub total_sessions: u32,
    pub session_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationState {
    pub current: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default)]
    pub discovered: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestStatus {
    Active,
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: QuestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objectives: Option<Vec<QuestObjective>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest_hook: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestObjective {
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnemyTracker {
    #[serde(default)]
    pub encountered: Vec<String>,
    #[serde(default)]
    pub remaining: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyInventory {
    pub gold: u32,
    #[serde(default)]
    pub shared_items: Vec<SharedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedItem {
    pub name: String,
    pub quantity: u32,
    pub holder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub major_events: Vec<String>,
    #[serde(default)]
    pub loot_gained: Vec<String>,
    #[serde(default)]
    pub xp_gained: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ending_cliffhanger: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_narration: Option<String>,
    #[serde(default)]
    pub active_plot_threads: Vec<String>,
    #[serde(default)]
    pub npc_relationships: HashMap<String, String>, // NPC name -> disposition toward the party.
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextSessionPreview {
    pub preview: String,
    #[serde(default)]
    pub prepared_elements: Vec<String>,
}
