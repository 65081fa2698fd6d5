// Player character types as sent by the browser client.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::Display;

use crate::game_state::{Metadata, StatusEffect};

/// A paired current/maximum value such as hit points or mana.
///
/// Values are carried as given: `current > max` is never corrected here, and fractional or
/// negative values are kept. Whole values display without a decimal point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pool {
    pub current: f64,
    pub max: f64,
}

impl Pool {
    pub fn new(current: f64, max: f64) -> Self {
        Self { current, max }
    }

    // Rounded percentage of the pool that remains, 0 for an empty maximum.
    pub fn percentage(&self) -> i32 {
        if self.max == 0.0 {
            return 0;
        }
        (self.current / self.max * 100.0).round() as i32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub campaign_id: String,
    pub player_name: String,
    pub character_name: String,
    pub character_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_class: Option<String>,
    pub stats: CharacterStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<Appearance>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_abilities: Option<Vec<SpecialAbility>>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companions: Option<Vec<Companion>>,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corruption_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_state: Option<SessionState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub hp: Pool,
    pub mana: Pool,
    pub armor: i32,
    pub speed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub height: String,
    pub features: String,
    #[serde(default)]
    pub distinctive_traits: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkillKind {
    Active,
    Passive,
    OncePerSession,
    Special,
}

// Dice and difficulty class required before a skill takes effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRequirement {
    pub dice: String,
    pub dc: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: SkillKind,
    #[serde(default)]
    pub mana_cost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(rename = "saveDC", default, skip_serializing_if = "Option::is_none")]
    pub save_dc: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_bonus: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_this_session: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_required: Option<HashMap<String, CheckRequirement>>,
}

impl Skill {
    // Only once-per-session skills have a cooldown, and only after use.
    pub fn is_on_cooldown(&self) -> bool {
        self.kind == SkillKind::OncePerSession && self.used_this_session.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialAbility {
    pub name: String,
    pub description: String,
    pub passive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_remaining: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Utility,
    Magical,
    Consumable,
    QuestItem,
    AlchemyReagent,
    CraftingMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<ItemEffect>>,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// An item effect's magnitude is either a number ("+2") or free text ("advantage").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEffect {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: EffectValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub hp: Pool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_order: Option<u32>,
    #[serde(default)]
    pub status_effects: Vec<StatusEffect>,
    #[serde(default)]
    pub temp_modifiers: Vec<TempModifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_from_player: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempModifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_remaining: Option<u32>,
}
