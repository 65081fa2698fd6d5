use crate::character::Character;
use crate::enemy::Enemy;
use crate::game_state::{Action, CampaignInfo, CombatState, GameContext};

/// Assemble the game snapshot sent alongside a player action.
///
/// The shared inventory is every character's inventory flattened in character order, duplicates
/// included. The quest log starts empty. Pure and deterministic.
#[allow(clippy::too_many_arguments)]
pub fn build_game_context(
    campaign_name: &str,
    session_number: u32,
    total_sessions: u32,
    characters: Vec<Character>,
    enemies: Vec<Enemy>,
    current_combat: CombatState,
    location: &str,
    recent_actions: Option<Vec<Action>>,
) -> GameContext {
    let inventory = characters
        .iter()
        .flat_map(|character| character.inventory.iter().cloned())
        .collect();

    GameContext {
        campaign: CampaignInfo {
            name: campaign_name.to_string(),
            session_number,
            total_sessions,
        },
        characters,
        enemies,
        current_combat,
        recent_actions: recent_actions.unwrap_or_default(),
        inventory,
        quest_log: Vec::new(),
        location: location.to_string(),
        mood: None,
    }
}

// One-line combat summary; the actor name is left blank when the turn index is out of range.
pub fn summarize_combat(combat: &CombatState) -> String {
    if !combat.in_combat {
        return "Not in combat".to_string();
    }

    let actor = combat
        .current_actor()
        .map(|actor| actor.name.as_str())
        .unwrap_or_default();
    format!("Round {}, {}'s turn", combat.round, actor)
}

pub fn character_status(character: &Character) -> String {
    let hp_percent = character.stats.hp.percentage();
    let mana_percent = character.stats.mana.percentage();

    let status = if hp_percent < 30 {
        "badly wounded"
    } else if hp_percent < 60 {
        "injured"
    } else {
        "healthy"
    };

    format!(
        "{}: {}, {}% mana",
        character.character_name, status, mana_percent
    )
}
