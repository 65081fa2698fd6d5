// System prompt rendering for the Dungeon Master narrator.
use std::fmt::Write;

use crate::game_state::GameContext;

pub const ROLE_STATEMENT: &str = "You are an expert Dungeon Master running a D&D campaign.";

pub const RULES: &str = r#"RULES:
- Narrate with dramatic, immersive storytelling
- Keep responses clear for text-to-speech (avoid complex formatting)
- Apply D&D 5e rules strictly
- Request dice rolls when needed (format: "ROLL: 1d20+5 for attack")
- Describe outcomes vividly
- Stay in character as the DM"#;

pub const TONE: &str = "TONE: Heroic and adventurous with moments of chaotic humor";

pub const CLOSING: &str =
    "Respond as the Dungeon Master would, narrating the scene and consequences.";

/// Render the system-role prompt for a game snapshot.
///
/// Sections always appear in the same order and the combat block is emitted only while combat is
/// active, so identical snapshots render to byte-identical text. Stat values are printed exactly
/// as given.
pub fn render_system_prompt(context: &GameContext) -> String {
    let mut prompt = String::new();

    // `write!` into a String cannot fail.
    let _ = writeln!(prompt, "{ROLE_STATEMENT}");
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "CAMPAIGN: {}", context.campaign.name);
    let _ = writeln!(
        prompt,
        "Session {} of {}",
        context.campaign.session_number, context.campaign.total_sessions
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "CURRENT LOCATION: {}", context.location);
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "CHARACTERS:");
    let _ = writeln!(prompt, "{}", character_lines(context));
    let _ = writeln!(prompt);

    if context.current_combat.in_combat {
        prompt.push_str(&combat_block(context));
        let _ = writeln!(prompt);
    }

    let _ = writeln!(prompt, "{RULES}");
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "{TONE}");
    let _ = writeln!(prompt);
    prompt.push_str(CLOSING);

    prompt
}

fn character_lines(context: &GameContext) -> String {
    context
        .characters
        .iter()
        .map(|c| {
            format!(
                "- {} ({}): HP {}/{}, Mana {}/{}",
                c.character_name,
                c.character_type,
                c.stats.hp.current,
                c.stats.hp.max,
                c.stats.mana.current,
                c.stats.mana.max
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn combat_block(context: &GameContext) -> String {
    let combat = &context.current_combat;
    let actor = combat
        .current_actor()
        .map(|actor| actor.name.as_str())
        .unwrap_or_default();

    let enemies = context
        .enemies
        .iter()
        .map(|e| {
            format!(
                "- {}: HP {}/{} {}",
                e.name,
                e.stats.hp.current,
                e.stats.hp.max,
                if e.is_alive { "(alive)" } else { "(defeated)" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "COMBAT STATUS:\n- Round {}\n- Turn: {}\n\nENEMIES:\n{}\n",
        combat.round, actor, enemies
    )
}
