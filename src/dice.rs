// Dice types, rolling helpers, and extraction of roll requests from narration text.
use rand::Rng; // RNG utilities from the rand crate for generating random numbers.
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

// Marker the narrator is instructed to use when it needs a roll from the players.
pub const ROLL_MARKER: &str = "ROLL:";

// Largest number of dice a single roll request may ask for.
pub const MAX_DICE_PER_ROLL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieType {
    pub fn sides(self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
            DieType::D100 => 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRoll {
    pub die_type: DieType,
    pub quantity: u32,
    pub modifier: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advantage: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disadvantage: Option<bool>,
    pub result: RollResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    pub rolls: Vec<u32>,
    pub total: i32,
    pub is_critical: bool,
}

// Roll a single die with the given number of sides.
pub fn roll_dice(sides: u32) -> u32 {
    roll_die(&mut rand::rng(), sides)
}

pub fn roll_multiple_dice(quantity: u32, sides: u32) -> Vec<u32> {
    let mut rng = rand::rng();
    (0..quantity).map(|_| roll_die(&mut rng, sides)).collect()
}

// Sum of every die plus a flat modifier, saturating at the bounds of `i32`.
pub fn calculate_total(rolls: &[u32], modifier: i32) -> i32 {
    rolls.iter().fold(modifier, |total, &roll| {
        total.saturating_add(i32::try_from(roll).unwrap_or(i32::MAX))
    })
}

fn roll_die(rng: &mut impl Rng, sides: u32) -> u32 {
    rng.random_range(1..=sides.max(1))
}

/// A roll the narrator asked for, e.g. `ROLL: 1d20+5 for attack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRequest {
    pub quantity: u32,
    pub die_type: DieType,
    pub modifier: i32,
    pub purpose: String,
}

impl RollRequest {
    /// Extract every well-formed roll request from narration text, in order of appearance.
    ///
    /// Requests naming a die that is not one of the standard polyhedrals, or asking for more than
    /// [`MAX_DICE_PER_ROLL`] dice, are skipped.
    pub fn parse_all(text: &str) -> Vec<RollRequest> {
        text.match_indices(ROLL_MARKER)
            .filter_map(|(index, _)| Self::parse(&text[index + ROLL_MARKER.len()..]))
            .collect()
    }

    // Parse the text following a roll marker: `<q>d<s>[+|-<m>] [for <purpose>]`.
    fn parse(rest: &str) -> Option<RollRequest> {
        let rest = rest.trim_start();
        let (quantity, rest) = split_number(rest)?;
        if quantity > MAX_DICE_PER_ROLL {
            return None;
        }

        // The die token is everything up to the first character that is not part of `d<sides>`.
        let die_end = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(rest.len(), |(index, _)| index);
        let die_type: DieType = rest[..die_end].parse().ok()?;
        let rest = &rest[die_end..];

        let rest = rest.trim_start();
        let (modifier, rest) = match rest.chars().next() {
            Some(sign @ ('+' | '-')) => {
                let (value, rest) = split_number(rest[1..].trim_start())?;
                let value = i32::try_from(value).ok()?;
                (if sign == '-' { -value } else { value }, rest)
            }
            _ => (0, rest),
        };

        let rest = rest.trim_start();
        let purpose = rest
            .strip_prefix("for ")
            .map(|purpose| {
                purpose
                    .split(['\n', '.', ',', ';', '!', '?', '"', ')'])
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            })
            .unwrap_or_default();

        Some(RollRequest {
            quantity: quantity.max(1),
            die_type,
            modifier,
            purpose,
        })
    }

    pub fn roll(&self) -> DiceRoll {
        self.roll_with(&mut rand::rng())
    }

    pub fn roll_with(&self, rng: &mut impl Rng) -> DiceRoll {
        let rolls: Vec<u32> = (0..self.quantity)
            .map(|_| roll_die(rng, self.die_type.sides()))
            .collect();
        // A natural 20 on any d20 is a critical.
        let is_critical = self.die_type == DieType::D20 && rolls.contains(&20);
        let total = calculate_total(&rolls, self.modifier);

        DiceRoll {
            die_type: self.die_type,
            quantity: self.quantity,
            modifier: self.modifier,
            advantage: None,
            disadvantage: None,
            result: RollResult {
                rolls,
                total,
                is_critical,
            },
        }
    }
}

// Split a leading run of ASCII digits off `text`.
fn split_number(text: &str) -> Option<(u32, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    let value = text[..end].parse().ok()?;
    Some((value, &text[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_roll_with_modifier_and_purpose() {
        let requests = RollRequest::parse_all("The goblin lunges! ROLL: 1d20+5 for attack.");
        assert_eq!(
            requests,
            vec![RollRequest {
                quantity: 1,
                die_type: DieType::D20,
                modifier: 5,
                purpose: "attack".to_string(),
            }]
        );
    }

    #[test]
    fn parses_multiple_and_negative_modifiers() {
        let text = "ROLL: 2d6-1 for damage\nThen ROLL: 1d4 for luck";
        let requests = RollRequest::parse_all(text);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].quantity, 2);
        assert_eq!(requests[0].modifier, -1);
        assert_eq!(requests[0].purpose, "damage");
        assert_eq!(requests[1].die_type, DieType::D4);
        assert_eq!(requests[1].modifier, 0);
        assert_eq!(requests[1].purpose, "luck");
    }

    #[test]
    fn skips_non_standard_dice_and_garbage() {
        assert!(RollRequest::parse_all("ROLL: 1d7 for nothing").is_empty());
        assert!(RollRequest::parse_all("ROLL: a d20").is_empty());
        assert!(RollRequest::parse_all("no rolls here").is_empty());
    }

    #[test]
    fn roll_stays_within_bounds() {
        let request = RollRequest {
            quantity: 3,
            die_type: DieType::D6,
            modifier: 2,
            purpose: String::new(),
        };
        let roll = request.roll();
        assert_eq!(roll.result.rolls.len(), 3);
        assert!(roll.result.rolls.iter().all(|&r| (1..=6).contains(&r)));
        assert_eq!(roll.result.total, calculate_total(&roll.result.rolls, 2));
        assert!(!roll.result.is_critical);
    }

    #[test]
    fn die_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DieType::D100).unwrap(), "\"d100\"");
        assert_eq!(DieType::D20.to_string(), "d20");
        assert_eq!("D12".parse::<DieType>().unwrap(), DieType::D12);
        assert!("d7".parse::<DieType>().is_err());
    }

    #[test]
    fn rejects_oversized_dice_pools() {
        assert!(RollRequest::parse_all("ROLL: 4000000000d20 for doom").is_empty());
        assert!(RollRequest::parse_all("ROLL: 101d6 for a landslide").is_empty());

        let requests = RollRequest::parse_all("ROLL: 100d6 for a landslide");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].quantity, MAX_DICE_PER_ROLL);
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        assert_eq!(calculate_total(&[2_000_000_000, 2_000_000_000], 0), i32::MAX);
        assert_eq!(calculate_total(&[u32::MAX], 5), i32::MAX);
        assert_eq!(calculate_total(&[1, 2], i32::MIN), i32::MIN + 3);
        assert_eq!(calculate_total(&[3, 4], -2), 5);
    }
}
