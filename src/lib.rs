pub mod audio;
pub mod campaign;
pub mod character;
pub mod context;
pub mod dice;
pub mod enemy;
pub mod error;
pub mod game_state;
pub mod history;
pub mod imager;
pub mod logging;
pub mod narrator;
pub mod prompt;
pub mod provider;
pub mod server;
pub mod settings;

// Re-export commonly used items for easier access
pub use character::{Character, CharacterStats, InventoryItem, Pool};
pub use context::build_game_context;
pub use enemy::{Enemy, EnemyStats};
pub use error::{AppError, MediaError, NarrationError};
pub use game_state::{Actor, ActorKind, CombatState, GameContext};
pub use history::{ChatMessage, Role, prune_history};
pub use narrator::{NarrationOptions, NarrationStream, Narrator};
pub use prompt::render_system_prompt;
pub use provider::{ModelProvider, OpenAiProvider, TextStream};
pub use settings::Settings;
