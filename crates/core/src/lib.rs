pub mod error;
pub mod intent;
pub mod models;
pub mod policy;
pub mod speech;

pub use error::SkillError;
pub use intent::{directory_identifier, resolve_entity, slot_value, IntentKind, SlotKey};
pub use models::*;
pub use policy::ApplicationGate;
pub use speech::{
    height_response, height_sentence, lookup_response, session_end_response, welcome_response,
    ForwardOutcome,
};
