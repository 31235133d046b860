use std::collections::HashMap;

use crate::models::{SessionAttributes, Slot};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntentKind {
    LookupPokemon,
    GetPokemonHeight,
    SlackPokemonHeight,
    Help,
    Cancel,
    Stop,
    Unknown(String),
}

impl IntentKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "LookupPokemonIntent" => Self::LookupPokemon,
            "GetPokemonHeightIntent" => Self::GetPokemonHeight,
            "SlackPokemonHeightIntent" => Self::SlackPokemonHeight,
            "AMAZON.HelpIntent" => Self::Help,
            "AMAZON.CancelIntent" => Self::Cancel,
            "AMAZON.StopIntent" => Self::Stop,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_name(&self) -> &str {
        match self {
            Self::LookupPokemon => "LookupPokemonIntent",
            Self::GetPokemonHeight => "GetPokemonHeightIntent",
            Self::SlackPokemonHeight => "SlackPokemonHeightIntent",
            Self::Help => "AMAZON.HelpIntent",
            Self::Cancel => "AMAZON.CancelIntent",
            Self::Stop => "AMAZON.StopIntent",
            Self::Unknown(name) => name.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    Pokemon,
}

impl SlotKey {
    pub fn slot_name(self) -> &'static str {
        match self {
            Self::Pokemon => "Pokemon",
        }
    }

    pub fn attribute_key(self) -> &'static str {
        match self {
            Self::Pokemon => "pokemon",
        }
    }
}

pub fn slot_value(slots: &HashMap<String, Slot>, key: SlotKey) -> Option<&str> {
    slots
        .get(key.slot_name())
        .and_then(|slot| slot.value.as_deref())
        .and_then(non_blank)
}

pub fn attribute(attributes: &SessionAttributes, key: SlotKey) -> Option<&str> {
    attributes
        .get(key.attribute_key())
        .map(String::as_str)
        .and_then(non_blank)
}

pub fn resolve_entity<'a>(
    slots: &'a HashMap<String, Slot>,
    attributes: &'a SessionAttributes,
    key: SlotKey,
) -> Option<&'a str> {
    slot_value(slots, key).or_else(|| attribute(attributes, key))
}

pub fn directory_identifier(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
