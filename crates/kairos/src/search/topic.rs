//! Topic (kind of undertaking) to target house.

use crate::config::{SearchConfig, TopicPolicy};
use crate::error::EngineError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub key: &'static str,
    pub house: u8,
    pub label: &'static str,
}

const TOPICS: &[Topic] = &[
    Topic { key: "trabajo", house: 10, label: "Work and career" },
    Topic { key: "lanzamiento", house: 10, label: "Project launch" },
    Topic { key: "amor", house: 7, label: "Love and partnership" },
    Topic { key: "dinero", house: 2, label: "Money and investments" },
    Topic { key: "viaje", house: 9, label: "Travel and abroad" },
    Topic { key: "viajes", house: 9, label: "Travel and abroad" },
    Topic { key: "inmobiliaria", house: 4, label: "Real estate and home" },
    Topic { key: "salud", house: 6, label: "Health" },
    Topic { key: "estudios", house: 3, label: "Studies" },
    Topic { key: "familia", house: 4, label: "Family" },
    Topic { key: "creatividad", house: 5, label: "Creativity" },
    Topic { key: "amistades", house: 11, label: "Friendship" },
    Topic { key: "espiritualidad", house: 12, label: "Spirituality" },
];

// English alias -> canonical key
const ALIASES: &[(&str, &str)] = &[
    ("work", "trabajo"),
    ("career", "trabajo"),
    ("launch", "lanzamiento"),
    ("love", "amor"),
    ("money", "dinero"),
    ("travel", "viaje"),
    ("real_estate", "inmobiliaria"),
    ("health", "salud"),
    ("studies", "estudios"),
    ("family", "familia"),
    ("creativity", "creatividad"),
    ("friendship", "amistades"),
    ("spirituality", "espiritualidad"),
];

/// Look up a topic by canonical key or English alias, case-insensitively.
pub fn lookup_topic(name: &str) -> Option<Topic> {
    let lower = name.trim().to_lowercase().replace([' ', '-'], "_");
    let key = ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, key)| *key)
        .unwrap_or(lower.as_str());
    TOPICS.iter().find(|t| t.key == key).copied()
}

pub fn topic_house(name: &str) -> Option<u8> {
    lookup_topic(name).map(|t| t.house)
}

pub fn valid_topics() -> Vec<String> {
    TOPICS
        .iter()
        .map(|t| t.key)
        .chain(ALIASES.iter().map(|(alias, _)| *alias))
        .map(str::to_string)
        .collect()
}

/// Resolve a requested topic under the configured policy.
pub fn resolve_topic(name: &str, config: &SearchConfig) -> Result<Topic, EngineError> {
    if let Some(topic) = lookup_topic(name) {
        return Ok(topic);
    }
    let unknown = || EngineError::UnknownTopic {
        topic: name.to_string(),
        valid: valid_topics(),
    };
    match config.topic_policy {
        TopicPolicy::Strict => Err(unknown()),
        TopicPolicy::Fallback => {
            let fallback = lookup_topic(&config.default_topic).ok_or_else(unknown)?;
            log::warn!(
                "Unknown topic '{}', falling back to '{}' (house {})",
                name,
                fallback.key,
                fallback.house
            );
            Ok(fallback)
        }
    }
}
