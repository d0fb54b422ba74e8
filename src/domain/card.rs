use crate::domain::status::Status;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Server-assigned identifier of a task card (e.g. `42`, `TASK-20240101-0001`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardId(String);

impl CardId {
    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CardId {
    type Err = crate::error::BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(crate::error::BoardError::InvalidCardId(s.to_string()))
        }
    }
}

impl TryFrom<String> for CardId {
    type Error = crate::error::BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<CardId> for String {
    fn from(id: CardId) -> Self {
        id.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task card as shown on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub status: Status,
    #[serde(default)]
    pub is_personal: bool,
    /// Rendered markup for the card, replaced wholesale after a successful move
    #[serde(default)]
    pub markup: String,
}

impl Card {
    pub fn new(id: CardId, status: Status) -> Self {
        Self {
            id,
            status,
            is_personal: false,
            markup: String::new(),
        }
    }

    pub fn personal(mut self) -> Self {
        self.is_personal = true;
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    /// Personal tasks are finished for good once completed
    pub fn is_locked(&self) -> bool {
        self.is_personal && self.status == Status::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_parsing() {
        assert_eq!(CardId::from_str("42").unwrap().as_str(), "42");
        assert_eq!(
            CardId::from_str(" TASK-20240101-0001 ").unwrap().as_str(),
            "TASK-20240101-0001"
        );
        assert!(CardId::from_str("").is_err());
        assert!(CardId::from_str("   ").is_err());
        assert!(CardId::from_str("12/../admin").is_err());
        assert!(CardId::from_str("a b").is_err());
    }

    #[test]
    fn test_card_id_serde_validates() {
        let id: CardId = serde_json::from_str("\"17\"").unwrap();
        assert_eq!(id.as_str(), "17");
        assert!(serde_json::from_str::<CardId>("\"not valid\"").is_err());
    }

    #[test]
    fn test_card_lock_rule() {
        let id = CardId::from_str("1").unwrap();
        assert!(Card::new(id.clone(), Status::Completed).personal().is_locked());
        assert!(!Card::new(id.clone(), Status::Completed).is_locked());
        assert!(!Card::new(id, Status::InProgress).personal().is_locked());
    }

    #[test]
    fn test_card_deserialization_defaults() {
        let json = r#"{"id": "7", "status": "review"}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.status, Status::Review);
        assert!(!card.is_personal);
        assert!(card.markup.is_empty());
    }
}
