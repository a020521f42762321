use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::shared::{REQUIRED_FIELDS_MESSAGE, require_text};
use crate::entity::registration;
use crate::error::AppError;

/// Request body for `POST /api/register`.
///
/// Every field is optional at the serde level so that an absent field is
/// reported with the same message as an empty one.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Jane Doe")]
    pub full_name: Option<String>,
    #[schema(example = "CS101")]
    pub roll_number: Option<String>,
    #[schema(example = "Computer Science")]
    pub department: Option<String>,
    #[schema(example = "A")]
    pub section: Option<String>,
    #[schema(example = "female")]
    pub gender: Option<String>,
    /// Names of the selected games. Must contain at least one entry.
    #[schema(example = json!(["Cricket", "Athletics"]))]
    pub games: Option<Vec<String>>,
}

/// A registration payload that passed presence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub full_name: String,
    pub roll_number: String,
    pub department: String,
    pub section: String,
    pub gender: String,
    pub games: GameList,
}

/// Check that all six fields are present and non-empty.
///
/// No format checks happen here; the form does those before submitting.
pub fn validate_register_request(payload: RegisterRequest) -> Result<NewRegistration, AppError> {
    let games = match payload.games {
        Some(games) if !games.is_empty() => GameList(games),
        _ => return Err(AppError::Validation(REQUIRED_FIELDS_MESSAGE.into())),
    };

    Ok(NewRegistration {
        full_name: require_text(payload.full_name)?,
        roll_number: require_text(payload.roll_number)?,
        department: require_text(payload.department)?,
        section: require_text(payload.section)?,
        gender: require_text(payload.gender)?,
        games,
    })
}

#[derive(Debug, Error)]
pub enum GameListError {
    #[error("stored game list is not a JSON array of strings: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Ordered list of game names, persisted in one text column as a JSON array
/// of strings. Order and duplicates are kept as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameList(pub Vec<String>);

impl GameList {
    pub fn encode(&self) -> String {
        // A Vec<String> always serializes.
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn decode(stored: &str) -> Result<Self, GameListError> {
        Ok(GameList(serde_json::from_str(stored)?))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Distinct names in first-seen order, each with its number of occurrences.
    pub fn occurrences(&self) -> Vec<(&str, i32)> {
        let mut counts: Vec<(&str, i32)> = Vec::new();
        for name in &self.0 {
            match counts.iter_mut().find(|(n, _)| *n == name.as_str()) {
                Some((_, count)) => *count += 1,
                None => counts.push((name.as_str(), 1)),
            }
        }
        counts
    }
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Registration successful")]
    pub message: String,
    /// ID assigned to the new registration.
    #[schema(example = 42)]
    pub registration_id: i32,
}

impl RegisterResponse {
    pub fn new(registration_id: i32) -> Self {
        Self {
            success: true,
            message: "Registration successful".into(),
            registration_id,
        }
    }
}

/// One stored registration.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationItem {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "CS101")]
    pub roll_number: String,
    #[schema(example = "Computer Science")]
    pub department: String,
    #[schema(example = "A")]
    pub section: String,
    #[schema(example = "female")]
    pub gender: String,
    /// The game list exactly as stored: a JSON array encoded as a string.
    #[schema(example = "[\"Cricket\",\"Athletics\"]")]
    pub games: String,
    pub registration_date: DateTime<Utc>,
}

impl From<registration::Model> for RegistrationItem {
    fn from(m: registration::Model) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            roll_number: m.roll_number,
            department: m.department,
            section: m.section,
            gender: m.gender,
            games: m.games,
            registration_date: m.registration_date,
        }
    }
}

/// Response for `GET /api/registrations`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegistrationListResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 1)]
    pub count: usize,
    pub registrations: Vec<RegistrationItem>,
}
