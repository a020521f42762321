use serde::Serialize;

use crate::entity::game;

/// Share of a game's capacity that is taken, as a whole percentage.
///
/// Truncates toward zero. A game without capacity reports 0.
pub fn fill_percentage(current_participants: i32, max_participants: i32) -> i32 {
    if max_participants > 0 {
        let pct = i64::from(current_participants) * 100 / i64::from(max_participants);
        i32::try_from(pct).unwrap_or(if pct < 0 { i32::MIN } else { i32::MAX })
    } else {
        0
    }
}

/// Participation figures for one game.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    #[schema(example = "Cricket")]
    pub name: String,
    #[schema(example = 50)]
    pub max_participants: i32,
    #[schema(example = 13)]
    pub current_participants: i32,
    #[schema(example = 26)]
    pub fill_percentage: i32,
    #[schema(example = true)]
    pub is_active: bool,
}

impl From<game::Model> for GameStats {
    fn from(m: game::Model) -> Self {
        Self {
            fill_percentage: fill_percentage(m.current_participants, m.max_participants),
            name: m.name,
            max_participants: m.max_participants,
            current_participants: m.current_participants,
            is_active: m.is_active,
        }
    }
}

/// Response for `GET /api/games-stats`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct GameStatsResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 5)]
    pub count: usize,
    pub games: Vec<GameStats>,
}
