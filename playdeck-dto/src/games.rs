use crate::params::PagingParams;
use crate::types::{PlatformType, ResourceId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A game genre.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: ResourceId,
    pub name: String,
}

/// A game in the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// The identifier for the game, unique across the catalog.
    pub id: ResourceId,

    /// The display title. Slugs are derived from it.
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Average rating, between 0 and 5.
    #[serde(default)]
    pub rating: f64,

    /// The console family this game is played on.
    #[serde(alias = "console_type", alias = "consoleType")]
    pub platform: PlatformType,

    #[serde(default)]
    pub genre: Option<Genre>,

    /// The maximum number of players in a single session.
    #[serde(default, alias = "max_players")]
    pub max_players: Option<u32>,

    #[serde(default, alias = "is_popular", alias = "isPopular")]
    pub popular: bool,

    #[serde(default, rename = "new", alias = "is_new", alias = "isNew")]
    pub is_new: bool,

    #[serde(default, alias = "release_date")]
    pub release_date: Option<NaiveDate>,

    #[serde(default, alias = "image_url", alias = "image")]
    pub image_url: Option<String>,

    /// Estimated play duration, as the API formats it (e.g. `"30-40 hours"`).
    #[serde(default, alias = "play_time", alias = "duration")]
    pub play_time: Option<String>,
}

/// Parameters for filtering the list of games.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameListQuery {
    /// Only games for this console family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformType>,

    /// Only games of this genre (identifier or name, as the API accepts).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    /// Free text search on the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Only popular games.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popular: Option<bool>,

    #[serde(flatten)]
    pub paging: PagingParams,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCreateRequest<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub rating: f64,
    pub platform: PlatformType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_players: Option<u32>,
    pub popular: bool,
    #[serde(rename = "new")]
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_time: Option<&'a str>,
}

/// Partial update of a game. Fields left to `None` are not sent.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_players: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popular: Option<bool>,
    #[serde(rename = "new", skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_time: Option<&'a str>,
}

crate::impl_payload!(Game);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_camel_case_game() {
        let game: Game = serde_json::from_value(serde_json::json!({
            "id": 3,
            "title": "Gran Turismo 7",
            "description": "Racing.",
            "rating": 4.5,
            "platform": "ps5",
            "genre": { "id": 2, "name": "Racing" },
            "maxPlayers": 2,
            "isPopular": true,
            "releaseDate": "2022-03-04",
            "imageUrl": "/img/gt7.jpg",
            "playTime": "40+ hours"
        }))
        .unwrap();

        assert_eq!(game.id, ResourceId::Int(3));
        assert_eq!(game.platform, PlatformType::Ps5);
        assert_eq!(game.max_players, Some(2));
        assert!(game.popular);
        assert!(!game.is_new);
        assert_eq!(
            game.release_date,
            NaiveDate::from_ymd_opt(2022, 3, 4)
        );
        assert_eq!(game.genre.unwrap().name, "Racing");
    }

    #[test]
    fn decodes_snake_case_game() {
        let game: Game = serde_json::from_value(serde_json::json!({
            "id": "g1",
            "title": "God of War",
            "console_type": "ps4",
            "max_players": 1,
            "is_new": true
        }))
        .unwrap();

        assert_eq!(game.platform, PlatformType::Ps4);
        assert_eq!(game.max_players, Some(1));
        assert!(game.is_new);
        assert_eq!(game.rating, 0.0);
        assert_eq!(game.genre, None);
    }

    #[test]
    fn update_request_only_sends_set_fields() {
        let body = serde_json::to_value(GameUpdateRequest {
            rating: Some(4.0),
            is_new: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "rating": 4.0, "new": false }));
    }
}
