use playdeck_dto::games::{Game, Genre};
use playdeck_dto::types::{PlatformType, ResourceId};

pub fn game(id: i64, title: &str) -> Game {
    Game {
        id: ResourceId::Int(id),
        title: title.to_string(),
        description: String::new(),
        rating: 0.0,
        platform: PlatformType::Ps5,
        genre: None,
        max_players: None,
        popular: false,
        is_new: false,
        release_date: None,
        image_url: None,
        play_time: None,
    }
}

pub fn genre(id: i64, name: &str) -> Option<Genre> {
    Some(Genre {
        id: ResourceId::Int(id),
        name: name.to_string(),
    })
}
