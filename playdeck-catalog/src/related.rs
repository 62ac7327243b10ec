use playdeck_dto::games::Game;
use rand::seq::SliceRandom;
use rand::Rng;

pub const GENRE_BONUS: u32 = 10;
pub const PLATFORM_BONUS: u32 = 8;
pub const PLAYERS_BONUS: u32 = 5;
pub const RATING_BONUS: u32 = 4;
pub const POPULAR_BONUS: u32 = 3;
pub const NEW_BONUS: u32 = 2;

pub const MAX_PLAYER_DIFFERENCE: u32 = 1;
pub const MAX_RATING_DIFFERENCE: f64 = 0.5;

/// How many of the best scored candidates are considered.
pub const CANDIDATE_POOL: usize = 8;
/// How many related games are returned at most.
pub const RELATED_LIMIT: usize = 4;

/// How the final related games are drawn from the candidate pool.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RelatedOrder {
    /// Shuffle the pool so repeated views show different games.
    #[default]
    Shuffled,
    /// Best scores first, ties in collection order.
    Stable,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Scored<'a> {
    pub game: &'a Game,
    pub score: u32,
}

/// Score how related `candidate` is to `target`. Every bonus is independent.
pub fn relatedness(target: &Game, candidate: &Game) -> u32 {
    let mut score = 0;

    if let (Some(a), Some(b)) = (&target.genre, &candidate.genre) {
        if a.id == b.id {
            score += GENRE_BONUS;
        }
    }
    if target.platform == candidate.platform {
        score += PLATFORM_BONUS;
    }
    if let (Some(a), Some(b)) = (target.max_players, candidate.max_players) {
        if a.abs_diff(b) <= MAX_PLAYER_DIFFERENCE {
            score += PLAYERS_BONUS;
        }
    }
    if (target.rating - candidate.rating).abs() <= MAX_RATING_DIFFERENCE {
        score += RATING_BONUS;
    }
    if candidate.popular {
        score += POPULAR_BONUS;
    }
    if candidate.is_new {
        score += NEW_BONUS;
    }

    score
}

/// Every other game, best first, cut down to the candidate pool. Games sharing
/// the target's identifier are left out.
pub fn ranked_candidates<'a>(target: &Game, items: &'a [Game]) -> Vec<Scored<'a>> {
    let mut scored: Vec<Scored<'a>> = items
        .iter()
        .filter(|game| game.id != target.id)
        .map(|game| Scored {
            game,
            score: relatedness(target, game),
        })
        .collect();

    // Stable, so equal scores keep their collection order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(CANDIDATE_POOL);
    scored
}

/// Pick the games to show next to `target`.
pub fn related_games<'a>(target: &Game, items: &'a [Game], order: RelatedOrder) -> Vec<&'a Game> {
    match order {
        RelatedOrder::Shuffled => related_games_with_rng(target, items, &mut rand::thread_rng()),
        RelatedOrder::Stable => ranked_candidates(target, items)
            .into_iter()
            .take(RELATED_LIMIT)
            .map(|scored| scored.game)
            .collect(),
    }
}

/// Shuffled selection with a caller provided random source.
pub fn related_games_with_rng<'a, R: Rng + ?Sized>(
    target: &Game,
    items: &'a [Game],
    rng: &mut R,
) -> Vec<&'a Game> {
    let mut pool = ranked_candidates(target, items);
    pool.shuffle(rng);
    pool.into_iter()
        .take(RELATED_LIMIT)
        .map(|scored| scored.game)
        .collect()
}
