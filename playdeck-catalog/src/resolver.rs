use crate::matching::{find_by_slug, MatchKind};
use crate::related::{related_games, RelatedOrder};
use async_trait::async_trait;
use playdeck_dto::client::{Client, Error};
use playdeck_dto::diagnostics::{default_diagnostics, Diagnostic, Diagnostics, ErrorKind};
use playdeck_dto::games::{Game, GameListQuery};
use std::sync::Arc;
use tracing::debug;

/// Where the collection of games comes from.
#[async_trait]
pub trait GameSource: Send + Sync {
    async fn fetch_games(&self) -> Result<Vec<Game>, Error>;
}

#[async_trait]
impl GameSource for Client {
    async fn fetch_games(&self) -> Result<Vec<Game>, Error> {
        self.games_list(&GameListQuery::default()).await
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameDetail {
    pub game: Game,
    pub matched_by: MatchKind,
    pub related: Vec<Game>,
}

/// Why there is nothing to show. All of these render the same way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The collection was fetched but no title matched.
    NoMatch,
    /// The collection could not be decoded.
    Malformed(String),
    /// The collection could not be fetched.
    Fetch(ErrorKind),
}

impl NotFoundReason {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotFoundReason::NoMatch => ErrorKind::NotFound,
            NotFoundReason::Malformed(_) => ErrorKind::MalformedResponse,
            NotFoundReason::Fetch(kind) => *kind,
        }
    }
}

impl From<Error> for NotFoundReason {
    fn from(error: Error) -> Self {
        match error {
            Error::MalformedResponse(malformed) => NotFoundReason::Malformed(malformed.0),
            other => NotFoundReason::Fetch(other.kind()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DetailState {
    Loading,
    Found(GameDetail),
    NotFound(NotFoundReason),
}

impl DetailState {
    pub fn is_loading(&self) -> bool {
        matches!(self, DetailState::Loading)
    }

    pub fn found(&self) -> Option<&GameDetail> {
        match self {
            DetailState::Found(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Resolve `slug` against an already fetched collection.
pub fn resolve(games: &[Game], slug: &str, order: RelatedOrder) -> DetailState {
    match find_by_slug(games, slug) {
        Some(found) => DetailState::Found(GameDetail {
            game: found.item.clone(),
            matched_by: found.kind,
            related: related_games(found.item, games, order)
                .into_iter()
                .cloned()
                .collect(),
        }),
        None => DetailState::NotFound(NotFoundReason::NoMatch),
    }
}

/// Proof that a load was started. Only the latest ticket may complete.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// The detail page of one game, for the lifetime of one view.
#[derive(Debug)]
pub struct DetailView {
    slug: String,
    order: RelatedOrder,
    state: DetailState,
    generation: u64,
    torn_down: bool,
    diagnostics: Arc<dyn Diagnostics>,
}

impl DetailView {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            order: RelatedOrder::default(),
            state: DetailState::Loading,
            generation: 0,
            torn_down: false,
            diagnostics: default_diagnostics(),
        }
    }

    pub fn with_order(mut self, order: RelatedOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn into_state(self) -> DetailState {
        self.state
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Enter `Loading`. Any ticket handed out before is now stale. Once torn
    /// down the view stays as it is and the returned ticket is never accepted.
    pub fn begin_load(&mut self) -> LoadTicket {
        if self.torn_down {
            return LoadTicket(self.generation);
        }
        self.generation += 1;
        self.state = DetailState::Loading;
        LoadTicket(self.generation)
    }

    /// Start over after a terminal state.
    pub fn retry(&mut self) -> LoadTicket {
        self.begin_load()
    }

    /// Stop accepting results. Called when the view goes away.
    pub fn teardown(&mut self) {
        self.torn_down = true;
    }

    /// Apply the outcome of a fetch. Returns `false`, leaving the state
    /// untouched, when the ticket is stale, the load already completed or the
    /// view was torn down.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<Vec<Game>, Error>) -> bool {
        if self.torn_down || ticket.0 != self.generation || !self.state.is_loading() {
            debug!(slug = %self.slug, ?ticket, "dropping stale result");
            return false;
        }

        self.state = match result {
            Ok(games) => resolve(&games, &self.slug, self.order),
            Err(error) => {
                debug!(slug = %self.slug, %error, "could not fetch games");
                DetailState::NotFound(error.into())
            }
        };

        if let DetailState::NotFound(reason) = &self.state {
            self.diagnostics.emit(Diagnostic::ResolveFailed {
                slug: self.slug.clone(),
                kind: reason.kind(),
            });
        }
        true
    }

    /// Run one fetch cycle.
    pub async fn load<S: GameSource + ?Sized>(&mut self, source: &S) -> &DetailState {
        if self.torn_down {
            return &self.state;
        }
        let ticket = self.begin_load();
        let result = source.fetch_games().await;
        self.complete(ticket, result);
        &self.state
    }
}
