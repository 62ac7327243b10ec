use crate::slug::slugify;
use playdeck_dto::consoles::Console;
use playdeck_dto::events::Event;
use playdeck_dto::games::Game;

/// Anything with a human title a slug can be derived from.
pub trait Titled {
    fn title(&self) -> &str;

    fn slug(&self) -> String {
        slugify(self.title())
    }
}

impl Titled for Game {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Titled for Console {
    fn title(&self) -> &str {
        &self.name
    }
}

impl Titled for Event {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Which pass of the matching policy found the item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchKind {
    Exact,
    CaseInsensitive,
    Substring,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::CaseInsensitive => "case_insensitive",
            MatchKind::Substring => "substring",
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct SlugMatch<'a, T> {
    pub item: &'a T,
    pub index: usize,
    pub kind: MatchKind,
}

/// Find the item a slug refers to.
///
/// Passes are tried in order, exact, then case-insensitive, then substring in
/// either direction. Within a pass the first item in collection order wins.
/// Empty slugs never take part in the substring pass.
pub fn find_by_slug<'a, T: Titled>(items: &'a [T], requested: &str) -> Option<SlugMatch<'a, T>> {
    let slugs: Vec<String> = items.iter().map(Titled::slug).collect();
    let requested_lower = requested.to_lowercase();

    let exact = |slug: &str| slug == requested;
    let case_insensitive = |slug: &str| slug.to_lowercase() == requested_lower;
    let substring = |slug: &str| {
        !slug.is_empty()
            && !requested.is_empty()
            && (slug.contains(requested) || requested.contains(slug))
    };

    let passes: [(MatchKind, &dyn Fn(&str) -> bool); 3] = [
        (MatchKind::Exact, &exact),
        (MatchKind::CaseInsensitive, &case_insensitive),
        (MatchKind::Substring, &substring),
    ];

    for (kind, is_match) in passes {
        if let Some(index) = slugs.iter().position(|slug| is_match(slug.as_str())) {
            return Some(SlugMatch {
                item: &items[index],
                index,
                kind,
            });
        }
    }
    None
}
