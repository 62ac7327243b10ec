/// Derive the URL slug of a title.
///
/// The title is lowercased and trimmed, every character outside
/// `[a-z0-9 -]` is dropped, and runs of spaces and hyphens become a single
/// hyphen. Leading and trailing hyphens are removed. Applying it to its own
/// output changes nothing.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for ch in lowered.chars() {
        match ch {
            'a'..='z' | '0'..='9' => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(ch);
            }
            ' ' | '-' => pending_hyphen = true,
            _ => {}
        }
    }

    slug
}
