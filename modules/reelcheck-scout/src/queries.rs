/// Search queries for a claim, most specific first, capped at `max`.
///
/// The quoted form goes first so exact-phrase coverage is found before the
/// looser variants spend the search budget.
pub fn search_queries(claim: &str, max: usize) -> Vec<String> {
    let claim = claim.trim();
    if claim.is_empty() {
        return Vec::new();
    }

    let mut queries = vec![
        format!("\"{claim}\" news"),
        format!("{claim} latest news"),
        format!("{claim} breaking news report"),
        claim.to_string(),
    ];
    queries.truncate(max);
    queries
}
