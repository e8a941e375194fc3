use std::{collections::HashSet, sync::Arc};

use crate::{Result, SearchContext, session::SessionGuard, tool::GraphSelection};
use folio_domain::{MatchType, SearchResult, normalize_row};

/// Runs one strategy template through its own session and normalizes the rows.
///
/// Rows repeating an id already seen are dropped; templates order by score, so the first one is
/// the best.
pub(crate) async fn search(
	ctx: Arc<SearchContext>,
	selection: GraphSelection,
	match_type: MatchType,
) -> Result<Vec<SearchResult>> {
	let mut session = SessionGuard::open(ctx.sessions.as_ref()).await?;
	let outcome = session.execute(&selection.template, &selection.params).await;

	session.release().await;

	let rows = outcome?;
	let max_snippets = ctx.cfg.search.max_code_snippets as usize;
	let mut seen = HashSet::with_capacity(rows.len());
	let results: Vec<SearchResult> = rows
		.iter()
		.map(|row| normalize_row(row, match_type, max_snippets))
		.filter(|result| seen.insert(result.id.clone()))
		.collect();

	tracing::debug!(
		strategy = selection.strategy.as_str(),
		match_type = match_type.as_str(),
		rows = rows.len(),
		results = results.len(),
		"Graph strategy queried."
	);

	Ok(results)
}
