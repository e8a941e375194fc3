use std::collections::HashMap;

use crate::result::{MatchType, SearchResult};

/// Fuses similarity and graph results by id.
///
/// Similarity scores are boosted and seeded first, tagged hybrid. A graph result with the same id
/// adds its score onto the seeded entry; otherwise it is appended as-is. The output is sorted by
/// score, descending, with a stable sort so equal scores keep first-seen order.
pub fn merge_results(
	vector: Vec<SearchResult>,
	graph: Vec<SearchResult>,
	boost: f64,
) -> Vec<SearchResult> {
	let mut merged: Vec<SearchResult> = Vec::with_capacity(vector.len() + graph.len());
	let mut positions: HashMap<String, usize> = HashMap::with_capacity(merged.capacity());

	for mut result in vector {
		result.score *= boost;
		result.match_type = MatchType::Hybrid;

		match positions.get(&result.id) {
			Some(&position) => merged[position] = result,
			None => {
				positions.insert(result.id.clone(), merged.len());
				merged.push(result);
			},
		}
	}

	for result in graph {
		match positions.get(&result.id) {
			Some(&position) => {
				let existing = &mut merged[position];

				existing.score += result.score;
				existing.match_type = MatchType::Hybrid;
			},
			None => {
				positions.insert(result.id.clone(), merged.len());
				merged.push(result);
			},
		}
	}

	merged.sort_by(|a, b| b.score.total_cmp(&a.score));

	merged
}
