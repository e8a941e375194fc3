use crate::result::SearchResult;

const SEPARATOR: &str = " | ";

/// Flattens a result into the text sent to the reranker.
pub fn build_rerank_document(result: &SearchResult) -> String {
	let mut parts: Vec<String> = Vec::with_capacity(7);

	for field in [&result.title, &result.description, &result.role] {
		if !field.is_empty() {
			parts.push(field.clone());
		}
	}

	if let Some(impact) = result.impact.as_deref().filter(|impact| !impact.is_empty()) {
		parts.push(impact.to_string());
	}

	for (label, values) in [
		("Technologies", &result.technologies),
		("Skills", &result.skills),
		("Patterns", &result.patterns),
	] {
		if !values.is_empty() {
			parts.push(format!("{label}: {}", values.join(", ")));
		}
	}

	parts.join(SEPARATOR)
}
