use serde_json::{Map, Value, json};

use folio_domain::{
	MatchType, NumericValue, SearchResult, StrategyKey, StrategyRegistry, VectorIndexKind,
	build_rerank_document, classify_intent, coerce_date, coerce_number, cypher, merge_results,
	normalize_row,
};

fn result(id: &str, score: f64, match_type: MatchType) -> SearchResult {
	SearchResult { id: id.to_string(), score, match_type, ..Default::default() }
}

fn row(value: Value) -> Map<String, Value> {
	match value {
		Value::Object(map) => map,
		_ => panic!("Row fixture must be an object."),
	}
}

#[test]
fn numeric_coercion_handles_every_representation() {
	assert_eq!(coerce_number(Some(&json!(3.5))), 3.5);
	assert_eq!(coerce_number(Some(&json!("42"))), 42.0);
	assert_eq!(coerce_number(Some(&json!("not-a-number"))), 0.0);
	assert_eq!(coerce_number(Some(&json!({ "low": 17, "high": 0 }))), 17.0);
	assert_eq!(coerce_number(Some(&json!([1, 2]))), 0.0);
	assert_eq!(coerce_number(None), 0.0);
	assert_eq!(coerce_number(Some(&Value::Null)), 0.0);
}

#[test]
fn numeric_coercion_is_always_finite() {
	for value in [
		json!("NaN"),
		json!("-inf"),
		json!("1e400"),
		json!({ "low": "x", "high": 0 }),
		json!(false),
		json!({}),
	] {
		let number = NumericValue::classify(&value).to_f64();

		assert!(number.is_finite(), "Non-finite coercion for {value}.");
	}
}

#[test]
fn date_coercion_covers_objects_strings_and_absence() {
	assert_eq!(coerce_date(Some(&json!({ "year": 2023, "month": 6, "day": 1 }))), "2023-06-01");
	assert_eq!(
		coerce_date(Some(&json!({
			"year": { "low": 2023, "high": 0 },
			"month": { "low": 6, "high": 0 },
			"day": { "low": 1, "high": 0 }
		}))),
		"2023-06-01"
	);
	assert_eq!(coerce_date(Some(&json!("2022-11-30"))), "2022-11-30");
	assert_eq!(coerce_date(Some(&json!(2021))), "2021");
	assert_eq!(coerce_date(Some(&Value::Null)), "");
	assert_eq!(coerce_date(None), "");
}

#[test]
fn normalizer_fills_defaults_for_sparse_rows() {
	let normalized = normalize_row(&row(json!({ "id": "p-1" })), MatchType::Template, 3);

	assert_eq!(normalized.id, "p-1");
	assert_eq!(normalized.title, "");
	assert_eq!(normalized.role, "");
	assert_eq!(normalized.completed_date, "");
	assert!(normalized.technologies.is_empty());
	assert!(normalized.skills.is_empty());
	assert!(normalized.patterns.is_empty());
	assert_eq!(normalized.complexity, None);
	assert_eq!(normalized.code_snippets, None);
	assert_eq!(normalized.achievements, None);
	assert_eq!(normalized.score, 0.0);
	assert_eq!(normalized.result_type, "project");
	assert_eq!(normalized.match_type, MatchType::Template);
}

#[test]
fn normalizer_reads_full_rows() {
	let normalized = normalize_row(
		&row(json!({
			"id": "p-2",
			"title": "Graph Explorer",
			"description": "Interactive graph UI",
			"role": "Lead",
			"impact": "Cut query time in half",
			"completedDate": { "year": 2024, "month": 2, "day": 29 },
			"complexity": { "low": 8, "high": 0 },
			"fileCount": "120",
			"technologies": ["React", null, "Neo4j"],
			"codeSnippets": [
				{ "language": "ts", "code": "a()" },
				{ "language": "ts", "code": "b()" },
				{ "language": "ts", "code": "c()" },
				{ "language": "ts", "code": "d()" }
			],
			"score": "0.75",
			"resultType": "project"
		})),
		MatchType::Graph,
		3,
	);

	assert_eq!(normalized.completed_date, "2024-02-29");
	assert_eq!(normalized.complexity, Some(8.0));
	assert_eq!(normalized.file_count, Some(120.0));
	assert_eq!(normalized.technologies, vec!["React".to_string(), "Neo4j".to_string()]);
	assert_eq!(normalized.code_snippets.as_ref().map(Vec::len), Some(3));
	assert_eq!(normalized.impact.as_deref(), Some("Cut query time in half"));
	assert_eq!(normalized.score, 0.75);
}

#[test]
fn merge_combines_overlapping_ids() {
	let vector = vec![result("1", 0.8, MatchType::Semantic)];
	let graph = vec![result("1", 0.6, MatchType::Graph), SearchResult {
		id: "2".to_string(),
		score: 0.5,
		..Default::default()
	}];
	let merged = merge_results(vector, graph, 1.2);

	assert_eq!(merged.len(), 2);
	assert_eq!(merged[0].id, "1");
	assert_eq!(merged[0].match_type, MatchType::Hybrid);
	assert!((merged[0].score - 1.56).abs() < 1e-9);
	assert_eq!(merged[1].id, "2");
	assert_eq!(merged[1].match_type, MatchType::Graph);
	assert!((merged[1].score - 0.5).abs() < 1e-9);
}

#[test]
fn merge_yields_unique_ids_sorted_by_score() {
	let vector = vec![
		result("a", 0.1, MatchType::Semantic),
		result("b", 0.9, MatchType::Semantic),
		result("c", 0.4, MatchType::Semantic),
	];
	let graph = vec![
		result("c", 2.0, MatchType::Template),
		result("d", 0.3, MatchType::Template),
		result("a", 0.05, MatchType::Template),
	];
	let merged = merge_results(vector, graph, 1.2);
	let ids: Vec<&str> = merged.iter().map(|item| item.id.as_str()).collect();

	assert_eq!(ids, vec!["c", "b", "d", "a"]);
	assert!(merged.windows(2).all(|pair| pair[0].score >= pair[1].score));

	let c = &merged[0];

	assert!((c.score - (0.4 * 1.2 + 2.0)).abs() < 1e-9);
	assert_eq!(c.match_type, MatchType::Hybrid);
	assert_eq!(merged[2].match_type, MatchType::Template);
}

#[test]
fn merge_keeps_first_seen_order_on_ties() {
	let graph = vec![result("x", 1.0, MatchType::Graph), result("y", 1.0, MatchType::Graph)];
	let merged = merge_results(Vec::new(), graph, 1.2);

	assert_eq!(merged[0].id, "x");
	assert_eq!(merged[1].id, "y");
}

#[test]
fn rerank_document_skips_empty_fields() {
	let doc = build_rerank_document(&SearchResult {
		title: "Test".to_string(),
		description: "Desc".to_string(),
		role: "Dev".to_string(),
		impact: None,
		..Default::default()
	});

	assert_eq!(doc, "Test | Desc | Dev");
}

#[test]
fn rerank_document_appends_labelled_lists() {
	let doc = build_rerank_document(&SearchResult {
		title: "Folio".to_string(),
		impact: Some("Shipped".to_string()),
		technologies: vec!["Rust".to_string(), "Neo4j".to_string()],
		patterns: vec!["CQRS".to_string()],
		..Default::default()
	});

	assert_eq!(doc, "Folio | Shipped | Technologies: Rust, Neo4j | Patterns: CQRS");
}

#[test]
fn classifier_follows_priority_order() {
	assert_eq!(classify_intent("work experience with react"), StrategyKey::Employment);
	assert_eq!(classify_intent(""), StrategyKey::General);
	assert_eq!(classify_intent("Which projects use React?"), StrategyKey::Technology);
	assert_eq!(classify_intent("What leadership skills are shown?"), StrategyKey::Leadership);
	assert_eq!(classify_intent("biggest achievement at that company"), StrategyKey::Employment);
	assert_eq!(classify_intent("any award winning work?"), StrategyKey::Achievement);
	assert_eq!(classify_intent("Which university degree?"), StrategyKey::Education);
	assert_eq!(classify_intent("strongest skills"), StrategyKey::Skill);
	assert_eq!(classify_intent("event-driven architecture"), StrategyKey::Pattern);
	assert_eq!(classify_intent("show me some code"), StrategyKey::General);
	assert_eq!(classify_intent("hello there"), StrategyKey::General);
}

#[test]
fn match_type_labels_agree_with_wire_form() {
	for match_type in [MatchType::Semantic, MatchType::Graph, MatchType::Hybrid, MatchType::Template]
	{
		assert_eq!(serde_json::to_value(match_type).expect("serializes"), json!(match_type.as_str()));
	}
}

#[test]
fn wide_integer_ids_stay_distinct() {
	let first =
		normalize_row(&row(json!({ "id": { "low": 0, "high": 2_097_152 } })), MatchType::Graph, 3);
	let second =
		normalize_row(&row(json!({ "id": { "low": 1, "high": 2_097_152 } })), MatchType::Graph, 3);
	let negative_low =
		normalize_row(&row(json!({ "id": { "low": -1, "high": 0 } })), MatchType::Graph, 3);

	assert_eq!(first.id, "9007199254740992");
	assert_eq!(second.id, "9007199254740993");
	assert_eq!(negative_low.id, "4294967295");
}

#[test]
fn employment_similarity_filters_on_completion_date() {
	let registry = StrategyRegistry::new();
	let employment = registry.vector_query(VectorIndexKind::Employment).as_str();
	let project = registry.vector_query(VectorIndexKind::Project).as_str();

	assert!(employment.contains("e.endDate >= date($dateStart)"));
	assert!(employment.contains("e.endDate <= date($dateEnd)"));
	assert!(!employment.contains("e.startDate"));
	assert!(project.contains("p.completedDate >= date($dateStart)"));
	assert!(project.contains("p.completedDate <= date($dateEnd)"));
}

#[test]
fn strategy_keys_parse_case_insensitively() {
	assert_eq!("Technology".parse::<StrategyKey>(), Ok(StrategyKey::Technology));
	assert_eq!(" general ".parse::<StrategyKey>(), Ok(StrategyKey::General));
	assert!("projects".parse::<StrategyKey>().is_err());
}

#[test]
fn templates_bind_request_data_as_parameters() {
	let registry = StrategyRegistry::new();
	let query = "'}) DETACH DELETE n //";

	for definition in registry.iter() {
		let text = definition.query.as_str();

		assert!(text.contains("$keywords") || text.contains("$skillCategory"));
		assert!(text.contains("LIMIT $limit"));
		assert!(!text.contains(query));
		assert!(!definition.description.is_empty());

		let params = registry.params(definition.key, query, 7);

		assert_eq!(params.get(cypher::PARAM_QUERY), Some(&json!(query)));
		assert_eq!(params.get(cypher::PARAM_LIMIT), Some(&json!(7)));
	}

	let leadership = registry.params(StrategyKey::Leadership, "mentoring", 5);

	assert!(leadership.contains_key(cypher::PARAM_LEADERSHIP_TERMS));
	assert_eq!(leadership.get(cypher::PARAM_SKILL_CATEGORY), Some(&json!("leadership")));
}

#[test]
fn relationship_constants_are_spliced_into_templates() {
	let registry = StrategyRegistry::new();

	assert!(
		registry
			.get(StrategyKey::Technology)
			.query
			.as_str()
			.contains(&format!("[:{}]", cypher::REL_USES_TECHNOLOGY))
	);
	assert!(
		registry
			.get(StrategyKey::Pattern)
			.query
			.as_str()
			.contains(&format!("[:{}]", cypher::REL_IMPLEMENTS_PATTERN))
	);

	for kind in VectorIndexKind::ALL {
		let text = registry.vector_query(kind).as_str();

		assert!(text.contains("db.index.vector.queryNodes($indexName, $candidateCount, $embedding)"));
		assert!(text.contains("LIMIT $limit"));
	}
}

#[test]
fn search_result_serializes_camel_case_with_stable_code_field() {
	let value = serde_json::to_value(SearchResult {
		id: "p-9".to_string(),
		match_type: MatchType::Semantic,
		..Default::default()
	})
	.expect("Failed to serialize result.");

	assert_eq!(value.get("matchType"), Some(&json!("semantic")));
	assert_eq!(value.get("resultType"), Some(&json!("project")));
	assert_eq!(value.get("codeSnippets"), Some(&Value::Null));
	assert_eq!(value.get("completedDate"), Some(&json!("")));
	assert!(value.get("impact").is_none());
}
