//! Trusted structural pieces of the graph queries.
//!
//! Only the constants in this module are ever spliced into query text, and only while the
//! registry is built. Request data reaches the database exclusively through bound parameters.

pub const LABEL_PROJECT: &str = "Project";
pub const LABEL_EMPLOYMENT: &str = "Employment";
pub const LABEL_EDUCATION: &str = "Education";
pub const LABEL_TECHNOLOGY: &str = "Technology";
pub const LABEL_SKILL: &str = "Skill";
pub const LABEL_PATTERN: &str = "Pattern";
pub const LABEL_ACHIEVEMENT: &str = "Achievement";
pub const LABEL_CODE_SNIPPET: &str = "CodeSnippet";

pub const REL_USES_TECHNOLOGY: &str = "USES_TECHNOLOGY";
pub const REL_DEMONSTRATES_SKILL: &str = "DEMONSTRATES_SKILL";
pub const REL_IMPLEMENTS_PATTERN: &str = "IMPLEMENTS_PATTERN";
pub const REL_HAS_ACHIEVEMENT: &str = "HAS_ACHIEVEMENT";
pub const REL_HAS_SNIPPET: &str = "HAS_SNIPPET";

pub const PARAM_QUERY: &str = "query";
pub const PARAM_KEYWORDS: &str = "keywords";
pub const PARAM_LIMIT: &str = "limit";
pub const PARAM_LEADERSHIP_TERMS: &str = "leadershipTerms";
pub const PARAM_SKILL_CATEGORY: &str = "skillCategory";

pub const PARAM_INDEX_NAME: &str = "indexName";
pub const PARAM_CANDIDATE_COUNT: &str = "candidateCount";
pub const PARAM_EMBEDDING: &str = "embedding";
pub const PARAM_MIN_COMPLEXITY: &str = "minComplexity";
pub const PARAM_DATE_START: &str = "dateStart";
pub const PARAM_DATE_END: &str = "dateEnd";
pub const PARAM_TECHNOLOGIES: &str = "technologies";
pub const PARAM_INCLUDE_CODE: &str = "includeCode";
pub const PARAM_MAX_SNIPPETS: &str = "maxSnippets";

/// Projects matched through one relationship type, scored by the number of distinct related
/// nodes whose name contains a query keyword.
pub(crate) fn project_by_relation(relation: &str, label: &str) -> String {
	format!(
		"\
MATCH (p:{LABEL_PROJECT})-[:{relation}]->(hit:{label})
WHERE any(keyword IN ${PARAM_KEYWORDS} WHERE toLower(hit.name) CONTAINS keyword)
WITH p, count(DISTINCT hit) AS hits
WITH p, toFloat(hits) AS score
{}",
		project_projection()
	)
}

pub(crate) fn project_general() -> String {
	format!(
		"\
MATCH (p:{LABEL_PROJECT})
WITH p, size([keyword IN ${PARAM_KEYWORDS}
	WHERE toLower(coalesce(p.title, '') + ' ' + coalesce(p.description, '')) CONTAINS keyword]) AS hits
WHERE hits > 0 OR size(${PARAM_KEYWORDS}) = 0
WITH p, toFloat(hits) AS score
{}",
		project_projection()
	)
}

pub(crate) fn employment_by_text() -> String {
	format!(
		"\
MATCH (e:{LABEL_EMPLOYMENT})
WITH e, size([keyword IN ${PARAM_KEYWORDS}
	WHERE toLower(coalesce(e.company, '') + ' ' + coalesce(e.position, '') + ' ' + coalesce(e.description, '')) CONTAINS keyword]) AS hits
WITH e, 1.0 + toFloat(hits) AS score
{}",
		employment_projection("employment")
	)
}

pub(crate) fn employment_by_achievement() -> String {
	format!(
		"\
MATCH (e:{LABEL_EMPLOYMENT})-[:{REL_HAS_ACHIEVEMENT}]->(hit:{LABEL_ACHIEVEMENT})
WITH e, sum(size([keyword IN ${PARAM_KEYWORDS} WHERE toLower(hit.description) CONTAINS keyword])) AS hits
WITH e, 1.0 + toFloat(hits) AS score
{}",
		employment_projection("achievement")
	)
}

pub(crate) fn employment_by_leadership() -> String {
	format!(
		"\
MATCH (e:{LABEL_EMPLOYMENT})
OPTIONAL MATCH (e)-[:{REL_DEMONSTRATES_SKILL}]->(lead:{LABEL_SKILL})
	WHERE toLower(coalesce(lead.category, '')) = ${PARAM_SKILL_CATEGORY}
OPTIONAL MATCH (e)-[:{REL_HAS_ACHIEVEMENT}]->(a:{LABEL_ACHIEVEMENT})
	WHERE any(term IN ${PARAM_LEADERSHIP_TERMS} WHERE toLower(a.description) CONTAINS term)
WITH e, count(DISTINCT lead) + count(DISTINCT a) AS hits
WHERE hits > 0
WITH e, toFloat(hits) AS score
{}",
		employment_projection("leadership")
	)
}

pub(crate) fn education_by_text() -> String {
	format!(
		"\
MATCH (ed:{LABEL_EDUCATION})
WITH ed, size([keyword IN ${PARAM_KEYWORDS}
	WHERE toLower(coalesce(ed.institution, '') + ' ' + coalesce(ed.degree, '') + ' ' + coalesce(ed.field, '')) CONTAINS keyword]) AS hits
RETURN
	ed.id AS id,
	ed.degree AS title,
	ed.description AS description,
	ed.field AS role,
	ed.graduationDate AS completedDate,
	ed.institution AS company,
	1.0 + toFloat(hits) AS score,
	'education' AS resultType
ORDER BY score DESC, completedDate DESC
LIMIT ${PARAM_LIMIT}"
	)
}

pub(crate) fn project_vector_search() -> String {
	format!(
		"\
CALL db.index.vector.queryNodes(${PARAM_INDEX_NAME}, ${PARAM_CANDIDATE_COUNT}, ${PARAM_EMBEDDING})
YIELD node AS p, score
WHERE (${PARAM_MIN_COMPLEXITY} IS NULL OR p.complexity >= ${PARAM_MIN_COMPLEXITY})
	AND (${PARAM_DATE_START} IS NULL OR p.completedDate >= date(${PARAM_DATE_START}))
	AND (${PARAM_DATE_END} IS NULL OR p.completedDate <= date(${PARAM_DATE_END}))
OPTIONAL MATCH (p)-[:{REL_USES_TECHNOLOGY}]->(t:{LABEL_TECHNOLOGY})
WITH p, score, collect(DISTINCT t.name) AS technologies
WHERE size(${PARAM_TECHNOLOGIES}) = 0
	OR any(tech IN technologies WHERE toLower(tech) IN ${PARAM_TECHNOLOGIES})
OPTIONAL MATCH (p)-[:{REL_DEMONSTRATES_SKILL}]->(s:{LABEL_SKILL})
WITH p, score, technologies, collect(DISTINCT s.name) AS skills
OPTIONAL MATCH (p)-[:{REL_IMPLEMENTS_PATTERN}]->(pt:{LABEL_PATTERN})
WITH p, score, technologies, skills, collect(DISTINCT pt.name) AS patterns
OPTIONAL MATCH (p)-[:{REL_HAS_SNIPPET}]->(c:{LABEL_CODE_SNIPPET})
WITH p, score, technologies, skills, patterns,
	collect(c {{ .language, .code, .description, .filePath }}) AS snippets
RETURN
	p.id AS id,
	p.title AS title,
	p.description AS description,
	p.role AS role,
	p.impact AS impact,
	p.completedDate AS completedDate,
	p.complexity AS complexity,
	p.fileCount AS fileCount,
	p.liveUrl AS liveUrl,
	p.githubUrl AS githubUrl,
	technologies,
	skills,
	patterns,
	CASE WHEN ${PARAM_INCLUDE_CODE} THEN snippets[0..${PARAM_MAX_SNIPPETS}] ELSE null END AS codeSnippets,
	score,
	'project' AS resultType
ORDER BY score DESC
LIMIT ${PARAM_LIMIT}"
	)
}

pub(crate) fn employment_vector_search() -> String {
	format!(
		"\
CALL db.index.vector.queryNodes(${PARAM_INDEX_NAME}, ${PARAM_CANDIDATE_COUNT}, ${PARAM_EMBEDDING})
YIELD node AS e, score
WHERE (${PARAM_DATE_START} IS NULL OR e.endDate >= date(${PARAM_DATE_START}))
	AND (${PARAM_DATE_END} IS NULL OR e.endDate <= date(${PARAM_DATE_END}))
OPTIONAL MATCH (e)-[:{REL_USES_TECHNOLOGY}]->(t:{LABEL_TECHNOLOGY})
WITH e, score, collect(DISTINCT t.name) AS technologies
WHERE size(${PARAM_TECHNOLOGIES}) = 0
	OR any(tech IN technologies WHERE toLower(tech) IN ${PARAM_TECHNOLOGIES})
OPTIONAL MATCH (e)-[:{REL_HAS_ACHIEVEMENT}]->(a:{LABEL_ACHIEVEMENT})
WITH e, score, technologies, collect(DISTINCT a.description) AS achievements
OPTIONAL MATCH (e)-[:{REL_DEMONSTRATES_SKILL}]->(s:{LABEL_SKILL})
WITH e, score, technologies, achievements, collect(DISTINCT s.name) AS skills
RETURN
	e.id AS id,
	coalesce(e.position, '') + ' at ' + coalesce(e.company, '') AS title,
	e.description AS description,
	e.position AS role,
	e.endDate AS completedDate,
	e.company AS company,
	e.position AS position,
	achievements,
	technologies,
	skills,
	score,
	'employment' AS resultType
ORDER BY score DESC
LIMIT ${PARAM_LIMIT}"
	)
}

fn project_projection() -> String {
	format!(
		"\
OPTIONAL MATCH (p)-[:{REL_USES_TECHNOLOGY}]->(t:{LABEL_TECHNOLOGY})
WITH p, score, collect(DISTINCT t.name) AS technologies
OPTIONAL MATCH (p)-[:{REL_DEMONSTRATES_SKILL}]->(s:{LABEL_SKILL})
WITH p, score, technologies, collect(DISTINCT s.name) AS skills
OPTIONAL MATCH (p)-[:{REL_IMPLEMENTS_PATTERN}]->(pt:{LABEL_PATTERN})
WITH p, score, technologies, skills, collect(DISTINCT pt.name) AS patterns
RETURN
	p.id AS id,
	p.title AS title,
	p.description AS description,
	p.role AS role,
	p.impact AS impact,
	p.completedDate AS completedDate,
	p.complexity AS complexity,
	p.fileCount AS fileCount,
	p.liveUrl AS liveUrl,
	p.githubUrl AS githubUrl,
	technologies,
	skills,
	patterns,
	score,
	'project' AS resultType
ORDER BY score DESC, completedDate DESC
LIMIT ${PARAM_LIMIT}"
	)
}

fn employment_projection(result_type: &'static str) -> String {
	format!(
		"\
OPTIONAL MATCH (e)-[:{REL_HAS_ACHIEVEMENT}]->(a:{LABEL_ACHIEVEMENT})
WITH e, score, collect(DISTINCT a.description) AS achievements
OPTIONAL MATCH (e)-[:{REL_USES_TECHNOLOGY}]->(t:{LABEL_TECHNOLOGY})
WITH e, score, achievements, collect(DISTINCT t.name) AS technologies
OPTIONAL MATCH (e)-[:{REL_DEMONSTRATES_SKILL}]->(s:{LABEL_SKILL})
WITH e, score, achievements, technologies, collect(DISTINCT s.name) AS skills
RETURN
	e.id AS id,
	coalesce(e.position, '') + ' at ' + coalesce(e.company, '') AS title,
	e.description AS description,
	e.position AS role,
	e.endDate AS completedDate,
	e.company AS company,
	e.position AS position,
	achievements,
	technologies,
	skills,
	score,
	'{result_type}' AS resultType
ORDER BY score DESC, completedDate DESC
LIMIT ${PARAM_LIMIT}"
	)
}
