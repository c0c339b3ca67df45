use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use askql_domain::SchemaModel;

use crate::edit_state::EditState;

/// Shorter unqualified tokens do not open the suggestion box.
pub const MIN_TOKEN_LEN: usize = 2;

const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "JOIN", "LEFT", "RIGHT", "INNER", "OUTER", "CROSS", "ON", "AND",
    "OR", "NOT", "IN", "IS", "NULL", "TRUE", "FALSE", "LIKE", "ILIKE", "BETWEEN", "EXISTS",
    "CASE", "WHEN", "THEN", "ELSE", "END", "AS", "DISTINCT", "ORDER", "BY", "ASC", "DESC",
    "NULLS", "FIRST", "LAST", "GROUP", "HAVING", "LIMIT", "OFFSET", "UNION", "INTERSECT",
    "EXCEPT", "ALL", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE", "RETURNING", "WITH",
    "RECURSIVE", "COALESCE", "NULLIF", "CAST", "USING", "COUNT", "SUM", "AVG", "MIN", "MAX",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Keyword,
    Table,
    Column,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub text: String,
    pub kind: CompletionKind,
}

impl CompletionCandidate {
    fn new(text: &str, kind: CompletionKind) -> Self {
        Self {
            text: text.to_string(),
            kind,
        }
    }
}

/// Lookup-friendly view of a [`SchemaModel`], rebuilt whenever the model is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutocompleteIndex {
    tables: Vec<String>,
    columns: Vec<String>,
    columns_by_table: HashMap<String, Vec<String>>,
    tables_by_lower: HashMap<String, String>,
}

impl AutocompleteIndex {
    pub fn from_schema(model: &SchemaModel) -> Self {
        let mut index = Self::default();
        let mut seen_columns = HashSet::new();

        for table in model.tables() {
            index.tables.push(table.name.clone());
            index
                .tables_by_lower
                .entry(table.name.to_lowercase())
                .or_insert_with(|| table.name.clone());

            let names: Vec<String> = table.column_names().map(str::to_string).collect();
            for name in &names {
                if seen_columns.insert(name.clone()) {
                    index.columns.push(name.clone());
                }
            }
            index.columns_by_table.insert(table.name.clone(), names);
        }
        index
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Every column name once, in first-seen order, case preserved.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Case-insensitive exact lookup. Tables outside `public` are named
    /// `schema.table`; `public.` may prefix a bare name. Aliases are not
    /// resolved.
    pub fn columns_of(&self, table: &str) -> Option<&[String]> {
        let lower = table.to_lowercase();
        let canonical = self.tables_by_lower.get(&lower).or_else(|| {
            lower
                .strip_prefix("public.")
                .and_then(|bare| self.tables_by_lower.get(bare))
        })?;
        self.columns_by_table.get(canonical).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Computes ranked suggestions for an [`EditState`]. Pure in-memory work.
#[derive(Debug)]
pub struct CompletionEngine {
    keywords: &'static [&'static str],
}

impl Default for CompletionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionEngine {
    pub fn new() -> Self {
        Self { keywords: KEYWORDS }
    }

    /// Whether `state` is worth computing candidates for at all.
    pub fn should_suggest(&self, state: &EditState) -> bool {
        state.qualifier.is_some() || state.token_len() >= MIN_TOKEN_LEN
    }

    pub fn candidates(
        &self,
        index: &AutocompleteIndex,
        state: &EditState,
    ) -> Vec<CompletionCandidate> {
        let prefix = state.active_token.as_str();

        let pool: Vec<CompletionCandidate> = match state
            .qualifier
            .as_deref()
            .and_then(|q| index.columns_of(q))
        {
            Some(columns) => columns
                .iter()
                .map(|c| CompletionCandidate::new(c, CompletionKind::Column))
                .collect(),
            None => index
                .tables()
                .iter()
                .map(|t| CompletionCandidate::new(t, CompletionKind::Table))
                .chain(
                    index
                        .columns()
                        .iter()
                        .map(|c| CompletionCandidate::new(c, CompletionKind::Column)),
                )
                .chain(
                    self.keywords
                        .iter()
                        .map(|k| CompletionCandidate::new(k, CompletionKind::Keyword)),
                )
                .collect(),
        };

        let lower_prefix = prefix.to_lowercase();
        let mut seen = HashSet::new();
        let mut candidates: Vec<CompletionCandidate> = pool
            .into_iter()
            .filter(|c| c.text.to_lowercase().starts_with(&lower_prefix))
            .filter(|c| seen.insert(c.text.clone()))
            .collect();

        candidates.sort_by(|a, b| compare(a, b, prefix));
        candidates
    }
}

// Exact-case prefix matches first, then case-insensitive alphabetical with a
// byte-order tie-break.
fn compare(a: &CompletionCandidate, b: &CompletionCandidate, prefix: &str) -> Ordering {
    let exact_a = a.text.starts_with(prefix);
    let exact_b = b.text.starts_with(prefix);
    exact_b
        .cmp(&exact_a)
        .then_with(|| a.text.to_lowercase().cmp(&b.text.to_lowercase()))
        .then_with(|| a.text.cmp(&b.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use askql_domain::{Column, Table};
    use rstest::rstest;

    fn orders_index() -> AutocompleteIndex {
        let model = SchemaModel::new(
            "shop",
            vec![Table::new(
                "Orders",
                vec![
                    Column::new("ID", "int", false),
                    Column::new("Strength", "int", true),
                ],
            )],
            vec![],
        )
        .unwrap();
        AutocompleteIndex::from_schema(&model)
    }

    fn texts(candidates: &[CompletionCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.text.as_str()).collect()
    }

    fn at_end(content: &str) -> EditState {
        EditState::analyze(content, content.chars().count()).unwrap()
    }

    mod index {
        use super::*;

        #[test]
        fn columns_are_deduplicated_across_tables() {
            let model = SchemaModel::new(
                "shop",
                vec![
                    Table::new("orders", vec![Column::new("id", "int", false), Column::new("total", "int", false)]),
                    Table::new("customers", vec![Column::new("id", "int", false), Column::new("name", "text", false)]),
                ],
                vec![],
            )
            .unwrap();

            let index = AutocompleteIndex::from_schema(&model);

            assert_eq!(index.tables(), ["orders", "customers"]);
            assert_eq!(index.columns(), ["id", "total", "name"]);
            assert_eq!(index.columns_of("CUSTOMERS").unwrap(), ["id", "name"]);
        }

        #[test]
        fn unknown_table_has_no_columns() {
            assert!(orders_index().columns_of("o").is_none());
        }
    }

    mod candidates {
        use super::*;

        #[test]
        fn literal_table_qualifier_scopes_to_its_columns() {
            let engine = CompletionEngine::new();
            let state = at_end("SELECT * FROM Orders WHERE Orders.");

            let result = engine.candidates(&orders_index(), &state);

            assert_eq!(texts(&result), vec!["ID", "Strength"]);
            assert!(result.iter().all(|c| c.kind == CompletionKind::Column));
        }

        #[test]
        fn qualifier_match_ignores_case() {
            let engine = CompletionEngine::new();
            let state = at_end("SELECT orders.st");

            let result = engine.candidates(&orders_index(), &state);

            assert_eq!(texts(&result), vec!["Strength"]);
        }

        #[rstest]
        #[case("SELECT sales.orders.", vec!["region", "total"])]
        #[case("SELECT Sales.Orders.to", vec!["total"])]
        #[case("SELECT public.customers.", vec!["id", "name"])]
        fn schema_qualified_table_scopes_to_its_columns(
            #[case] content: &str,
            #[case] expected: Vec<&str>,
        ) {
            let model = SchemaModel::new(
                "shop",
                vec![
                    Table::new("customers", vec![Column::new("id", "int", false), Column::new("name", "text", false)]),
                    Table::new("sales.orders", vec![Column::new("total", "numeric", false), Column::new("region", "text", true)]),
                ],
                vec![],
            )
            .unwrap();
            let index = AutocompleteIndex::from_schema(&model);

            let result = CompletionEngine::new().candidates(&index, &at_end(content));

            assert_eq!(texts(&result), expected);
        }

        #[test]
        fn alias_qualifier_falls_back_to_the_unqualified_set() {
            let engine = CompletionEngine::new();
            let index = orders_index();
            let state = at_end("SELECT * FROM Orders o WHERE o.");

            let result = engine.candidates(&index, &state);

            let expected_len = index.tables().len() + index.columns().len() + KEYWORDS.len();
            assert_eq!(result.len(), expected_len);
            let names = texts(&result);
            for expected in ["Orders", "ID", "Strength", "SELECT", "WHERE"] {
                assert!(names.contains(&expected), "missing {expected}");
            }
        }

        #[test]
        fn sel_suggests_select() {
            let engine = CompletionEngine::new();

            let result = engine.candidates(&orders_index(), &at_end("SEL"));

            assert_eq!(texts(&result), vec!["SELECT"]);
            assert_eq!(result[0].kind, CompletionKind::Keyword);
        }

        #[test]
        fn exact_case_matches_rank_first() {
            let engine = CompletionEngine::new();
            let model = SchemaModel::new(
                "shop",
                vec![Table::new(
                    "t",
                    vec![Column::new("order_id", "int", false), Column::new("Origin", "text", false)],
                )],
                vec![],
            )
            .unwrap();
            let index = AutocompleteIndex::from_schema(&model);

            let result = engine.candidates(&index, &at_end("SELECT Or"));

            assert_eq!(texts(&result), vec!["Origin", "OR", "ORDER", "order_id"]);
        }

        #[test]
        fn duplicates_across_sources_appear_once() {
            let engine = CompletionEngine::new();
            let model = SchemaModel::new(
                "shop",
                vec![Table::new("limit", vec![Column::new("limit", "int", false)])],
                vec![],
            )
            .unwrap();
            let index = AutocompleteIndex::from_schema(&model);

            let result = engine.candidates(&index, &at_end("lim"));

            assert_eq!(texts(&result), vec!["limit", "LIMIT"]);
            assert_eq!(result[0].kind, CompletionKind::Table);
        }

        #[test]
        fn no_match_is_empty() {
            let engine = CompletionEngine::new();

            assert!(engine.candidates(&orders_index(), &at_end("zzz")).is_empty());
        }
    }

    mod threshold {
        use super::*;

        #[test]
        fn single_char_without_qualifier_is_below_threshold() {
            assert!(!CompletionEngine::new().should_suggest(&at_end("SELECT S")));
        }

        #[test]
        fn empty_token_after_qualifier_suggests() {
            assert!(CompletionEngine::new().should_suggest(&at_end("Orders.")));
        }
    }
}
