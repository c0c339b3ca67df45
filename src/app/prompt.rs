use askql_domain::SchemaModel;

use crate::error::TranslationError;
use crate::schema_context::{self, ContextBudget};

/// Bumped whenever `ROLE_STATEMENT` or `RESPONSE_CONTRACT` changes, since the
/// response parser is written against this exact wording.
pub const PROMPT_CONTRACT_VERSION: u32 = 1;

pub const ROLE_STATEMENT: &str = "As a SQL expert specializing in PostgreSQL, your task is to convert the following natural language query into a valid SQL query.";

pub const RESPONSE_CONTRACT: &str = r#"GUIDELINES:
1. Generate ONLY a valid PostgreSQL query that answers the user's question.
2. The query should be runnable as-is on PostgreSQL.
3. Use appropriate JOINs where necessary based on the schema relationships.
4. Use only the tables and columns defined in the schema.
5. Include clear column aliases for readability.
6. Limit results to a reasonable number (e.g., LIMIT 100) if appropriate.
7. Ensure the query follows best practices for performance.
8. Add helpful comments before complex logic.

RESPONSE FORMAT:
Return a JSON object with the following structure:
{
    "sql_query": "Your SQL query here",
    "explanation": "Brief explanation of the query and any assumptions made, in natural language without naming columns or tables directly"
}

Ensure your response is properly escaped JSON without any markdown formatting."#;

/// Joins already-serialized schema text and a question into the full prompt.
pub fn assemble(schema_text: &str, question: &str) -> String {
    format!(
        "{ROLE_STATEMENT}\n\nDATABASE SCHEMA INFORMATION:\n{schema_text}\nNATURAL LANGUAGE QUERY:\n{question}\n\n{RESPONSE_CONTRACT}\n"
    )
}

pub fn build(
    model: &SchemaModel,
    question: &str,
    budget: &ContextBudget,
) -> Result<String, TranslationError> {
    if model.is_empty() {
        return Err(TranslationError::EmptySchema);
    }
    if question.trim().is_empty() {
        return Err(TranslationError::EmptyQuestion);
    }

    let schema_text = schema_context::render(model, budget);
    Ok(assemble(&schema_text, question))
}
