use crate::models::SearchResult;

pub const ANSWER_SYSTEM_PROMPT: &str = "You are a helpful AI assistant that provides accurate, well-researched answers based on search results. Always cite sources when possible.";

pub fn render_search_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| {
            format!(
                "Title: {}\nURL: {}\nSnippet: {}",
                result.title, result.url, result.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_answer_prompt(query: &str, results: &[SearchResult]) -> String {
    let context = render_search_context(results);

    format!(
        r#"Based on the following search results, provide a comprehensive and accurate answer to the query: "{}"

Search Results:
{}

Please provide a detailed, informative response that synthesizes information from these sources. Be factual and cite relevant information where appropriate. Keep the response under 500 words and format it nicely with paragraphs."#,
        query, context
    )
}
