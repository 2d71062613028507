//! Worker prompt construction

use std::fmt::Write;

use crate::llm::{Message, Role};
use crate::retrieval::RetrievedSource;

/// Build the completion prompt for one worker turn.
///
/// The prompt carries the memory snapshot, the question, the numbered
/// retrieval payload and the answer format. Citations are restricted to the
/// payload.
pub fn build_prompt(
    memory: &[Message],
    query: &str,
    payload_label: &str,
    sources: &[RetrievedSource],
) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are a helpful assistant. Use ONLY the {} below to answer.\n",
        payload_label.to_lowercase()
    );

    prompt.push_str("CONVERSATION SO FAR:\n");
    if memory.is_empty() {
        prompt.push_str("(no prior conversation)\n");
    }
    for msg in memory {
        match (&msg.role, &msg.name) {
            (Role::Assistant, Some(name)) => {
                let _ = writeln!(prompt, "assistant ({}): {}", name, msg.content);
            }
            (role, _) => {
                let _ = writeln!(prompt, "{}: {}", role.as_str(), msg.content);
            }
        }
    }

    let _ = write!(
        prompt,
        "\nQUESTION:\n{}\n\n{}:\n",
        query.trim(),
        payload_label
    );
    if sources.is_empty() {
        prompt.push_str("No results were returned.\n");
    }
    for (i, source) in sources.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "[{}] {} ({})\n{}\n",
            i + 1,
            source.title,
            source.source,
            source.content.trim()
        );
    }

    prompt.push_str(
        "\nRespond in this format:\n\n\
         - **Answer:** <short, accurate answer in 2-4 sentences>\n\
         - **Sources:**\n  \
           - <source 1 title + URL or locator>\n  \
           - <source 2 title + URL or locator>\n\n\
         Cite only sources listed above. Never invent a source, URL or page. \
         If the material above does not contain the answer, say so and list no sources.\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::WorkerKind;

    #[test]
    fn prompt_embeds_memory_query_and_sources() {
        let memory = vec![
            Message::user("who wrote Dune?"),
            Message::from_worker(WorkerKind::WebSearcher, "Frank Herbert."),
        ];
        let sources = vec![
            RetrievedSource::new(
                "Paris",
                "https://en.wikipedia.org/wiki/Paris",
                "Capital of France.",
            ),
            RetrievedSource::new("France", "https://example.com/fr", "Paris is the capital."),
        ];

        let prompt = build_prompt(
            &memory,
            "  what is the capital of France?  ",
            "SEARCH RESULTS",
            &sources,
        );

        assert!(prompt.contains("user: who wrote Dune?"));
        assert!(prompt.contains("assistant (web_searcher): Frank Herbert."));
        assert!(prompt.contains("QUESTION:\nwhat is the capital of France?\n"));
        assert!(prompt.contains("[1] Paris (https://en.wikipedia.org/wiki/Paris)"));
        assert!(prompt.contains("[2] France (https://example.com/fr)"));
        assert!(prompt.contains("**Answer:**"));
        assert!(prompt.contains("**Sources:**"));
        assert!(prompt.contains("Never invent a source"));

        // Memory comes before the question, which comes before the payload.
        let memory_at = prompt.find("Frank Herbert").unwrap();
        let question_at = prompt.find("QUESTION:").unwrap();
        let payload_at = prompt.find("SEARCH RESULTS:").unwrap();
        assert!(memory_at < question_at && question_at < payload_at);
    }

    #[test]
    fn prompt_states_missing_material() {
        let prompt = build_prompt(&[], "page 2?", "DOCUMENT PASSAGES", &[]);
        assert!(prompt.contains("(no prior conversation)"));
        assert!(prompt.contains("DOCUMENT PASSAGES:\nNo results were returned."));
        assert!(prompt.contains("Use ONLY the document passages below"));
    }
}
