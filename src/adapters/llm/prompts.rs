//! Prompt templates

/// Prompt for answering a question about a single report
pub fn chat_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a medical assistant. Based on the following anonymized medical report, \
         please respond to the user's question. Be helpful, professional, and focused on \
         medical information.\n\nMedical Report:\n{context}\n\nUser Question: {question}\n\nResponse:"
    )
}

/// Prompt for a one-line insight
///
/// With earlier reports the model is asked for changes and trends; without
/// them, for the single most important finding.
pub fn insight_prompt(report: &str, previous: &[String]) -> String {
    if previous.is_empty() {
        format!(
            "Analyze this medical report and provide a concise one-liner insight.\n\
             Focus on the most important finding or observation.\n\n\
             Report: {report}\n\nOne-liner insight:"
        )
    } else {
        let history = previous.join("\n\n");
        format!(
            "Analyze this medical report in the context of the patient's history. \
             Provide a concise one-liner insight focusing on changes, trends, or important \
             observations.\n\nPrevious reports context: {history}\n\n\
             Current report: {report}\n\nOne-liner insight:"
        )
    }
}
