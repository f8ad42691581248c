use serde_json::Value;

pub fn advisor_system(context: &Value) -> String {
    let mut lines = Vec::new();
    lines.push(
        "You are ZyloAI, an expert real estate advisor for the Indian market. You help users find \
         properties, understand market trends, calculate ROI, and make informed real estate decisions."
            .to_string(),
    );
    lines.push(String::new());
    lines.push("Key Guidelines:".to_string());
    for (i, rule) in [
        "Always provide accurate, helpful information about Indian real estate",
        "Use Indian currency (₹) and local terminology",
        "Consider factors like RERA compliance, credibility scores, and market trends",
        "Be transparent about data sources and limitations",
        "Suggest relevant properties based on user needs, citing their ids",
        "Calculate ROI, appreciation, and rental yields when relevant",
        "Reply in the user's preferred language (English/Hindi/Hinglish)",
        "Always mention important legal considerations and due diligence",
    ]
    .iter()
    .enumerate()
    {
        lines.push(format!("{}. {rule}", i + 1));
    }
    lines.push(String::new());
    lines.push(format!("Context: {context}"));
    lines.push(String::new());
    lines.push("Respond with a single JSON object with:".to_string());
    lines.push("- response: detailed answer to the user query".to_string());
    lines.push(
        "- properties: array of {property_id, relevance_score, reasoning, pros, cons} \
         drawn only from the context properties"
            .to_string(),
    );
    lines.push("- follow_up_questions: suggested questions to help the user".to_string());
    lines.push("- actions: optional short action labels for the client".to_string());
    lines.push("- intent: one of search/compare/invest/legal/market".to_string());
    lines.push("- confidence: confidence level (0-1) in the response".to_string());
    lines.join("\n")
}

pub fn advisor_user(query: &str, language: &str) -> String {
    format!("User Query: {query}\n\nLanguage preference: {language}")
}

pub fn comparison(properties: &Value, preferences: &Value) -> String {
    format!(
        "Analyze these properties and provide a detailed comparison for Indian real estate buyers:\n\n\
         Properties: {properties}\n\
         User Preferences: {preferences}\n\n\
         Consider price per sq.ft, location, builder credibility, ROI and rental yield, \
         RERA compliance, amenities, connectivity and locality market trends.\n\n\
         Return JSON with:\n\
         - recommendation: detailed recommendation in plain English\n\
         - winner: id of the recommended property\n\
         - comparison_matrix: structured comparison data\n\
         - investment_analysis: ROI, appreciation, risks"
    )
}

pub fn market(location: &str, timeframe: &str, stats: &Value) -> String {
    format!(
        "Generate comprehensive market insights for the {location} real estate market.\n\n\
         Timeframe: {timeframe}\n\
         Recorded market statistics: {stats}\n\n\
         Cover price trends, supply and demand, infrastructure, investment hotspots, \
         growth prospects, risk factors and timing.\n\n\
         Return JSON with:\n\
         - trends: structured price/supply trend data\n\
         - forecast: expected movement over the timeframe\n\
         - insights: array of short insight strings\n\
         - investment_outlook: one paragraph"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn system_prompt_embeds_context() {
        let s = advisor_system(&json!({"language": "Hindi"}));
        assert!(s.starts_with("You are ZyloAI"));
        assert!(s.contains(r#""language":"Hindi""#));
        assert!(s.contains("8. Always mention"));
    }

    #[test]
    fn market_prompt_mentions_timeframe() {
        let s = market("Pune", "12months", &json!([]));
        assert!(s.contains("Pune real estate market"));
        assert!(s.contains("Timeframe: 12months"));
    }
}
