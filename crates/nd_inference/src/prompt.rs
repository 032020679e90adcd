/// Prompt asking the model for a single JSON verdict on `article`.
pub fn analysis_prompt(article: &str) -> String {
    format!(
        r#"You are a media analyst. Read the news text below and judge how credible it is and what tone it carries.

Respond with ONLY a JSON object, no other text, using exactly these fields:
{{
  "truthPercentage": <number from 0 to 100, how likely the text is accurate>,
  "emotion": <one of "positive", "negative", "neutral", "mixed">,
  "explanation": <one or two sentences explaining the score>,
  "summary": <one sentence summarizing the text>
}}

News text:
{}"#,
        article.trim()
    )
}
