/// Instructional prompt for one leaf photo of `crop_type`.
pub fn build_prompt(crop_type: &str) -> String {
    format!(
        r#"
You are a knowledgeable and cautious agronomy assistant.
Analyze this leaf photo from a {crop_type} crop.
Identify possible diseases, pests, or nutrient deficiencies.

Return STRICT JSON in the following format only:
{{
  "is_healthy": <boolean>,
  "top_conditions": [{{"label": <string>, "confidence": <number 0-1>}}, ...],
  "advice": [
    "short, actionable step 1 (non-chemical first)",
    "step 2",
    "step 3"
  ]
}}

Rules:
- Always include at least 3 pieces of advice, even if unsure.
- Prefer safe, non-chemical actions first (remove infected leaves, improve airflow, sanitize tools, adjust watering).
- Mention general organic or biological control methods (like neem oil, compost tea).
- If needed, suggest consulting local agricultural experts for severe conditions.
- Keep it short and clear.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_type_is_substituted_verbatim() {
        let prompt = build_prompt("Cassava (TME 419)");
        assert!(prompt.contains("leaf photo from a Cassava (TME 419) crop."));
    }

    #[test]
    fn prompt_names_all_result_fields() {
        let prompt = build_prompt("unknown");
        for field in ["\"is_healthy\"", "\"top_conditions\"", "\"advice\""] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("at least 3 pieces of advice"));
    }
}
