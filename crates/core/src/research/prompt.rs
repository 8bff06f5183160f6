//! Prompt construction for trend research.

/// System instructions shared by every research request.
pub const SYSTEM_PROMPT: &str = "You are a music industry analyst. \
You report current, concrete trends and always answer with a single JSON object.";

/// Build the research prompt for one genre.
///
/// The output is a pure function of its inputs so identical runs send
/// identical requests.
pub fn build_trend_prompt(genre: &str, platforms: &[String]) -> String {
    let platform_list = platforms
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Research the current trends in the "{genre}" music genre.

For each of these platforms: {platform_list}
list 3 to 5 notable trends.

Respond with exactly one JSON object and nothing else, in this shape:
{{
  "trends": [
    {{
      "platform": "<one of the platforms above>",
      "trend_name": "<short name of the trend>",
      "trend_description": "<one or two sentences>",
      "is_growing": <true if the trend is gaining momentum, false if declining>,
      "data_value": <a representative number such as streams, views or mentions>
    }}
  ]
}}

Use a distinct trend_name for every entry."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PLATFORMS;

    fn default_platforms() -> Vec<String> {
        DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_prompt_names_genre_and_platforms() {
        let prompt = build_trend_prompt("Hip Hop", &default_platforms());
        assert!(prompt.contains("\"Hip Hop\""));
        assert!(prompt.contains("Spotify, TikTok, Instagram Reels, YouTube, Industry Discussion"));
        assert!(prompt.contains("3 to 5"));
        assert!(prompt.contains("\"trends\""));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let platforms = default_platforms();
        assert_eq!(
            build_trend_prompt("Jazz", &platforms),
            build_trend_prompt("Jazz", &platforms)
        );
    }

    #[test]
    fn test_blank_platforms_are_dropped() {
        let platforms = vec!["Spotify".to_string(), "  ".to_string(), " TikTok ".to_string()];
        let prompt = build_trend_prompt("Jazz", &platforms);
        assert!(prompt.contains("platforms: Spotify, TikTok\n"));
    }

    #[test]
    fn test_prompt_template_is_valid_shape() {
        // The braces in the template must survive formatting unescaped.
        let prompt = build_trend_prompt("Jazz", &default_platforms());
        assert!(prompt.contains("{\n  \"trends\": ["));
    }
}
