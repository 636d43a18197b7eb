//! Prompt building for social-post generation and parsing of the model's
//! delimiter-formatted reply.

use serde::{Deserialize, Serialize};

use crate::entity::LogEntry;

/// Literal separator the model is instructed to place between the post body
/// and the hashtag line.
const SEPARATOR: &str = "---";
const HASHTAG_PREFIX: &str = "Suggested Hashtags:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Linkedin,
    Twitter,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Linkedin => write!(f, "linkedin"),
            Platform::Twitter => write!(f, "twitter"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" | "x" => Ok(Platform::Twitter),
            _ => Err(format!("Invalid platform: {} (expected linkedin or twitter)", s)),
        }
    }
}

/// Generation directives for one post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostConfig {
    pub platform: Platform,
    /// Free-form tone description, e.g. "professional" or "casual".
    pub tone: String,
    /// Free-form length description, e.g. "short" or "detailed".
    pub length: String,
    /// 0 to 100, rendered as a percentage directive.
    pub emoji_density: u8,
    pub include_cta: bool,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            tone: "professional".to_string(),
            length: "medium".to_string(),
            emoji_density: 20,
            include_cta: false,
        }
    }
}

/// Parsed model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPost {
    pub post: String,
    pub hashtags: Vec<String>,
}

fn push_directives(prompt: &mut String, config: &PostConfig) {
    prompt.push_str(&format!("- Tone: {}.\n", config.tone));
    prompt.push_str(&format!("- Length: {}.\n", config.length));
    prompt.push_str(&format!(
        "- Emoji usage: roughly {}% of a typical post's emoji density.\n",
        config.emoji_density
    ));
    if config.include_cta {
        prompt.push_str("- End with a clear call to action inviting engagement.\n");
    } else {
        prompt.push_str("- Do not include a call to action.\n");
    }

    match config.platform {
        Platform::Linkedin => prompt.push_str(
            "- Format for LinkedIn: professional voice, short paragraphs separated \
             by line breaks, and an opening hook that invites readers to expand the post.\n",
        ),
        Platform::Twitter => prompt.push_str(
            "- Format for Twitter/X: conversational voice; if the content runs long, \
             structure it as a short thread of 3-4 tweets.\n",
        ),
    }
}

fn push_output_contract(prompt: &mut String) {
    prompt.push_str(
        "\nOutput format (follow exactly):\n\
         1. The post text.\n\
         2. A line containing only ---\n\
         3. A line starting with \"Suggested Hashtags:\" followed by a \
         comma-separated list of hashtags, each starting with #.\n",
    );
}

/// Build the prompt for a fresh post summarizing `activities`.
///
/// Every activity title appears verbatim as `- <title>: <description>`.
/// An empty activity list still produces a well-formed prompt.
pub fn build_prompt(activities: &[LogEntry], config: &PostConfig) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "System: You are a career coach helping a user turn their week's logged \
         activities into a social media post.\n\n",
    );

    prompt.push_str("User: Here are my activities for the week:\n");
    for activity in activities {
        prompt.push_str(&format!("- {}: {}\n", activity.title, activity.description));
    }
    if activities.is_empty() {
        prompt.push_str("(no activities logged this week)\n");
    }

    prompt.push_str(
        "\nPlease write a post that summarizes my week and highlights my skills \
         and accomplishments, following these directives:\n",
    );
    push_directives(&mut prompt, config);
    push_output_contract(&mut prompt);

    prompt
}

/// Build the prompt for refining `prior_post` per `instruction`, keeping all
/// primary directives in force.
pub fn build_refine_prompt(config: &PostConfig, instruction: &str, prior_post: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "System: You are a career coach helping a user revise a social media post.\n\n",
    );

    prompt.push_str("User: Here is my current draft:\n\n");
    prompt.push_str(prior_post);
    prompt.push_str("\n\nPlease revise it with this instruction: ");
    prompt.push_str(instruction);
    prompt.push_str("\n\nThe revision must still honor all of these directives:\n");
    push_directives(&mut prompt, config);
    push_output_contract(&mut prompt);

    prompt
}

/// Split the model reply into post body and hashtag list.
///
/// Degrades rather than fails: without the separator the whole text is the
/// post and the hashtag list is empty.
pub fn parse_response(raw: &str) -> GeneratedPost {
    let Some((body, rest)) = raw.split_once(SEPARATOR) else {
        return GeneratedPost {
            post: raw.trim().to_string(),
            hashtags: Vec::new(),
        };
    };

    let hashtags = rest
        .find(HASHTAG_PREFIX)
        .map(|idx| {
            rest[idx + HASHTAG_PREFIX.len()..]
                .split(',')
                .map(|t| t.trim())
                .filter(|t| t.starts_with('#'))
                .map(|t| t.to_string())
                .collect()
        })
        .unwrap_or_default();

    GeneratedPost {
        post: body.trim().to_string(),
        hashtags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn activity(title: &str, description: &str) -> LogEntry {
        LogEntry {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            image_url: None,
            tags: Vec::new(),
            timestamp: Some(Utc::now()),
        }
    }

    #[test]
    fn test_build_prompt_lists_every_title_verbatim() {
        let activities = vec![
            activity("Shipped the parser", "rewrote it twice"),
            activity("Mentored an intern", "pairing sessions"),
        ];

        let prompt = build_prompt(&activities, &PostConfig::default());
        assert!(prompt.contains("- Shipped the parser: rewrote it twice"));
        assert!(prompt.contains("- Mentored an intern: pairing sessions"));
    }

    #[test]
    fn test_build_prompt_embeds_directives() {
        let config = PostConfig {
            platform: Platform::Twitter,
            tone: "playful".to_string(),
            length: "short".to_string(),
            emoji_density: 75,
            include_cta: true,
        };

        let prompt = build_prompt(&[], &config);
        assert!(prompt.contains("Tone: playful"));
        assert!(prompt.contains("Length: short"));
        assert!(prompt.contains("75%"));
        assert!(prompt.contains("call to action inviting engagement"));
        assert!(prompt.contains("Twitter/X"));
        assert!(prompt.contains("Suggested Hashtags:"));
    }

    #[test]
    fn test_build_prompt_empty_activities_still_valid() {
        let prompt = build_prompt(&[], &PostConfig::default());
        assert!(prompt.contains("no activities logged this week"));
        assert!(prompt.contains("---"));
    }

    #[test]
    fn test_build_prompt_cta_omission() {
        let config = PostConfig {
            include_cta: false,
            ..PostConfig::default()
        };
        let prompt = build_prompt(&[], &config);
        assert!(prompt.contains("Do not include a call to action"));
    }

    #[test]
    fn test_refine_prompt_includes_instruction_and_prior_post() {
        let prompt = build_refine_prompt(
            &PostConfig::default(),
            "make it punchier",
            "My original draft text",
        );
        assert!(prompt.contains("make it punchier"));
        assert!(prompt.contains("My original draft text"));
        assert!(prompt.contains("Tone: professional"));
    }

    #[test]
    fn test_parse_response_with_separator_and_hashtags() {
        let parsed = parse_response("Hello world\n---\nSuggested Hashtags: #a, #b");
        assert_eq!(parsed.post, "Hello world");
        assert_eq!(parsed.hashtags, vec!["#a", "#b"]);
    }

    #[test]
    fn test_parse_response_without_separator() {
        let parsed = parse_response("Just a post, no separator");
        assert_eq!(parsed.post, "Just a post, no separator");
        assert!(parsed.hashtags.is_empty());
    }

    #[test]
    fn test_parse_response_drops_non_hashtag_tokens() {
        let parsed = parse_response("Post\n---\nSuggested Hashtags: #keep, plain, #also , ");
        assert_eq!(parsed.hashtags, vec!["#keep", "#also"]);
    }

    #[test]
    fn test_parse_response_separator_without_hashtag_line() {
        let parsed = parse_response("Post body\n---\nsome trailing text");
        assert_eq!(parsed.post, "Post body");
        assert!(parsed.hashtags.is_empty());
    }

    #[test]
    fn test_parse_response_splits_on_first_separator() {
        let parsed = parse_response("Part one\n---\nno hashtag line\n---\nstill the tail");
        assert_eq!(parsed.post, "Part one");
        assert!(parsed.hashtags.is_empty());
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("linkedin".parse::<Platform>().unwrap(), Platform::Linkedin);
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::Twitter);
        assert!("mastodon".parse::<Platform>().is_err());
    }
}
