use crate::classify::{ClassifyError, WordClassifier};
use crate::config::ApiKey;
use crate::emotion::WordProfile;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "deepseek-chat";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);
const PROB_SUM_TOLERANCE: f64 = 0.01;

#[derive(Clone)]
pub struct DeepSeekClassifier {
    client: Client,
    api_key: ApiKey,
    api_url: String,
    model: String,
}

impl DeepSeekClassifier {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: DEFAULT_API_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// The model must answer with exactly this shape. Extra fields are ignored;
/// missing or out-of-range fields reject the whole response.
#[derive(Deserialize)]
struct ClassifiedWord {
    word: String,
    stats: WordProfile,
}

fn build_prompt(word: &str) -> String {
    format!(
        r#"Analyze the word "{word}" for its emotional connotations and psychological impact.

GOAL: Create ACCURATE and DISTINCTIVE emotion predictions that clearly differentiate between emotions.

Think about:
1. What emotions does this word typically evoke in people?
2. Is it positive, negative, or neutral in feeling (valence)?
3. How energetic or calm does it make people feel (arousal)?
4. Does it convey power/control or submission (dominance)?
5. What is the overall sentiment and strength?

EMOTION ASSIGNMENT RULES:
- BE DECISIVE: If a word has emotional content, make it CLEAR in the probabilities
- NEUTRAL words (pronouns, articles, prepositions): use equal probabilities (0.125 each)
- EMOTIONAL words: give the primary emotion 0.4-0.7, secondary 0.1-0.3, others 0.01-0.05
- STRONG emotional words: primary emotion should be 0.6+

EXAMPLES:
- "happy" -> joy: 0.7, trust: 0.1, anticipation: 0.1, others: 0.025 each
- "angry" -> anger: 0.65, disgust: 0.15, fear: 0.1, others: 0.025 each
- "the" -> all emotions: 0.125 each (neutral)

Provide the emotion data in this exact JSON format:

{{
  "word": "{word}",
  "stats": {{
    "vad": {{
      "valence": 0.5,
      "arousal": 0.5,
      "dominance": 0.5
    }},
    "emotion_probs": {{
      "joy": 0.125,
      "trust": 0.125,
      "anticipation": 0.125,
      "surprise": 0.125,
      "anger": 0.125,
      "fear": 0.125,
      "sadness": 0.125,
      "disgust": 0.125
    }},
    "sentiment": {{
      "polarity": "neutral",
      "strength": 0.5
    }}
  }}
}}

Rules:
- emotion_probs must sum to 1.0
- vad values: 0.0 to 1.0 (valence: negative to positive, arousal: calm to energetic, dominance: submissive to dominant)
- Return ONLY the JSON, no explanation"#
    )
}

/// Models occasionally wrap the JSON in markdown fences despite instructions.
/// Stripping them is the only leniency; everything after must parse strictly.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parse-or-reject boundary for the model's reply.
fn parse_response(word: &str, content: &str) -> Result<WordProfile, ClassifyError> {
    let body = strip_code_fences(content);
    let classified: ClassifiedWord = serde_json::from_str(body)
        .map_err(|e| ClassifyError::InvalidResponse(format!("malformed JSON: {e}")))?;

    if !classified.word.eq_ignore_ascii_case(word) {
        return Err(ClassifyError::InvalidResponse(format!(
            "response is for '{}', expected '{word}'",
            classified.word
        )));
    }

    let mut profile = classified.stats;
    let probs = &profile.emotion_probs;
    if probs.iter().any(|(_, p)| !(0.0..=1.0).contains(&p)) {
        return Err(ClassifyError::InvalidResponse(
            "emotion probability outside [0, 1]".to_owned(),
        ));
    }
    if (probs.sum() - 1.0).abs() > PROB_SUM_TOLERANCE {
        return Err(ClassifyError::InvalidResponse(format!(
            "emotion probabilities sum to {:.3}, expected 1.0",
            probs.sum()
        )));
    }
    if !profile.vad.in_range() {
        return Err(ClassifyError::InvalidResponse(
            "vad value outside [0, 1]".to_owned(),
        ));
    }
    if !(0.0..=1.0).contains(&profile.sentiment.strength) {
        return Err(ClassifyError::InvalidResponse(
            "sentiment strength outside [0, 1]".to_owned(),
        ));
    }

    // Snap the small permitted drift back to an exact unit sum.
    profile.emotion_probs.normalize();
    Ok(profile)
}

impl WordClassifier for DeepSeekClassifier {
    fn classify(&self, word: String) -> BoxFuture<'_, Result<WordProfile, ClassifyError>> {
        let this = self.clone();
        async move {
            let request = ChatRequest {
                model: this.model.clone(),
                messages: vec![ChatMessage {
                    role: "user",
                    content: build_prompt(&word),
                }],
                temperature: 0.1,
                max_tokens: 800,
            };

            let response = this
                .client
                .post(&this.api_url)
                .header(
                    "Authorization",
                    format!("Bearer {}", this.api_key.expose()),
                )
                .timeout(REQUEST_TIMEOUT)
                .json(&request)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                return Err(ClassifyError::Api(format!("HTTP {status}")));
            }

            let chat: ChatResponse = response
                .json()
                .await
                .map_err(|e| ClassifyError::InvalidResponse(format!("malformed envelope: {e}")))?;

            let content = chat
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| ClassifyError::InvalidResponse("no choices in response".to_owned()))?;

            parse_response(&word, &content)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::EmotionLabel;

    const GOOD_REPLY: &str = r#"{
        "word": "furious",
        "stats": {
            "vad": {"valence": 0.1, "arousal": 0.9, "dominance": 0.7},
            "emotion_probs": {
                "joy": 0.01, "trust": 0.01, "anticipation": 0.02, "surprise": 0.03,
                "anger": 0.78, "fear": 0.07, "sadness": 0.04, "disgust": 0.04
            },
            "sentiment": {"polarity": "negative", "strength": 0.85}
        }
    }"#;

    #[test]
    fn parses_a_plain_json_reply() {
        let profile = parse_response("furious", GOOD_REPLY).expect("valid");
        assert_eq!(profile.dominant_emotion(), EmotionLabel::Anger);
        assert!((profile.emotion_probs.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn strips_json_code_fences() {
        let fenced = format!("```json\n{GOOD_REPLY}\n```");
        let profile = parse_response("furious", &fenced).expect("valid");
        assert_eq!(profile.dominant_emotion(), EmotionLabel::Anger);
    }

    #[test]
    fn strips_bare_code_fences() {
        let fenced = format!("```\n{GOOD_REPLY}\n```");
        assert!(parse_response("furious", &fenced).is_ok());
    }

    #[test]
    fn rejects_prose_around_the_json() {
        let reply = format!("Here is my analysis: {GOOD_REPLY}");
        assert!(matches!(
            parse_response("furious", &reply),
            Err(ClassifyError::InvalidResponse(_))
        ));
    }

    #[test]
    fn rejects_mismatched_word() {
        assert!(matches!(
            parse_response("calm", GOOD_REPLY),
            Err(ClassifyError::InvalidResponse(_))
        ));
    }

    #[test]
    fn rejects_probabilities_that_do_not_sum_to_one() {
        let reply = r#"{
            "word": "odd",
            "stats": {
                "vad": {"valence": 0.5, "arousal": 0.5, "dominance": 0.5},
                "emotion_probs": {
                    "joy": 0.5, "trust": 0.5, "anticipation": 0.5, "surprise": 0.5,
                    "anger": 0.5, "fear": 0.5, "sadness": 0.5, "disgust": 0.5
                },
                "sentiment": {"polarity": "neutral", "strength": 0.5}
            }
        }"#;
        assert!(matches!(
            parse_response("odd", reply),
            Err(ClassifyError::InvalidResponse(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_vad() {
        let reply = GOOD_REPLY.replace("\"arousal\": 0.9", "\"arousal\": 1.9");
        assert!(matches!(
            parse_response("furious", &reply),
            Err(ClassifyError::InvalidResponse(_))
        ));
    }

    #[test]
    fn rejects_missing_emotion_keys() {
        let reply = r#"{
            "word": "thin",
            "stats": {
                "vad": {"valence": 0.5, "arousal": 0.5, "dominance": 0.5},
                "emotion_probs": {"joy": 1.0},
                "sentiment": {"polarity": "neutral", "strength": 0.5}
            }
        }"#;
        assert!(matches!(
            parse_response("thin", reply),
            Err(ClassifyError::InvalidResponse(_))
        ));
    }

    #[test]
    fn prompt_names_the_word_and_demands_json() {
        let prompt = build_prompt("serenity");
        assert!(prompt.contains("\"serenity\""));
        assert!(prompt.contains("emotion_probs must sum to 1.0"));
        assert!(prompt.contains("Return ONLY the JSON"));
    }
}
