//! Wire types for the Ollama HTTP API.

use flowkit_core::{
    GenerationConfig, GenerationRequest, GenerationResponse, Message, Role, Usage,
};
use serde::{Deserialize, Serialize};

/// A message in the Ollama chat format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::System => "system",
            Role::User => "user",
            Role::Model => "assistant",
        };
        Self {
            role: role.to_string(),
            content: message.content.clone(),
        }
    }
}

/// Model parameters understood by Ollama. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl From<&GenerationConfig> for Options {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            num_predict: config.max_output_tokens,
            top_k: config.top_k,
            top_p: config.top_p,
            stop: config.stop_sequences.clone(),
        }
    }
}

/// `POST /api/chat` request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub options: Options,
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(model: &str, request: &GenerationRequest) -> Self {
        Self {
            model: model.to_string(),
            messages: request.messages.iter().map(ChatMessage::from).collect(),
            options: Options::from(&request.config),
            stream: false,
        }
    }
}

/// `POST /api/chat` response body (non-streaming)
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub model: String,
    pub message: ChatMessage,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
}

impl From<ChatResponse> for GenerationResponse {
    fn from(response: ChatResponse) -> Self {
        Self {
            text: response.message.content,
            model: response.model,
            finish_reason: response.done_reason,
            usage: usage(response.prompt_eval_count, response.eval_count),
        }
    }
}

/// `POST /api/generate` request body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub options: Options,
    pub stream: bool,
}

impl GenerateRequest {
    /// Flatten the conversation into one prompt; system messages go to `system`.
    pub fn new(model: &str, request: &GenerationRequest) -> Self {
        let prompt = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            model: model.to_string(),
            prompt,
            system: request.system_prompt(),
            options: Options::from(&request.config),
            stream: false,
        }
    }
}

/// `POST /api/generate` response body (non-streaming)
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub model: String,
    pub response: String,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
}

impl From<GenerateResponse> for GenerationResponse {
    fn from(response: GenerateResponse) -> Self {
        Self {
            text: response.response,
            model: response.model,
            finish_reason: response.done_reason,
            usage: usage(response.prompt_eval_count, response.eval_count),
        }
    }
}

fn usage(input_tokens: Option<u32>, output_tokens: Option<u32>) -> Option<Usage> {
    if input_tokens.is_none() && output_tokens.is_none() {
        return None;
    }
    Some(Usage {
        input_tokens,
        output_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_body() {
        let request = GenerationRequest::new(
            GenerationConfig::with_temperature(1.0),
            vec![Message::system("You are a chef."), Message::user("Suggest a dish")],
        )
        .unwrap();

        let body = serde_json::to_value(ChatRequest::new("qwen2:0.5b", &request)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "qwen2:0.5b",
                "messages": [
                    {"role": "system", "content": "You are a chef."},
                    {"role": "user", "content": "Suggest a dish"}
                ],
                "options": {"temperature": 1.0},
                "stream": false
            })
        );
    }

    #[test]
    fn test_model_role_maps_to_assistant() {
        let message = ChatMessage::from(&Message::model("earlier reply"));
        assert_eq!(message.role, "assistant");
    }

    #[test]
    fn test_generate_request_flattens_messages() {
        let config = GenerationConfig {
            max_output_tokens: Some(64),
            stop_sequences: vec!["\n\n".to_string()],
            ..Default::default()
        };
        let request = GenerationRequest::new(
            config,
            vec![
                Message::system("Be brief."),
                Message::user("line one"),
                Message::user("line two"),
            ],
        )
        .unwrap();

        let body = serde_json::to_value(GenerateRequest::new("llama3", &request)).unwrap();
        assert_eq!(body["prompt"], "line one\nline two");
        assert_eq!(body["system"], "Be brief.");
        assert_eq!(body["options"], json!({"num_predict": 64, "stop": ["\n\n"]}));
    }

    #[test]
    fn test_chat_response_conversion() {
        let raw = json!({
            "model": "qwen2:0.5b",
            "created_at": "2024-06-01T10:00:00Z",
            "message": {"role": "assistant", "content": "Margherita Pizza"},
            "done": true,
            "done_reason": "stop",
            "prompt_eval_count": 26,
            "eval_count": 4
        });

        let response: GenerationResponse =
            serde_json::from_value::<ChatResponse>(raw).unwrap().into();
        assert_eq!(response.text(), "Margherita Pizza");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(
            response.usage,
            Some(Usage {
                input_tokens: Some(26),
                output_tokens: Some(4)
            })
        );
    }

    #[test]
    fn test_generate_response_without_counts() {
        let raw = json!({"model": "llama3", "response": "Tacos", "done": true});

        let response: GenerationResponse =
            serde_json::from_value::<GenerateResponse>(raw).unwrap().into();
        assert_eq!(response.text(), "Tacos");
        assert!(response.usage.is_none());
    }
}
