//! Chat Completions wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use threadsim_core::Stance;

/// Chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

/// Function the model may call.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub function: FunctionDefinition,
}

impl Tool {
    #[must_use]
    pub const fn function(function: FunctionDefinition) -> Self {
        Self {
            tool_type: "function",
            function,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedFunction {
    pub name: &'static str,
}

/// Forces a call to one named function.
#[derive(Debug, Clone, Serialize)]
pub struct ToolChoice {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub function: NamedFunction,
}

impl ToolChoice {
    #[must_use]
    pub const fn function(name: &'static str) -> Self {
        Self {
            tool_type: "function",
            function: NamedFunction { name },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Plain request with a system and a user message.
    #[must_use]
    pub fn new(model: &'a str, system: &'a str, user: &'a str) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: system,
                },
                ChatMessage {
                    role: Role::User,
                    content: user,
                },
            ],
            tools: None,
            tool_choice: None,
        }
    }

    /// Require the model to answer by calling `function`.
    #[must_use]
    pub fn force_function(mut self, function: FunctionDefinition) -> Self {
        self.tool_choice = Some(ToolChoice::function(function.name));
        self.tools = Some(vec![Tool::function(function)]);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

/// Arguments of the stance selection call.
#[derive(Debug, Clone, Deserialize)]
pub struct StanceSelection {
    pub stances: Vec<Stance>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
