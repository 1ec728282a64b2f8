mod message;
mod request;
mod response;

pub use message::{ChatMessage, Message, MessageRole, MessageStatus};
pub use request::ChatCompletionRequest;
pub use response::{
    ChatCompletionResponse, CompletionChoice, CompletionMessage, ModelEntry, ModelList,
};
