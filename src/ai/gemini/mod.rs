pub mod chat;
pub mod client;
pub mod translate;
pub mod types;

pub use chat::GeminiChatClient;
pub use client::GeminiHttpClient;
pub use translate::{build_request, to_provider_messages, translate_response};
