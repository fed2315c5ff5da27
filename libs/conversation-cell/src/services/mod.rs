pub mod chat;
pub mod store;

pub use chat::ChatService;
pub use store::SessionStore;
