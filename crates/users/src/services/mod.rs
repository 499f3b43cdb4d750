pub mod memory_store;
pub mod user_service;

pub use memory_store::MemoryUserStore;
pub use user_service::{UserRepositoryService, UserService, UserStore};
