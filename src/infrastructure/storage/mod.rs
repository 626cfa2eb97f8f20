//! Non-database storage adapters

mod memory;

pub use memory::InMemoryUserRepository;
