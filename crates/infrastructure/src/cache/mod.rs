mod redis_store;
mod scripts;

pub use redis_store::RedisDomainCache;
