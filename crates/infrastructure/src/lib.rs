pub mod cache;
pub mod capture;
pub mod http;

pub use cache::RedisDomainCache;
pub use capture::CaptureLoop;
pub use http::HttpClassifierGateway;
