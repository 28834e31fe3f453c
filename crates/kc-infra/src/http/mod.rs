mod order_backend;

pub use order_backend::HttpOrderBackend;
