// Service exports
pub mod elastic;

pub use elastic::EsClient;
