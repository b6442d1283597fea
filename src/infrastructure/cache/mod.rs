pub mod envelope_cache;

pub use envelope_cache::EnvelopeCache;
