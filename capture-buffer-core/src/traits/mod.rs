pub mod sample_sink;
pub mod sample_source;
