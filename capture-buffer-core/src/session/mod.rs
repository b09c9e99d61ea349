pub mod pull_stream;
