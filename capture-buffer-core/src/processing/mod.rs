pub mod byte_ring;
pub mod pcm;
pub mod shared_ring;
