pub mod escape;
pub mod fast_map;
