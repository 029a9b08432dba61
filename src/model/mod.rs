pub mod bucket;
pub mod palette;
pub mod profile;
pub mod rect;
pub mod tree;
