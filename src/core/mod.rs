// Leaf utilities shared by the asset manager and its compilers

pub mod checksum;
pub mod fs;
pub mod math;
