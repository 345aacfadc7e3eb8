pub mod entities;
pub mod errors;
pub mod field_tree;
pub mod value_objects;
