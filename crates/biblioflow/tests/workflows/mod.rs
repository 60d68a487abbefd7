use super::*;

mod library_operations;
mod organize;
