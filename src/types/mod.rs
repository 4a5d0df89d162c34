// src/types/mod.rs
pub mod profile;
