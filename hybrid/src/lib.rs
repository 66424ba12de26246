#![no_std]

extern crate alloc;

pub mod encoder;
pub mod packer;
pub mod render;
pub mod table;
