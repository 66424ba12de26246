#![no_std]

extern crate alloc;

pub mod bdf;
pub mod bitmap;
pub mod gzip;
pub mod types;
