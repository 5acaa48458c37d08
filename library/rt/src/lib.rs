#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod bifs;
pub mod error;
pub mod gc;
pub mod process;
pub mod term;
