#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod heap;

pub use self::heap::{AllocError, FixedHeap, Heap};
