use core::mem;
use core::ptr::NonNull;

use static_assertions::const_assert_eq;

use super::OpaqueTerm;

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "32")] {
        use ember_number::float::words;

        /// Size in words of the block holding a boxed double
        pub const DOUBLE_WOSIZE: usize = 2;

        /// Writes `d` into the fields of a double block.
        ///
        /// Heap words are only 4-byte aligned here, so the value is written as two
        /// words in memory order rather than as one `f64`.
        ///
        /// # Safety
        ///
        /// `fields` must point to `DOUBLE_WOSIZE` writable words.
        #[inline]
        pub unsafe fn store(fields: NonNull<OpaqueTerm>, d: f64) {
            let [lo, hi] = words::split(d);
            let fields = fields.as_ptr().cast::<u32>();
            fields.write(lo);
            fields.add(1).write(hi);
        }

        /// Reads the value stored by [`store`].
        ///
        /// # Safety
        ///
        /// `fields` must point to the fields of a live double block.
        #[inline]
        pub unsafe fn load(fields: NonNull<OpaqueTerm>) -> f64 {
            let fields = fields.as_ptr().cast::<u32>();
            words::join([fields.read(), fields.add(1).read()])
        }
    } else {
        /// Size in words of the block holding a boxed double
        pub const DOUBLE_WOSIZE: usize = 1;

        /// Writes `d` into the fields of a double block.
        ///
        /// # Safety
        ///
        /// `fields` must point to `DOUBLE_WOSIZE` writable words.
        #[inline]
        pub unsafe fn store(fields: NonNull<OpaqueTerm>, d: f64) {
            fields.as_ptr().cast::<f64>().write(d)
        }

        /// Reads the value stored by [`store`].
        ///
        /// # Safety
        ///
        /// `fields` must point to the fields of a live double block.
        #[inline]
        pub unsafe fn load(fields: NonNull<OpaqueTerm>) -> f64 {
            fields.as_ptr().cast::<f64>().read()
        }
    }
}

const_assert_eq!(
    DOUBLE_WOSIZE * mem::size_of::<OpaqueTerm>(),
    mem::size_of::<f64>()
);
