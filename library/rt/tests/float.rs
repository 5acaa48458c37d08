use core::alloc::Layout;
use core::mem;
use core::ptr::{self, NonNull};

use pretty_assertions::assert_eq;
use proptest::arbitrary::any;
use proptest::num::f64::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
use proptest::strategy::Strategy;
use proptest::test_runner::{Config, TestRunner};
use proptest::{prop_assert, prop_assert_eq};

use ember_alloc::heap::{AllocError, FixedHeap, Heap};
use ember_rt::bifs::float::*;
use ember_rt::gc::{block_layout, Mutator, RootSet};
use ember_rt::process::{Process, ProcessOptions};
use ember_rt::term::{OpaqueTerm, Tuple, DOUBLE_WOSIZE};

const POISON: u8 = 0xAB;

/// A host which moves every rooted block on each collection.
///
/// The new heap only has room for the survivors plus the pending allocation, so
/// the next allocation collects again. Old heaps are poisoned and kept around,
/// so that reading through a stale term yields garbage instead of freed memory.
struct MovingMutator {
    heap: FixedHeap,
    graveyard: Vec<FixedHeap>,
}
impl MovingMutator {
    fn new(size: usize) -> Self {
        Self {
            heap: FixedHeap::new(size).unwrap(),
            graveyard: Vec::new(),
        }
    }

    fn collections(&self) -> usize {
        self.graveyard.len()
    }
}
impl Mutator for MovingMutator {
    fn heap(&self) -> &dyn Heap {
        &self.heap
    }

    fn garbage_collect(&mut self, needed: Layout, roots: RootSet) -> Result<(), AllocError> {
        let word = mem::size_of::<usize>();
        let live = roots
            .iter()
            .filter_map(|root| unsafe { (*root).header() })
            .map(|header| block_layout(header.wosize()).size())
            .sum::<usize>();
        let to = FixedHeap::new(live + needed.size())?;

        for root in roots.iter() {
            let term = unsafe { *root };
            let Some(header) = (unsafe { term.header() }) else {
                continue;
            };
            let Some(fields) = term.as_block() else {
                continue;
            };
            let layout = block_layout(header.wosize());
            let block = to.allocate(layout)?;
            unsafe {
                let from = fields.as_ptr().cast::<u8>().sub(word);
                block.as_ptr().copy_from_nonoverlapping(from, layout.size());
                let moved = NonNull::new_unchecked(block.as_ptr().add(word).cast::<OpaqueTerm>());
                *root = OpaqueTerm::from_block(moved);
            }
        }

        unsafe {
            ptr::write_bytes(self.heap.heap_start(), POISON, self.heap.heap_used());
        }
        let old = mem::replace(&mut self.heap, to);
        self.graveyard.push(old);
        Ok(())
    }
}

fn double_size() -> usize {
    block_layout(DOUBLE_WOSIZE).size()
}

fn finite() -> impl Strategy<Value = f64> {
    POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO
}

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn frexp_survives_a_moving_collection() {
    init();
    let mut inputs = Process::new(ProcessOptions::default()).unwrap();
    let f = copy_double(&mut inputs, 48.0);

    // Room for the mantissa only, the tuple forces a collection
    let mut mutator = MovingMutator::new(double_size());
    let tuple = Tuple::from_term(frexp_float(&mut mutator, f)).unwrap();
    assert_eq!(mutator.collections(), 1);
    assert_eq!(double_val(tuple.get(0).unwrap()), 0.75);
    assert_eq!(tuple.get(1), Some(OpaqueTerm::from_int(6)));
    assert!(mutator.heap().contains(tuple.get(0).unwrap().raw() as *const ()));
}

#[test]
fn modf_survives_two_moving_collections() {
    init();
    let mut inputs = Process::new(ProcessOptions::default()).unwrap();
    let f = copy_double(&mut inputs, -7.125);

    // The fractional part is moved twice: when boxing the integral part, then
    // when allocating the tuple
    let mut mutator = MovingMutator::new(double_size());
    let tuple = Tuple::from_term(modf_float(&mut mutator, f)).unwrap();
    assert_eq!(mutator.collections(), 2);
    assert_eq!(double_val(tuple.get(0).unwrap()), -0.125);
    assert_eq!(double_val(tuple.get(1).unwrap()), -7.0);
}

#[test]
fn boxed_doubles_are_bit_exact() {
    init();
    let options = ProcessOptions {
        min_heap_size: 3,
        growth_factor: 2,
    };
    TestRunner::new(Config::with_source_file(file!()))
        .run(&any::<u64>(), |bits| {
            let mut process = Process::new(options).unwrap();
            let d = f64::from_bits(bits);
            let boxed = [(); 4].map(|_| copy_double(&mut process, d));
            prop_assert!(process.retired_heaps() > 0);
            for boxed in boxed {
                prop_assert!(boxed.is_double());
                prop_assert_eq!(double_val(boxed).to_bits(), bits);
                prop_assert_eq!(boxed.as_double().map(f64::to_bits), Some(bits));
            }

            Ok(())
        })
        .unwrap();
}

#[test]
fn frexp_reassembles_to_its_input() {
    init();
    TestRunner::new(Config::with_source_file(file!()))
        .run(&finite(), |d| {
            let mut process = Process::new(ProcessOptions::default()).unwrap();
            let f = copy_double(&mut process, d);
            let mut mutator = MovingMutator::new(double_size());
            let tuple = Tuple::from_term(frexp_float(&mut mutator, f)).unwrap();
            let mantissa = double_val(tuple.get(0).unwrap());
            let exponent = tuple.get(1).and_then(OpaqueTerm::as_int).unwrap();

            if d != 0.0 {
                prop_assert!((0.5..1.0).contains(&mantissa.abs()));
            }
            let i = OpaqueTerm::from_int(exponent);
            let m = copy_double(&mut process, mantissa);
            let rebuilt = ldexp_float(&mut process, m, i);
            prop_assert_eq!(double_val(rebuilt).to_bits(), d.to_bits());

            Ok(())
        })
        .unwrap();
}

#[test]
fn modf_parts_add_up() {
    init();
    TestRunner::new(Config::with_source_file(file!()))
        .run(&finite(), |d| {
            let mut process = Process::new(ProcessOptions::default()).unwrap();
            let f = copy_double(&mut process, d);
            let mut mutator = MovingMutator::new(double_size());
            let tuple = Tuple::from_term(modf_float(&mut mutator, f)).unwrap();
            let fractional = double_val(tuple.get(0).unwrap());
            let integral = double_val(tuple.get(1).unwrap());

            prop_assert_eq!(fractional + integral, d);
            prop_assert!(fractional.abs() < 1.0);
            prop_assert_eq!(integral.trunc(), integral);
            prop_assert_eq!(fractional.is_sign_negative(), d.is_sign_negative());
            prop_assert_eq!(integral.is_sign_negative(), d.is_sign_negative());

            Ok(())
        })
        .unwrap();
}

#[test]
fn arithmetic_matches_native_operators() {
    init();
    TestRunner::new(Config::with_source_file(file!()))
        .run(&(any::<f64>(), any::<f64>()), |(a, b)| {
            let mut process = Process::new(ProcessOptions::default()).unwrap();
            let f = copy_double(&mut process, a);
            let g = copy_double(&mut process, b);

            let same = |term: OpaqueTerm, expected: f64| {
                let actual = double_val(term);
                (actual.is_nan() && expected.is_nan()) || actual.to_bits() == expected.to_bits()
            };
            prop_assert!(same(add_float(&mut process, f, g), a + b));
            prop_assert!(same(sub_float(&mut process, f, g), a - b));
            prop_assert!(same(mul_float(&mut process, f, g), a * b));
            prop_assert!(same(div_float(&mut process, f, g), a / b));
            prop_assert!(same(neg_float(&mut process, f), -a));

            prop_assert_eq!(eq_float(f, g).as_bool(), Some(a == b));
            prop_assert_eq!(lt_float(f, g).as_bool(), Some(a < b));
            prop_assert_eq!(ge_float(f, g).as_bool(), Some(a >= b));

            let ordering = float_compare(f, g).as_int().unwrap();
            let reversed = float_compare(g, f).as_int().unwrap();
            prop_assert_eq!(ordering, -reversed);
            if a.is_nan() || b.is_nan() {
                prop_assert_eq!(ordering, 0);
            }

            Ok(())
        })
        .unwrap();
}

#[test]
fn float_of_string_reads_formatted_floats() {
    init();
    TestRunner::new(Config::with_source_file(file!()))
        .run(&finite(), |d| {
            let mut process = Process::new(ProcessOptions::default()).unwrap();
            let f = copy_double(&mut process, d);
            let text = format_float("%.17g", f).unwrap();
            let parsed = float_of_string(&mut process, text.as_bytes()).unwrap();
            prop_assert_eq!(double_val(parsed).to_bits(), d.to_bits());

            Ok(())
        })
        .unwrap();
}

#[test]
fn transcendental_primitives() {
    init();
    let mut process = Process::new(ProcessOptions::default()).unwrap();
    let zero = copy_double(&mut process, 0.0);
    let one = copy_double(&mut process, 1.0);
    let minus_one = copy_double(&mut process, -1.0);

    assert_eq!(double_val(exp_float(&mut process, zero)), 1.0);
    assert_eq!(double_val(log_float(&mut process, one)), 0.0);
    assert_eq!(double_val(log10_float(&mut process, one)), 0.0);
    assert_eq!(double_val(sqrt_float(&mut process, one)), 1.0);
    assert!(double_val(sqrt_float(&mut process, minus_one)).is_nan());
    assert_eq!(double_val(sin_float(&mut process, zero)), 0.0);
    assert_eq!(double_val(cos_float(&mut process, zero)), 1.0);
    assert_eq!(double_val(tan_float(&mut process, zero)), 0.0);
    assert_eq!(double_val(asin_float(&mut process, zero)), 0.0);
    assert_eq!(double_val(acos_float(&mut process, one)), 0.0);
    assert_eq!(double_val(atan_float(&mut process, zero)), 0.0);
    assert_eq!(double_val(atan2_float(&mut process, zero, one)), 0.0);
    assert_eq!(double_val(sinh_float(&mut process, zero)), 0.0);
    assert_eq!(double_val(cosh_float(&mut process, zero)), 1.0);
    assert_eq!(double_val(tanh_float(&mut process, zero)), 0.0);
    assert_eq!(double_val(expm1_float(&mut process, zero)), 0.0);
    assert_eq!(double_val(log1p_float(&mut process, zero)), 0.0);
    assert_eq!(double_val(floor_float(&mut process, minus_one)), -1.0);
    assert_eq!(double_val(ceil_float(&mut process, minus_one)), -1.0);
    assert_eq!(double_val(hypot_float(&mut process, zero, minus_one)), 1.0);
    assert_eq!(double_val(power_float(&mut process, minus_one, zero)), 1.0);
}
