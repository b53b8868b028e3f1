//! Shows the three ways of sizing a training set and the errors each one can
//! raise.
//!
//! Run with `RUST_LOG=debug` to see the split sizes logged by the library.

use hsi_preprocessing::{SetSize, SplitError, train_val_test_split};
use ndarray::{Array1, Array2};

fn main() {
    env_logger::init();

    println!("Train/val/test split modes");
    println!("==========================");

    // 60 samples, classes 0/1/2 of sizes 30/20/10.
    let data = Array2::from_shape_fn((60, 3), |(i, j)| (i * 3 + j) as f32);
    let labels = Array1::from_shape_fn(60, |i| match i {
        0..=29 => 0_u8,
        30..=49 => 1,
        _ => 2,
    });

    let sizes = vec![
        ("fraction of all samples", SetSize::Fraction(0.5)),
        ("absolute count", SetSize::Count(12)),
        ("same count for every class", SetSize::PerClass(vec![8])),
        ("one count per class", SetSize::PerClass(vec![10, 6, 2])),
        ("fewer counts than classes", SetSize::PerClass(vec![10, 6])),
    ];

    for (description, size) in sizes {
        match train_val_test_split(&data, &labels, &size, 0.25, 7) {
            Ok(sets) => {
                let per_class: Vec<usize> = (0..3_u8)
                    .map(|class| {
                        sets.train_y
                            .iter()
                            .chain(sets.val_y.iter())
                            .filter(|&&l| l == class)
                            .count()
                    })
                    .collect();
                println!(
                    "\n{} ({:?}):\n   train={} val={} test={} per-class(train+val)={:?}",
                    description,
                    size,
                    sets.train_y.len(),
                    sets.val_y.len(),
                    sets.test_y.len(),
                    per_class
                );
            }
            Err(e) => println!("\n{}: ✗ {}", description, e),
        }
    }

    println!("\nInvalid sizes:");
    for size in [
        SetSize::Fraction(1.5),
        SetSize::Count(0),
        SetSize::Count(100),
        SetSize::PerClass(vec![]),
    ] {
        match train_val_test_split(&data, &labels, &size, 0.25, 7) {
            Ok(_) => println!("   {:?}: unexpectedly accepted", size),
            Err(SplitError::FractionOutOfRange(f)) => {
                println!("   ✓ fraction {} rejected", f)
            }
            Err(e) => println!("   ✓ {:?} rejected: {}", size, e),
        }
    }
}
