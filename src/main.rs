// Small walk-through of the preparation stages on a synthetic cube.
// Pass `<experiments_dir> <dest>` to also collect a metrics report.
use hsi_prep::{
    SetSize, collect_artifacts_report, remove_nan_samples, reshape_cube_to_1d_samples,
    train_val_test_split,
};
use env_logger::Env;
use ndarray::{Array2, Array3};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // 8 bands over a 10x10 scene, channels first, with one dead pixel.
    let mut cube = Array3::from_shape_fn((8, 10, 10), |(c, h, w)| (c * 100 + h * 10 + w) as f32);
    cube[[3, 4, 4]] = f32::NAN;
    let ground_truth = Array2::from_shape_fn((10, 10), |(h, _)| (h / 4) as u8);

    let (samples, labels) = reshape_cube_to_1d_samples(&cube, &ground_truth, 0)?;
    let (samples, labels) = remove_nan_samples(&samples, &labels)?;
    let labels = labels.column(0).to_owned();
    println!("{} usable pixels with {} bands", samples.nrows(), samples.ncols());

    for train_size in [
        SetSize::Fraction(0.8),
        SetSize::Count(30),
        SetSize::PerClass(vec![10, 10, 5]),
    ] {
        let sets = train_val_test_split(&samples, &labels, &train_size, 0.1, 0)?;
        println!(
            "{:?}: train={} val={} test={}",
            train_size,
            sets.train_y.len(),
            sets.val_y.len(),
            sets.test_y.len()
        );
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [experiments, dest] = args.as_slice() {
        let written = collect_artifacts_report(experiments, dest, None)?;
        println!("Report written to {}", written.display());
    }
    Ok(())
}
