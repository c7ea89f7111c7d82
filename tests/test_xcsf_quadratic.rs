use ndarray::Array2;

use xcsf::{PredictorType, RandomGenerator, Xcsf, XcsfParamsBuilder, XcsfRandomGenerator};

fn product_dataset(rows: usize, seed: u64) -> (Array2<f64>, Array2<f64>) {
    // y = x1 * x2 on the unit square
    let mut rng = XcsfRandomGenerator::new_from_seed(Some(seed));
    let x = Array2::from_shape_fn((rows, 2), |_| rng.gen_probability());
    let y = Array2::from_shape_fn((rows, 1), |(i, _)| x[[i, 0]] * x[[i, 1]]);
    (x, y)
}

#[test]
fn test_nlms_quadratic_fits_cross_term() {
    let params = XcsfParamsBuilder::default()
        .pop_size(100)
        .max_trials(5000)
        .pred_type(PredictorType::NlmsQuadratic)
        .eta(0.5)
        .seed(Some(2024))
        .build()
        .expect("failed to build parameters");

    let (x_train, y_train) = product_dataset(400, 1);
    let (x_test, y_test) = product_dataset(100, 2);

    let mut xcsf = Xcsf::new(2, 1, params).expect("failed to build engine");
    xcsf.fit(&x_train, &y_train, true).expect("fit failed");

    let mse = xcsf.score(&x_test, &y_test).expect("score failed");
    assert!(mse < 0.02, "quadratic test MSE {mse} above threshold");
}

#[test]
fn test_rls_quadratic_fits_cross_term() {
    let params = XcsfParamsBuilder::default()
        .pop_size(100)
        .max_trials(2000)
        .pred_type(PredictorType::RlsQuadratic)
        .seed(Some(2025))
        .build()
        .expect("failed to build parameters");

    let (x_train, y_train) = product_dataset(400, 3);
    let (x_test, y_test) = product_dataset(100, 4);

    let mut xcsf = Xcsf::new(2, 1, params).expect("failed to build engine");
    xcsf.fit(&x_train, &y_train, true).expect("fit failed");

    let mse = xcsf.score(&x_test, &y_test).expect("score failed");
    assert!(mse < 0.01, "RLS quadratic test MSE {mse} above threshold");
}

#[test]
fn test_multi_output_regression() {
    let params = XcsfParamsBuilder::default()
        .pop_size(80)
        .max_trials(3000)
        .eta(0.5)
        .seed(Some(2026))
        .build()
        .unwrap();

    // two linear outputs of one input
    let rows = 200;
    let x = Array2::from_shape_fn((rows, 1), |(i, _)| i as f64 / rows as f64);
    let y = Array2::from_shape_fn((rows, 2), |(i, j)| {
        let v = x[[i, 0]];
        if j == 0 { 3.0 * v } else { 1.0 - v }
    });

    let mut xcsf = Xcsf::new(1, 2, params).unwrap();
    xcsf.fit(&x, &y, true).unwrap();
    let mse = xcsf.score(&x, &y).unwrap();
    assert!(mse < 0.01, "multi-output MSE {mse} above threshold");
}
