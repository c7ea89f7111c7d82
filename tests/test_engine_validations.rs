use ndarray::{Array2, array};

use xcsf::{
    ConditionType, PredictorType, Xcsf, XcsfError, XcsfParams, XcsfParamsBuilder,
};

#[test]
fn test_shape_errors_leave_engine_untouched() {
    let params = XcsfParamsBuilder::default()
        .pop_size(20)
        .max_trials(50)
        .seed(Some(1))
        .build()
        .unwrap();
    let mut xcsf = Xcsf::new(2, 1, params).unwrap();

    // wrong X width
    let x = array![[0.1], [0.2]];
    let y = array![[1.0], [2.0]];
    assert!(matches!(xcsf.fit(&x, &y, true), Err(XcsfError::Shape(_))));

    // row count mismatch
    let x = array![[0.1, 0.2], [0.3, 0.4]];
    let y = array![[1.0]];
    assert!(matches!(xcsf.fit(&x, &y, true), Err(XcsfError::Shape(_))));

    // wrong Y width
    let x = array![[0.1, 0.2]];
    let y = array![[1.0, 2.0]];
    assert!(matches!(xcsf.fit(&x, &y, true), Err(XcsfError::Shape(_))));

    assert_eq!(xcsf.time(), 0);
    assert_eq!(xcsf.pop_num(), 0);
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let bad_probability = XcsfParamsBuilder::default()
        .p_mutation(1.5)
        .build()
        .unwrap();
    assert!(Xcsf::new(1, 1, bad_probability).is_err());

    let bad_bounds = XcsfParamsBuilder::default()
        .min_con(2.0)
        .max_con(1.0)
        .build()
        .unwrap();
    assert!(Xcsf::new(1, 1, bad_bounds).is_err());

    let mna_above_pop = XcsfParamsBuilder::default()
        .pop_size(5)
        .theta_mna(10)
        .build()
        .unwrap();
    assert!(Xcsf::new(1, 1, mna_above_pop).is_err());
}

#[test]
fn test_graph_output_requires_enough_nodes() {
    let params = XcsfParamsBuilder::default()
        .cond_type(ConditionType::DgpGraph)
        .pred_type(PredictorType::GraphOutput)
        .dgp_num_nodes(2)
        .build()
        .unwrap();
    // needs 1 match node + 2 output nodes
    assert!(Xcsf::new(1, 2, params).is_err());
}

#[test]
fn test_config_file_drives_the_engine() {
    let dir = std::env::temp_dir();
    let path = dir.join("xcsf_validation_config.ini");
    std::fs::write(
        &path,
        "POP_SIZE = 40\nMAX_TRIALS = 100\nPRED_TYPE = 2\nSEED = 7\n",
    )
    .unwrap();

    let params = XcsfParams::from_ini(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(params.pop_size, 40);
    assert_eq!(params.pred_type, PredictorType::RlsLinear);

    let x = Array2::from_shape_fn((20, 1), |(i, _)| i as f64 / 20.0);
    let y = x.mapv(|v| v + 1.0);
    let mut xcsf = Xcsf::new(1, 1, params).unwrap();
    xcsf.fit(&x, &y, true).unwrap();
    assert!(xcsf.pop_num() <= 40);
}

#[test]
fn test_alternative_condition_variants_learn() {
    // smoke coverage for the non-interval conditions on a small problem
    for cond_type in [
        ConditionType::AlwaysMatch,
        ConditionType::Ellipsoid,
        ConditionType::GpTree,
        ConditionType::DgpGraph,
        ConditionType::Neural,
    ] {
        let params = XcsfParamsBuilder::default()
            .pop_size(30)
            .max_trials(300)
            .cond_type(cond_type)
            .dgp_num_nodes(6)
            .num_hidden_neurons(4)
            .eta(0.5)
            .seed(Some(55))
            .build()
            .unwrap();

        let x = Array2::from_shape_fn((50, 1), |(i, _)| i as f64 / 50.0);
        let y = x.mapv(|v| 0.5 * v + 0.25);

        let mut xcsf = Xcsf::new(1, 1, params).unwrap();
        xcsf.fit(&x, &y, true)
            .unwrap_or_else(|e| panic!("{cond_type:?}: fit failed: {e}"));
        assert!(
            xcsf.pop_num() <= 30,
            "{cond_type:?}: population bound violated"
        );
        let out = xcsf.predict(&x).unwrap();
        assert_eq!(out.dim(), (50, 1));
    }
}

#[test]
fn test_graph_output_predictions_stay_in_unit_interval() {
    let params = XcsfParamsBuilder::default()
        .pop_size(30)
        .max_trials(200)
        .cond_type(ConditionType::DgpGraph)
        .pred_type(PredictorType::GraphOutput)
        .dgp_num_nodes(6)
        .seed(Some(56))
        .build()
        .unwrap();

    let x = Array2::from_shape_fn((40, 1), |(i, _)| i as f64 / 40.0);
    let y = x.mapv(|v| if v > 0.5 { 1.0 } else { 0.0 });

    let mut xcsf = Xcsf::new(1, 1, params).unwrap();
    xcsf.fit(&x, &y, true).unwrap();
    let out = xcsf.predict(&x).unwrap();
    for &v in out.iter() {
        assert!((0.0..=1.0).contains(&v), "graph output {v} out of range");
    }
}
