use approx::assert_abs_diff_eq;

use mlpg::{
    GlobalVarianceModel, GvConfig, GvOutcome, ParameterStream, StreamKind, Window, Windows,
    generate, mlpg::GvSkip, pstream::VoicingMask,
};

fn static_delta() -> Windows {
    Windows::new(vec![
        Window::identity(),
        Window::with_widths(-1, 1, vec![-0.5, 0.0, 0.5]).unwrap(),
    ])
}

fn ramp(frames: usize) -> ParameterStream {
    let mut stream = ParameterStream::new(StreamKind::Spectrum, frames, 1, 2);
    for t in 0..frames {
        let target = if t % 6 < 3 { 1.0 } else { -1.0 };
        stream.set(t, 0, 0, target, 1.0);
        stream.set(t, 1, 0, 0.0, 20.0);
    }
    stream
}

#[test]
fn flat_target() {
    let mut stream = ParameterStream::new(StreamKind::Spectrum, 3, 1, 2);
    for t in 0..3 {
        stream.set(t, 0, 0, 2.0, 1.0);
        stream.set(t, 1, 0, 0.0, 1.0);
    }
    let report = generate(&mut stream, &static_delta(), None, &GvConfig::default()).unwrap();
    assert_eq!(report.frames, 3);

    let trajectory = stream.into_trajectory().unwrap();
    for row in trajectory.to_vec() {
        assert_abs_diff_eq!(row[0], 2.0, epsilon = 1e-6);
    }
}

#[test]
fn static_only() {
    let windows = Windows::new(vec![Window::identity()]);
    let means = [0.25, -4.0, 9.5, 1e-3, 3.0];
    let ivars = [1e-4, 1.0, 3.5, 1e38, 42.0];

    let mut stream = ParameterStream::new(StreamKind::Spectrum, 5, 1, 1);
    for t in 0..5 {
        stream.set(t, 0, 0, means[t], ivars[t]);
    }
    generate(&mut stream, &windows, None, &GvConfig::default()).unwrap();

    for (generated, mean) in stream.trajectory().unwrap().column(0).zip(means) {
        assert_abs_diff_eq!(generated, mean, epsilon = 1e-12);
    }
}

#[test]
fn gv_neutrality() {
    let windows = static_delta();
    let gv = GlobalVarianceModel::new(vec![2.0], vec![3.0]);
    let mut config = GvConfig::default();
    config.set_gv_weight(0.0);
    config.set_max_iterations(1000);

    let mut ml = ramp(24);
    generate(&mut ml, &windows, None, &config).unwrap();
    let mut refined = ramp(24);
    let report = generate(&mut refined, &windows, Some(&gv), &config).unwrap();

    assert_eq!(report.dimensions[0].gv, GvOutcome::Skipped(GvSkip::ZeroWeight));
    assert_eq!(ml.trajectory(), refined.trajectory());
}

#[test]
fn determinism() {
    let windows = static_delta();
    let gv = GlobalVarianceModel::new(vec![0.9], vec![8.0]);

    let mut first = ramp(30);
    let mut second = ramp(30);
    generate(&mut first, &windows, Some(&gv), &GvConfig::default()).unwrap();
    generate(&mut second, &windows, Some(&gv), &GvConfig::default()).unwrap();

    let bits = |stream: &ParameterStream| -> Vec<u64> {
        stream
            .trajectory()
            .unwrap()
            .as_slice()
            .iter()
            .map(|p| p.to_bits())
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn gv_expands_oversmoothed_trajectory() {
    let windows = static_delta();
    let gv = GlobalVarianceModel::new(vec![0.9], vec![8.0]);

    let variance = |stream: &ParameterStream| {
        let column: Vec<f64> = stream.trajectory().unwrap().column(0).collect();
        let mean = column.iter().sum::<f64>() / column.len() as f64;
        column.iter().map(|c| (c - mean) * (c - mean)).sum::<f64>() / column.len() as f64
    };

    let mut ml = ramp(30);
    generate(&mut ml, &windows, None, &GvConfig::default()).unwrap();
    let mut refined = ramp(30);
    let report = generate(&mut refined, &windows, Some(&gv), &GvConfig::default()).unwrap();

    assert!(
        report
            .dimensions
            .iter()
            .all(|d| !matches!(d.gv, GvOutcome::Skipped(_)))
    );
    assert!(variance(&refined) > variance(&ml));
}

#[test]
fn voicing_boundary() {
    let mask: VoicingMask = [true, true, false, true].into_iter().collect();
    let mut stream = ParameterStream::with_voicing(StreamKind::Lf0, mask, 1, 2);
    for t in 0..3 {
        stream.set(t, 0, 0, 5.0, 1.0);
        stream.set(t, 1, 0, 0.0, 1.0);
    }
    stream.apply_boundary_constraints(&static_delta());

    // frame 1 is followed by an unvoiced frame, frame 2 follows one
    assert_eq!(stream.inverse_variance(1, 1, 0), 0.0);
    assert_eq!(stream.inverse_variance(2, 1, 0), 0.0);
    // statics are untouched
    assert_eq!(stream.inverse_variance(1, 0, 0), 1.0);
    assert_eq!(stream.inverse_variance(2, 0, 0), 1.0);
}
