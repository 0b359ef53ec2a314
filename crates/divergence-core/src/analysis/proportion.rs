use statrs::function::erf::erfc;

/// Two-proportion z-test result for one move's score rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProportionTest {
    pub base_rate: f64,
    pub target_rate: f64,
    pub delta: f64,
    pub z: f64,
    pub p_value: f64,
}

/// Compare `base_score / base_n` with `target_score / target_n` using the pooled
/// variance under the null hypothesis of one shared underlying rate.
/// Returns `None` when either sample is empty.
pub(crate) fn two_proportion_z_test(
    base_score: f64,
    base_n: u64,
    target_score: f64,
    target_n: u64,
) -> Option<ProportionTest> {
    if base_n == 0 || target_n == 0 {
        return None;
    }

    let n1 = base_n as f64;
    let n2 = target_n as f64;
    let base_rate = base_score / n1;
    let target_rate = target_score / n2;
    let delta = target_rate - base_rate;

    let pooled = (base_score + target_score) / (n1 + n2);
    let variance = pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2);

    // Zero variance (every game won, or every game lost) carries no evidence.
    let (z, p_value) = if variance > 0.0 && variance.is_finite() {
        let z = delta / variance.sqrt();
        (z, erfc(z.abs() / std::f64::consts::SQRT_2).clamp(0.0, 1.0))
    } else {
        (0.0, 1.0)
    };

    Some(ProportionTest {
        base_rate,
        target_rate,
        delta,
        z,
        p_value,
    })
}
