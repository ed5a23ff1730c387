//! Closed-form delay model.
//!
//! Symbols used throughout:
//!
//! | symbol | meaning                                   |
//! |--------|-------------------------------------------|
//! | `L`    | packet size in bits                       |
//! | `R`    | data rate in bits per second              |
//! | `D`    | link distance in meters                   |
//! | `S`    | propagation speed in meters per second    |
//! | `N`    | number of packets                         |
//! | `λ`    | arrival rate, packets per second          |
//! | `μ`    | service rate, packets per second          |
//! | `ρ`    | traffic intensity λ/μ                     |
//!
//! M/M/1 overload (`λ ≥ μ`) is not an error: queueing delay and system time
//! are `f64::INFINITY` and propagate unchanged.

use tracing::{debug, info, warn};

use crate::types::{Frame, ServiceParams, TransmissionWindow};
use crate::units::SPEED_OF_LIGHT_MPS;
use crate::{NetworkError, Result};

/// Transmission delay `L / R`.
pub fn transmission_delay(bits: f64, rate: f64) -> f64 {
    bits / rate
}

/// Propagation delay `D / S`.
pub fn propagation_delay(distance: f64, speed: f64) -> f64 {
    distance / speed
}

/// Round trip time `2·D/S`.
pub fn round_trip_time(distance: f64, speed: f64) -> f64 {
    2.0 * propagation_delay(distance, speed)
}

/// Service rate `μ = R / L`, packets per second.
pub fn service_rate(rate: f64, bits: f64) -> f64 {
    rate / bits
}

/// Traffic intensity `ρ = λ / μ`.
pub fn traffic_intensity(lambda: f64, mu: f64) -> f64 {
    lambda / mu
}

/// M/M/1 average queueing delay `Wq = ρ / (μ − λ)`.
///
/// Returns positive infinity when `μ − λ ≤ 0`.
///
/// ```rust
/// use netdelay::delay::queueing_delay_mm1;
///
/// assert!((queueing_delay_mm1(40.0, 50.0) - 0.08).abs() < 1e-12);
/// assert_eq!(queueing_delay_mm1(50.0, 50.0), f64::INFINITY);
/// ```
pub fn queueing_delay_mm1(lambda: f64, mu: f64) -> f64 {
    let rho = traffic_intensity(lambda, mu);
    let den = mu - lambda;
    if den <= 0.0 {
        return f64::INFINITY;
    }
    rho / den
}

/// M/M/1 average time in system `W = Wq + 1/μ`.
pub fn system_time_mm1(lambda: f64, mu: f64) -> f64 {
    let wq = queueing_delay_mm1(lambda, mu);
    if wq == f64::INFINITY {
        return f64::INFINITY;
    }
    wq + 1.0 / mu
}

/// Persistent connection service time `2·RTT + N·L/R`.
pub fn persistent_service_time(distance: f64, speed: f64, bits: f64, rate: f64, n: u32) -> f64 {
    let rtt = round_trip_time(distance, speed);
    let d_trans = transmission_delay(bits, rate);
    2.0 * rtt + f64::from(n) * d_trans
}

/// Non-persistent connection service time `(2·RTT + L/R)·N`.
pub fn non_persistent_service_time(distance: f64, speed: f64, bits: f64, rate: f64, n: u32) -> f64 {
    let rtt = round_trip_time(distance, speed);
    let d_trans = transmission_delay(bits, rate);
    (2.0 * rtt + d_trans) * f64::from(n)
}

/// Build and fill a transmission window for `params` over a vacuum link.
///
/// See [`compute_metrics_with_speed`].
pub fn compute_metrics(params: &ServiceParams) -> Result<TransmissionWindow> {
    compute_metrics_with_speed(params, SPEED_OF_LIGHT_MPS)
}

/// Build and fill a transmission window for `params`.
///
/// One synthetic frame of `packet_size_b` bits is added per packet of the
/// workload, then every delay field is filled with `μ = service_rate_pps`
/// and `λ = arrival_rate_pps`. The average packet size is derived last, from
/// the fully populated window.
///
/// # Errors
///
/// - [`NetworkError::EmptyWorkload`] when `packet_load` is zero
/// - [`NetworkError::InvalidParams`] for a non-positive data rate or packet
///   size, a negative distance, or a non-positive propagation speed
///
/// λ and μ are not validated; overload shows up as infinite delays.
pub fn compute_metrics_with_speed(params: &ServiceParams, speed: f64) -> Result<TransmissionWindow> {
    validate(params, speed)?;

    let n = params.packet_load;
    let mut window = TransmissionWindow::with_capacity(&params.label, n as usize);
    for _ in 0..n {
        window.add_frame(Frame::synthetic(&params.label, params.packet_size_b));
    }

    let d_trans = transmission_delay(params.packet_size_b, params.data_rate_bps);
    let d_prop = propagation_delay(params.distance_m, speed);
    let rtt = round_trip_time(params.distance_m, speed);

    let mu = params.service_rate_pps;
    let lambda = params.arrival_rate_pps;
    window.processing_delay = 1.0 / mu;
    window.queueing_delay = queueing_delay_mm1(lambda, mu);
    window.average_system_time_mm1 = system_time_mm1(lambda, mu);
    if window.queueing_delay.is_infinite() {
        warn!(label = %params.label, lambda, mu, "M/M/1 queue overloaded (λ ≥ μ)");
    }

    window.avg_packet_transmission_time = d_trans;
    window.total_transmission_time = f64::from(n) * d_trans;
    window.link_prop_delay = d_prop;
    window.rtt = rtt;
    window.persistent_service_time = persistent_service_time(
        params.distance_m,
        speed,
        params.packet_size_b,
        params.data_rate_bps,
        n,
    );
    window.non_persistent_service_time = non_persistent_service_time(
        params.distance_m,
        speed,
        params.packet_size_b,
        params.data_rate_bps,
        n,
    );

    window.avg_packet_size = window.bits_processed() / window.frames_serviced() as f64;

    debug!(
        label = %params.label,
        rho = traffic_intensity(lambda, mu),
        wq = window.queueing_delay,
        w = window.average_system_time_mm1,
        "Computed window metrics"
    );
    Ok(window)
}

fn validate(params: &ServiceParams, speed: f64) -> Result<()> {
    if params.packet_load == 0 {
        return Err(NetworkError::EmptyWorkload { packet_load: params.packet_load });
    }
    if !params.data_rate_bps.is_finite() || params.data_rate_bps <= 0.0 {
        return Err(NetworkError::invalid_params(
            "data_rate_bps",
            format!("must be positive and finite, got {}", params.data_rate_bps),
        ));
    }
    if !params.packet_size_b.is_finite() || params.packet_size_b <= 0.0 {
        return Err(NetworkError::invalid_params(
            "packet_size_b",
            format!("must be positive and finite, got {}", params.packet_size_b),
        ));
    }
    if !params.distance_m.is_finite() || params.distance_m < 0.0 {
        return Err(NetworkError::invalid_params(
            "distance_m",
            format!("must be non-negative and finite, got {}", params.distance_m),
        ));
    }
    if !speed.is_finite() || speed <= 0.0 {
        return Err(NetworkError::invalid_params(
            "propagation_speed_mps",
            format!("must be positive and finite, got {speed}"),
        ));
    }
    Ok(())
}

/// Link utilization under persistent and non-persistent connections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Utilization {
    /// `ΣTotalTransmissionTime / ΣPersistentServiceTime`
    pub persistent: f64,
    /// `ΣTotalTransmissionTime / ΣNonPersistentServiceTime`
    pub non_persistent: f64,
}

/// Fraction of time the link spends transmitting across `windows`.
///
/// Windows with no frames are logged but still contribute their (zero)
/// values. When either service-time sum is zero the ratio is undefined and
/// [`NetworkError::UndefinedUtilization`] is returned.
///
/// ```rust
/// use netdelay::{TransmissionWindow, compute_utilization};
///
/// let mut windows = Vec::new();
/// for (trans, persistent) in [(1.0, 4.0), (2.0, 5.0), (3.0, 6.0)] {
///     let mut w = TransmissionWindow::new("w");
///     w.total_transmission_time = trans;
///     w.persistent_service_time = persistent;
///     w.non_persistent_service_time = persistent * 2.0;
///     windows.push(w);
/// }
/// let refs: Vec<_> = windows.iter().collect();
/// let util = compute_utilization(&refs).unwrap();
/// assert!((util.persistent - 0.4).abs() < 1e-12);
/// ```
pub fn compute_utilization(windows: &[&TransmissionWindow]) -> Result<Utilization> {
    info!(windows = windows.len(), "Running network utilization query");

    let mut persistent_total = 0.0;
    let mut non_persistent_total = 0.0;
    let mut transmission_total = 0.0;
    for window in windows {
        if window.frames_serviced() == 0 {
            warn!(window = %window.label(), "Window serviced no frames");
        }
        persistent_total += window.persistent_service_time;
        non_persistent_total += window.non_persistent_service_time;
        transmission_total += window.total_transmission_time;
    }

    if persistent_total == 0.0 || non_persistent_total == 0.0 {
        warn!(windows = windows.len(), "Utilization undefined: zero total service time");
        return Err(NetworkError::UndefinedUtilization { windows: windows.len() });
    }

    let utilization = Utilization {
        persistent: transmission_total / persistent_total,
        non_persistent: transmission_total / non_persistent_total,
    };
    debug!(
        transmission_total,
        persistent_total,
        non_persistent_total,
        "Utilization persistent {:.2}%, non-persistent {:.2}%",
        utilization.persistent * 100.0,
        utilization.non_persistent * 100.0
    );
    Ok(utilization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn scenario() -> ServiceParams {
        ServiceParams::new(1.5e6, 2e8, 3.2e7, 5, "scenario")
            .with_arrival_rate(40.0)
            .with_service_rate(50.0)
    }

    #[test]
    fn reference_scenario_mm1() {
        let window = compute_metrics(&scenario()).unwrap();

        assert!((window.processing_delay - 0.02).abs() < EPS);
        assert!((window.queueing_delay - 0.08).abs() < EPS);
        assert!((window.average_system_time_mm1 - 0.10).abs() < EPS);
        assert!((scenario().traffic_intensity() - 0.8).abs() < EPS);
    }

    #[test]
    fn reference_scenario_link_delays() {
        let window = compute_metrics(&scenario()).unwrap();

        let d_trans = 3.2e7 / 2e8;
        let d_prop = 1.5e6 / SPEED_OF_LIGHT_MPS;
        assert!((window.avg_packet_transmission_time - d_trans).abs() < EPS);
        assert!((window.total_transmission_time - 5.0 * d_trans).abs() < EPS);
        assert!((window.link_prop_delay - d_prop).abs() < EPS);
        assert!((window.rtt - 2.0 * d_prop).abs() < EPS);
        assert!((window.persistent_service_time - (4.0 * d_prop + 5.0 * d_trans)).abs() < EPS);
        assert!((window.non_persistent_service_time - (4.0 * d_prop + d_trans) * 5.0).abs() < EPS);
    }

    #[test]
    fn averages_follow_full_population() {
        let window = compute_metrics(&scenario()).unwrap();

        assert_eq!(window.frames_serviced(), 5);
        assert_eq!(window.frames().len(), 5);
        assert_eq!(window.bits_processed(), 5.0 * 3.2e7);
        assert_eq!(window.avg_packet_size, 3.2e7);
        assert!(window.frames().iter().all(|f| f.source == "scenario"));
    }

    #[test]
    fn empty_workload_fails_fast() {
        let params = ServiceParams::new(1.0, 1.0, 1.0, 0, "idle");
        assert!(matches!(
            compute_metrics(&params),
            Err(NetworkError::EmptyWorkload { packet_load: 0 })
        ));
    }

    #[test]
    fn invalid_link_parameters_are_rejected() {
        let zero_rate = ServiceParams::new(1.0, 0.0, 1.0, 1, "x");
        let nan_size = ServiceParams::new(1.0, 1.0, f64::NAN, 1, "x");
        let negative_distance = ServiceParams::new(-1.0, 1.0, 1.0, 1, "x");

        for params in [zero_rate, nan_size, negative_distance] {
            assert!(matches!(compute_metrics(&params), Err(NetworkError::InvalidParams { .. })));
        }
        assert!(matches!(
            compute_metrics_with_speed(&scenario(), 0.0),
            Err(NetworkError::InvalidParams { field: "propagation_speed_mps", .. })
        ));
    }

    #[test]
    fn overload_propagates_infinity() {
        let at_capacity = scenario().with_arrival_rate(50.0);
        let window = compute_metrics(&at_capacity).unwrap();
        assert_eq!(window.queueing_delay, f64::INFINITY);
        assert_eq!(window.average_system_time_mm1, f64::INFINITY);

        // μ = 0 is overloaded too, with an infinite processing delay
        let stalled = scenario().with_service_rate(0.0);
        let window = compute_metrics(&stalled).unwrap();
        assert_eq!(window.queueing_delay, f64::INFINITY);
        assert_eq!(window.processing_delay, f64::INFINITY);
    }

    #[test]
    fn fibre_speed_stretches_propagation() {
        let vacuum = compute_metrics(&scenario()).unwrap();
        let fibre = compute_metrics_with_speed(&scenario(), SPEED_OF_LIGHT_MPS * 2.0 / 3.0).unwrap();
        assert!((fibre.link_prop_delay / vacuum.link_prop_delay - 1.5).abs() < EPS);
    }

    #[test]
    fn utilization_reference_scenario() {
        let windows: Vec<TransmissionWindow> = [(1.0, 4.0, 8.0), (2.0, 5.0, 10.0), (3.0, 6.0, 12.0)]
            .into_iter()
            .map(|(trans, p, np)| {
                let mut w = TransmissionWindow::new("w");
                w.add_frame(Frame::synthetic("w", 1.0));
                w.total_transmission_time = trans;
                w.persistent_service_time = p;
                w.non_persistent_service_time = np;
                w
            })
            .collect();
        let refs: Vec<&TransmissionWindow> = windows.iter().collect();

        let util = compute_utilization(&refs).unwrap();
        assert!((util.persistent - 0.4).abs() < EPS);
        assert!((util.non_persistent - 0.2).abs() < EPS);
    }

    #[test]
    fn utilization_of_computed_links() {
        let links = [
            ServiceParams::new(1500.0 * KILOMETER, 200.0 * MEGABIT, 4.0 * MEGABYTE, 5, "[ 1 ]"),
            ServiceParams::new(600.0 * KILOMETER, 500.0 * MEGABIT, 10.0 * MEGABYTE, 2, "[ 2 ]"),
            ServiceParams::new(1200.0 * KILOMETER, 100.0 * MEGABIT, 8.0 * MEGABIT, 3, "[ 3 ]"),
        ];
        let windows: Vec<_> = links.iter().map(|p| compute_metrics(p).unwrap()).collect();
        let refs: Vec<_> = windows.iter().collect();

        let util = compute_utilization(&refs).unwrap();
        assert!(util.persistent > 0.0 && util.persistent < 1.0);
        assert!(util.non_persistent > 0.0 && util.non_persistent <= util.persistent);
    }

    #[test]
    fn utilization_all_zero_is_undefined() {
        let empty = TransmissionWindow::new("empty");
        assert!(matches!(
            compute_utilization(&[&empty, &empty]),
            Err(NetworkError::UndefinedUtilization { windows: 2 })
        ));
        assert!(matches!(
            compute_utilization(&[]),
            Err(NetworkError::UndefinedUtilization { windows: 0 })
        ));
    }

    #[test]
    fn empty_window_still_contributes() {
        let full = compute_metrics(&scenario()).unwrap();
        let empty = TransmissionWindow::new("empty");

        let alone = compute_utilization(&[&full]).unwrap();
        let mixed = compute_utilization(&[&full, &empty]).unwrap();
        assert_eq!(alone, mixed);
    }

    proptest! {
        #[test]
        fn link_delay_identities(
            bits in 1.0f64..1e9,
            rate in 1.0f64..1e11,
            distance in 1.0f64..1e7,
            speed in 1e7f64..3e8,
        ) {
            prop_assert_eq!(transmission_delay(bits, rate), bits / rate);
            prop_assert_eq!(propagation_delay(distance, speed), distance / speed);
            prop_assert_eq!(round_trip_time(distance, speed), 2.0 * propagation_delay(distance, speed));
        }

        #[test]
        fn stable_queue_is_finite_and_non_negative(mu in 0.1f64..1e6, fraction in 0.0f64..0.999) {
            let lambda = mu * fraction;
            let wq = queueing_delay_mm1(lambda, mu);
            prop_assert!(wq.is_finite());
            prop_assert!(wq >= 0.0);
            prop_assert_eq!(wq, (lambda / mu) / (mu - lambda));
            prop_assert!(system_time_mm1(lambda, mu) >= 1.0 / mu);
        }

        #[test]
        fn overloaded_queue_is_infinite(mu in 0.1f64..1e6, excess in 0.0f64..1e6) {
            let lambda = mu + excess;
            prop_assert_eq!(queueing_delay_mm1(lambda, mu), f64::INFINITY);
            prop_assert_eq!(system_time_mm1(lambda, mu), f64::INFINITY);
        }

        #[test]
        fn non_persistent_costs_at_least_persistent(
            distance in 0.0f64..1e7,
            bits in 1.0f64..1e9,
            rate in 1.0f64..1e11,
            n in 2u32..1000,
        ) {
            let speed = SPEED_OF_LIGHT_MPS;
            let p = persistent_service_time(distance, speed, bits, rate, n);
            let np = non_persistent_service_time(distance, speed, bits, rate, n);
            prop_assert!(np >= p * (1.0 - 1e-12));
        }
    }
}
