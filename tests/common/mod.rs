//! Shared helpers for `meshframe` integration tests.

use proptest::test_runner::{Config as ProptestConfig, RngAlgorithm, TestRng, TestRunner};

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Proptest runner with a fixed seed so failures reproduce across machines.
pub fn deterministic_runner(cases: u32) -> TestRunner {
    let config = ProptestConfig {
        cases,
        ..ProptestConfig::default()
    };
    let rng = TestRng::deterministic_rng(RngAlgorithm::ChaCha);
    TestRunner::new_with_rng(config, rng)
}

/// Turn arbitrary sort keys into a delivery order whose final element is the
/// last chunk index.
pub fn order_ending_with_last(keys: &[u32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by_key(|&i| keys[i]);
    if let Some(last) = keys.len().checked_sub(1) {
        order.retain(|&i| i != last);
        order.push(last);
    }
    order
}
