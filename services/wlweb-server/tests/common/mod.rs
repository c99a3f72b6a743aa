// Common test utilities and fixtures

// Each test crate uses a different subset
#[allow(dead_code)]
pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{answering_kernel, create_site, fake_kernel, fake_kernel_config, AfterLimit};
#[allow(unused_imports)]
pub use helpers::{body_string, kernel_payload, query_param, ScriptedEvaluator};
