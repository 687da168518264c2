// Test modules for all components
pub mod toy_envs;
pub mod test_control;
pub mod test_policy;
pub mod test_returns;
