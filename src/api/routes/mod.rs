// API Routes

pub mod metrics;
