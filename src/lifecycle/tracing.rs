//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by the
//! `RUST_LOG` environment variable. Module paths are hidden (`with_target(false)`);
//! actor log lines carry an `entity_type` field instead.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: startup and shutdown with the final store size
//! - **Entity operations**: Create, Update, and every scope step (opened, staged,
//!   committed, rolled back, abandoned)
//! - **Planning**: the strategy chosen for each selection and the committed plan
//!
//! ## Usage Examples
//!
//! ```bash
//! # One line per committed plan and scope
//! RUST_LOG=info cargo run
//!
//! # Strategy choice, deferred writes, full payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the planner
//! RUST_LOG=robot_dispatch::coordinator=debug cargo run
//! ```
//!
//! A single planning call at `info` reads:
//!
//! ```text
//! INFO Scope opened entity_type="Order" scope=scope_3 waiting=1
//! INFO Scope committed entity_type="Order" scope=scope_3 written=4
//! INFO generate_plan: Order scope committed scope=scope_3 written=4 robot=robot-2
//! INFO generate_plan: Delivery plan committed orders=4 total_weight=10 total_value=31 robot=robot-2
//! ```

/// Installs the global subscriber. Call once, at the start of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
