//! Scenario tests driving the full frame loop

mod support;

mod assets;
mod placement;
mod teardown;
