use pyo3::prelude::*;

mod env_api;

/// Install a `tracing` subscriber printing to stderr, e.g. `init_logging("info")`.
#[pyfunction]
fn init_logging(level: &str) -> PyResult<()> {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))
}

#[pymodule]
fn brock_env(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<env_api::Tracker>()?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    m.add("MIRROR_SIZE", brockgym::mirror::MIRROR_SIZE)?;
    m.add("ACTION_COUNT", brockgym::Button::ALL.len())?;
    Ok(())
}
