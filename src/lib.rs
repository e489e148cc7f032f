use env_logger::Env;
use std::sync::Once;

pub mod aggregate;
pub mod config;
pub mod env;
pub mod error;
pub mod figure;
pub mod format;
pub mod layout;
pub mod loader;
pub mod markup;
pub mod phase;
pub mod table;
pub mod tasks;

pub use config::{AxisScale, Benchmark, ChartConfig};
pub use error::PlotError;
pub use figure::{render, Figure};
pub use table::ResultTable;

static INIT: Once = Once::new();

pub fn init_logging(is_test: bool) {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(Env::default().filter_or("RUST_LOG", "info"))
            .is_test(is_test)
            .try_init();
    });
}
