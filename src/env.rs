use std::{env, path::PathBuf};

pub struct Env {}

impl Env {
    pub const SYS_NAME: &'static str = "sokplot";
    pub const RESULTS_DIR_VAR: &'static str = "SOK_PLOT_RESULTS_DIR";
    pub const PLOTS_DIR_VAR: &'static str = "SOK_PLOT_PLOTS_DIR";

    pub fn proj_root() -> PathBuf {
        env!("CARGO_MANIFEST_DIR").into()
    }

    /// Directory holding one sub-directory (or CSV file) per benchmark run.
    pub fn results_root() -> PathBuf {
        match env::var(Self::RESULTS_DIR_VAR) {
            Ok(dir) => PathBuf::from(shellexpand::tilde(&dir).as_ref()),
            Err(_) => {
                let mut path = Self::proj_root();
                path.push("results");
                path
            }
        }
    }

    pub fn plots_root() -> PathBuf {
        match env::var(Self::PLOTS_DIR_VAR) {
            Ok(dir) => PathBuf::from(shellexpand::tilde(&dir).as_ref()),
            Err(_) => {
                let mut path = Self::proj_root();
                path.push("plots");
                path
            }
        }
    }
}
