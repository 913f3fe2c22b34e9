//! Project configuration (yantr.json) and project detection

pub mod detect;
pub mod options;
pub mod store;

pub use detect::{detect_framework, detect_package_manager};
pub use options::{DatabaseType, Framework, Orm, PackageManager, Runtime};
pub use store::{
    add_installed_component, config_exists, config_path, is_component_installed, read_config,
    set_database_config, write_config, DatabaseConfig, YantrConfig, CONFIG_FILE,
};
