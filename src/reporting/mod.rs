pub mod logging;

pub use logging::{init_logger, log_config_info, log_warning};
