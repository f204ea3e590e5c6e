pub mod config_cmd;
pub mod estimate;
pub mod replay;
pub mod trim;
