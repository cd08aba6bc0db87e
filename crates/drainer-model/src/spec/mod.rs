mod loop_config;
pub use loop_config::LoopConfig;
