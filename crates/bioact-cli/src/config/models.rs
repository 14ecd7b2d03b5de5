use bioact::engine::config::PipelineConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub inputs: Vec<PathBuf>,
    pub output_template: PathBuf,
    pub descriptors_out: Option<PathBuf>,
    pub subset_out: Option<PathBuf>,
    pub print_link: bool,
    pub core_config: PipelineConfig,
}
