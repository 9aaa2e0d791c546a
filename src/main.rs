use impostor::{AppConfig, LoggingConfig, init_logging, run_with_config};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    run_with_config(AppConfig::new().title("Sphere Impostor").size(1280, 720))
}
