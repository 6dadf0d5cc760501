mod platform;

fn main() -> anyhow::Result<()> {
    platform::logging::initialize(platform::logging::LogDestination::File);
    platform::run_app()
}
