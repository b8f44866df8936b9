//! cloudrun-kit - Generate Cloud Run deployment artifacts

fn main() -> anyhow::Result<()> {
    cloudrun_kit::run()
}
