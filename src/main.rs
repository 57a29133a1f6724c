use anyhow::Result;
use boxshot::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let app: BoxShotApp = boxshot::default();
    app.run()?;
    Ok(())
}
