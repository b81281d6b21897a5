//! `needy render` - load a state file and print it back out

use anyhow::Result;
use needystates::State;

use crate::cli::RenderArgs;
use crate::config::{self, ConfigFormat};

pub fn run(args: RenderArgs) -> Result<()> {
    let (mapping, source_format) = config::load_state(&args.file)?;
    let format = args.format.map_or(source_format, ConfigFormat::from);

    let state = State::new(&mapping);
    log::debug!(
        "Rendering {} attributes as {}",
        state.len(),
        format.extension()
    );

    let rendered = format.render(&state.to_mapping())?;
    println!("{}", rendered.trim_end());
    Ok(())
}
