//! List command implementation

use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::config::PxsheetConfig;
use crate::registry::SpriteRegistry;
use crate::renderer::{layout_for, validate};

/// Run the list command
pub fn run_list(config: &PxsheetConfig) -> ExitCode {
    let dir = &config.project.definitions;
    let registry = SpriteRegistry::load_dir(dir);

    if registry.is_empty() {
        eprintln!("Error: no sprite definitions found in {}", dir.display());
        return ExitCode::from(EXIT_ERROR);
    }

    for sprite in registry.sprites() {
        let def = &sprite.definition;
        match validate(def).and_then(|_| layout_for(def)) {
            Ok(layout) => {
                let directions: Vec<&str> = layout.directions.iter().map(|d| d.as_str()).collect();
                println!(
                    "{} ({}x{}, {} frame(s)): {}",
                    def.name,
                    layout.width(),
                    layout.height(),
                    layout.cols,
                    directions.join(", ")
                );
            }
            Err(e) => println!("{} (invalid): {}", def.name, e),
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
