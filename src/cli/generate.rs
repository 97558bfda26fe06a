//! Generate command implementation

use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::config::PxsheetConfig;
use crate::generate::{generate, GenerateOptions};
use crate::png::EncodeOptions;

/// Run the generate command
pub fn run_generate(config: &PxsheetConfig, name: Option<String>) -> ExitCode {
    let options = GenerateOptions {
        definitions_dir: config.project.definitions.clone(),
        out_dir: config.project.out.clone(),
        filter: name,
        write_metadata: config.output.metadata,
        encode: EncodeOptions { compression: config.output.compression },
    };

    let report = match generate(&options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    for sheet in &report.generated {
        let layout = &sheet.layout;
        println!(
            "✓ {}.png ({}x{}, {} directions × {} frames)",
            sheet.name,
            layout.width(),
            layout.height(),
            layout.rows,
            layout.cols
        );
    }

    for failure in &report.failures {
        eprintln!("✗ {} ({}): {}", failure.name, failure.source.display(), failure.error);
    }

    if report.is_success() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        eprintln!(
            "Error: {} of {} sprite(s) failed",
            report.failures.len(),
            report.failures.len() + report.generated.len()
        );
        ExitCode::from(EXIT_ERROR)
    }
}
