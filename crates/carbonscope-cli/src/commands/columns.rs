use carbonscope_core::error::EngineError;
use carbonscope_core::extraction::columns::Field;
use carbonscope_core::EngineOptions;

use crate::output;

pub fn run(output_format: &str, options: &EngineOptions) -> Result<(), EngineError> {
    if output_format == "json" {
        return output::json::print(&options.columns);
    }

    println!("Header synonyms, highest priority first:\n");
    for field in Field::ALL {
        println!(
            "  {:<10} {}",
            field.label(),
            options.columns.for_field(field).join(", ")
        );
    }
    println!();
    println!("A sheet needs a company or an emissions column to be readable.");
    Ok(())
}
