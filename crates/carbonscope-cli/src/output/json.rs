use carbonscope_core::error::EngineError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
