//! Print the product document schema.

use loomwise_core::schema::product_schema;

/// Print the `product` schema as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if the schema cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn print() -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(&product_schema())?;
    println!("{json}");
    Ok(())
}
