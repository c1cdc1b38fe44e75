//! Helpers for turning a parameter record's type information into JSON
//! Schema. The schema is produced with [`schemars`] and published next to
//! the profile catalog so clients know which overrides a profile accepts.

use schemars::{JsonSchema, SchemaGenerator, r#gen::SchemaSettings};
use serde_json::{self, Value};

/// Generate a JSON Schema for the given `T` **inline**, i.e. without
/// `$ref` pointers to external definitions.
///
/// # Panics
///
/// This function panics only if the resulting [`RootSchema`] cannot be
/// serialized into valid JSON – which should never happen as long as
/// [`schemars`] works correctly.
///
/// [`RootSchema`]: schemars::schema::RootSchema
///
/// # Example
///
/// ```
/// use galleria_core::{parameters::IdeogramParameters, schema_util::derive_parameters_schema};
///
/// let schema = derive_parameters_schema::<IdeogramParameters>();
/// assert_eq!(schema["type"], "object");
/// ```
pub fn derive_parameters_schema<T>() -> Value
where
    T: JsonSchema + 'static,
{
    let mut settings = SchemaSettings::draft07();
    settings.inline_subschemas = true;

    let generator = SchemaGenerator::new(settings);
    let root = generator.into_root_schema_for::<T>();

    serde_json::to_value(root).expect("generated schema should be serialisable")
}
