//! Listing of the built-in model catalog.

use std::io::Write;

use crate::core::models::{load_builtin_models, ModelOption};

pub fn write_models<W: Write>(
    models: &[ModelOption],
    default_model: Option<&str>,
    out: &mut W,
) -> std::io::Result<()> {
    writeln!(out, "🤖 Available Models")?;
    writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    for (idx, model) in models.iter().enumerate() {
        let marker = if Some(model.id.as_str()) == default_model {
            " (default)"
        } else {
            ""
        };
        writeln!(out, "{:>2}. {}{marker}", idx + 1, model.display_name)?;
        writeln!(out, "    id: {}", model.id)?;
        writeln!(out, "    {}", model.description)?;
    }
    Ok(())
}

pub fn list_models(default_model: Option<&str>) -> std::io::Result<()> {
    let models = load_builtin_models();
    let stdout = std::io::stdout();
    write_models(&models, default_model, &mut stdout.lock())
}
