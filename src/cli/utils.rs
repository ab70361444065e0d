use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a collection, or `message` when it is empty
pub fn output_collection(
    output_format: &OutputFormat,
    items: &[Value],
    message: &str,
    render: impl Fn(&Value) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Text if items.is_empty() => {
            println!("{}", message);
        }
        OutputFormat::Text => {
            for item in items {
                println!("{}", render(item));
            }
        }
    }
    Ok(())
}

/// One-line text rendering of a knowledge base entry
pub fn entry_line(entry: &Value) -> String {
    let field = |name: &str| entry.get(name).and_then(Value::as_str).unwrap_or("-");
    format!(
        "{}  [{}]  {}  {}",
        field("id_conhecimento"),
        field("status"),
        field("categoria"),
        field("pergunta_principal")
    )
}

/// Multi-line text rendering of a knowledge base entry
pub fn entry_details(entry: &Value) -> String {
    let field = |name: &str| entry.get(name).and_then(Value::as_str).unwrap_or("-");
    let keywords = entry
        .get("palavra_chave")
        .and_then(Value::as_array)
        .map(|k| {
            k.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    format!(
        "ID: {}\nArquivo: {}\nCategoria: {}\nStatus: {}\nDisciplina: {}\nURL: {}\nPalavras-chave: {}\n\n{}",
        field("id_conhecimento"),
        field("pergunta_principal"),
        field("categoria"),
        field("status"),
        field("id_disciplina"),
        field("url_documento"),
        keywords,
        field("resposta")
    )
}
