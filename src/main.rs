use std::io::{stdin, BufRead, Write};

use anyhow::Context;

use rsqlint::{parse, DataType, ParseResult, Row, Schema, Value};

fn main() -> anyhow::Result<()> {
    let schema = Schema::new("table")
        .with_column("name", DataType::Str)
        .with_column("age", DataType::Num)
        .with_column("active", DataType::Bool);

    let row = Row::from([
        ("name".to_string(), Value::Str("ada".to_string())),
        ("age".to_string(), Value::Num(36.0)),
        ("active".to_string(), Value::Bool(true)),
    ]);

    cli(&schema, &row)
}

fn cli(schema: &Schema, row: &Row) -> anyhow::Result<()> {
    print_flushed("rsqlint> ")?;

    let mut line_buffer = String::new();

    while let Ok(n) = stdin().lock().read_line(&mut line_buffer) {
        if n == 0 {
            break;
        }

        match line_buffer.trim() {
            ".exit" => break,
            ".schema" => display_schema(schema),
            "" => {}
            query => display_result(&parse(query, schema), row),
        }

        print_flushed("\nrsqlint> ")?;

        line_buffer.clear();
    }

    Ok(())
}

fn display_schema(schema: &Schema) {
    println!("table: {}", schema.table_name());
    for (name, data_type) in schema.columns() {
        println!("  {name}: {data_type}");
    }
}

fn display_result(result: &ParseResult, row: &Row) {
    for (section, diagnostic) in result.diagnostics.iter() {
        match &diagnostic.error {
            Some(message) => println!("[{section}] {}  -- {message}", diagnostic.text),
            None => println!("[{section}] {}  ({})", diagnostic.text, diagnostic.kind),
        }
    }

    if result.valid {
        if let Some(conditions) = &result.conditions {
            println!("conditions: {conditions}");
            println!("demo row matches: {}", conditions.evaluate(row));
        }
    } else {
        match &result.error {
            Some(error) => println!("invalid: {error}"),
            None => println!("invalid query"),
        }
    }
}

fn print_flushed(s: &str) -> anyhow::Result<()> {
    print!("{}", s);
    std::io::stdout().flush().context("flush stdout")
}
