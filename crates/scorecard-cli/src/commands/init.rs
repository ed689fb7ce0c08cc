//! The `scorecard init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    create("scorecard.toml", SAMPLE_CONFIG)?;

    std::fs::create_dir_all("exams")?;
    create("exams/example.toml", EXAMPLE_EXAM)?;

    std::fs::create_dir_all("answers")?;
    create("answers/example.toml", EXAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Edit scorecard.toml with the address of your report page");
    println!("  2. Run: scorecard validate --exam exams/example.toml");
    println!("  3. Run: scorecard score --exam exams/example.toml --answers answers/example.toml");

    Ok(())
}

fn create(path: &str, content: &str) -> Result<()> {
    if Path::new(path).exists() {
        println!("{path} already exists, skipping.");
    } else {
        std::fs::write(path, content)?;
        println!("Created {path}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# scorecard configuration

# Page that share links point at. ${VAR} references are read from the
# environment, and SCORECARD_BASE_URL overrides this value.
base_url = "http://localhost:5173/"

output_dir = "./scorecard-reports"
# Any of json, html, pdf, or all.
default_format = "json,html"

[page]
width_mm = 210.0
height_mm = 297.0
margin_mm = 12.0
# The built-in PDF font has no Hangul glyphs; point this at a TTF that does.
# font_path = "/usr/share/fonts/truetype/nanum/NanumGothic.ttf"
"#;

const EXAMPLE_EXAM: &str = include_str!("../../../../exams/example.toml");

const EXAMPLE_ANSWERS: &str = include_str!("../../../../answers/example.toml");
