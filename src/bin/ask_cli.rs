use anyhow::{bail, Result};
use std::env;
use study_assistant::{config::AppConfig, registry::ComponentRegistry, StudyAssistant};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut as_json = false;
    let mut words = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => as_json = true,
            _ => words.push(arg),
        }
    }

    let message = words.join(" ");
    if message.trim().is_empty() {
        bail!("usage: ask_cli [--json] <message>");
    }

    let config = AppConfig::from_env()?;
    let assistant = StudyAssistant::from_config(&config);
    let registry = ComponentRegistry::standard()?;

    let answer = assistant.respond(&message).await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&answer.response)?);
        return Ok(());
    }

    eprintln!(
        "[{} via {}]",
        answer.response.kind(),
        answer.source.as_str()
    );
    match registry.render(&answer.response) {
        Some(text) => print!("{text}"),
        None => bail!("no component registered for {}", answer.response.kind()),
    }

    Ok(())
}
