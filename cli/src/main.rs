mod bump;
mod commands;

use cmdplan_dispatch::{AppConfig, Application, Error, Outcome};

/// Environment variable naming an optional YAML configuration file.
const CONFIG_ENV: &str = "CICD_CONFIG";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = application().and_then(|app| app.run(&args));
    match result {
        Ok(Outcome::Help(page)) => print!("{page}"),
        Ok(Outcome::Completed) => {}
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn application() -> Result<Application, Error> {
    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    Ok(Application::new(commands::root()?).with_config(config))
}
