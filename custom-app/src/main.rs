use std::fs::{self, File};
use std::sync::Arc;

use custom_app::{App, AppConfig, DirLoader, Translator};
use custom_elements::runtime::read_commands;
use custom_elements::Runtime;
use shadowdom::Document;
use simplelog::{Config, WriteLogger};
use tokio::io::BufReader;
use tokio::sync::mpsc;

fn init_logging(config: &AppConfig) {
    let Some(path) = &config.log_file else {
        return;
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).expect("Failed to create log directory");
    }
    let log_file = File::create(path).expect("Failed to create log file");
    WriteLogger::init(config.log_level, Config::default(), log_file)
        .expect("Failed to initialize logger");
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    init_logging(&config);
    log::info!("custom-app starting with {:?}", config);

    let document = Document::new();
    let translator = Arc::new(Translator::new(DirLoader::new(&config.lang_dir)));
    let app = App::new(&document, translator);

    if let Err(e) = app.load(&config.default_lang).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    document.mount(Arc::new(app.clone()));

    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(async move {
        if let Err(e) = read_commands(BufReader::new(tokio::io::stdin()), tx).await {
            log::error!("failed to read commands: {}", e);
        }
    });

    // Unmounting on exit disconnects the app, which releases its listener.
    let result = Runtime::new(document).run(rx, std::io::stdout()).await;
    log::info!("custom-app exiting");

    // The stdin reader may still be blocked on a read; exit without
    // waiting for it.
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
