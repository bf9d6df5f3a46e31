use clap::{Arg, Command};
use mikan_translate::{
    DiskCache, GoogleTranslateProvider, HtmlDocument, MachineTranslator, MockMode, MockTranslator,
    PageTranslator, PassOutcome, RelayClient,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("mikan-translate")
        .version("0.1.0")
        .about("Translate the text content of an HTML page")
        .arg(
            Arg::new("input")
                .help("HTML file to translate")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("target-locale")
                .help("Target language code (e.g. en, fr, de)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("source-locale")
                .long("source")
                .short('s')
                .help("Source language code of the page (default: ja)")
                .default_value("ja"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write translated HTML here instead of stdout"),
        )
        .arg(
            Arg::new("cache")
                .long("cache")
                .help("Translation cache file")
                .default_value("translation-cache.json"),
        )
        .arg(
            Arg::new("relay")
                .long("relay")
                .help("Translate through a relay endpoint instead of the API directly"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .help("Shared token for the relay endpoint")
                .default_value(""),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use the mock backend instead of a real service")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mikan_translate=info".parse()?),
        )
        .init();

    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let target = matches
        .get_one::<String>("target-locale")
        .expect("target locale is required");
    let source = matches
        .get_one::<String>("source-locale")
        .expect("source locale has a default");
    let cache_path = matches
        .get_one::<String>("cache")
        .expect("cache path has a default");
    let output = matches.get_one::<String>("output");

    let html = std::fs::read_to_string(input)?;
    let document = HtmlDocument::parse(&html);
    let cache = DiskCache::open(cache_path);

    if matches.get_flag("mock") {
        let backend = MockTranslator::new(MockMode::Suffix);
        run(document, cache, backend, source, target, output).await
    } else if let Some(relay) = matches.get_one::<String>("relay") {
        let token = matches
            .get_one::<String>("token")
            .expect("token has a default");
        let backend = RelayClient::new(relay.clone(), token.clone())?;
        run(document, cache, backend, source, target, output).await
    } else {
        let backend = GoogleTranslateProvider::from_env()?;
        run(document, cache, backend, source, target, output).await
    }
}

async fn run<T: MachineTranslator>(
    document: HtmlDocument,
    cache: DiskCache,
    backend: T,
    source: &str,
    target: &str,
    output: Option<&String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut translator =
        PageTranslator::new(document, cache, backend).with_source_locale(source);

    let result = translator.translate_page(target).await;
    match &result {
        Ok(PassOutcome::Reloaded) => {
            info!("target matches the source language, original text restored");
        }
        Ok(PassOutcome::Completed(summary)) => {
            info!(
                scanned = summary.scanned,
                cache_hits = summary.cache_hits,
                requested = summary.requested,
                chunks = summary.chunks,
                "translation finished"
            );
        }
        Err(e) => {
            // Chunks that completed before the failure are kept, so the
            // partially translated page is still written out.
            error!("translation failed: {}", e);
        }
    }

    let rendered = translator.document().render();
    match output {
        Some(path) => std::fs::write(path, rendered)?,
        None => print!("{}", rendered),
    }

    result?;
    Ok(())
}
