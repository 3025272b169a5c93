use chatrunner_core::{lint_css, Classifier, CodeBundle, PreviewConfig};
use chatrunner_preview::{PreviewError, PreviewRenderer, SrcdocFrameHost};
use std::env;
use std::fs;
use std::process;
use std::sync::Arc;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: chat-preview <message-file>...");
        eprintln!();
        eprintln!("Classifies each file as a chat message. Code messages get a");
        eprintln!("<file>.preview.html host page with the sandboxed preview.");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  chat-preview counter.md");
        eprintln!("  chat-preview messages/*.txt");
        process::exit(1);
    }

    let config = PreviewConfig::default();
    let host = match SrcdocFrameHost::new(&config) {
        Ok(host) => Arc::new(host),
        Err(e) => {
            eprintln!("✗ invalid preview configuration: {}", e);
            process::exit(1);
        }
    };
    let mut classifier = Classifier::new();
    let mut exit_code = 0;

    for file_path in &args[1..] {
        let content = match fs::read_to_string(file_path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("✗ {}: failed to read file: {}", file_path, e);
                exit_code = 1;
                continue;
            }
        };

        let Some(bundle) = classifier.classify(&content) else {
            println!("· {} is plain text", file_path);
            continue;
        };

        print_bundle(file_path, &bundle);
        let out_path = format!("{}.preview.html", file_path);
        match write_preview(&host, &config, &bundle, &out_path) {
            Ok(()) => println!("  → {}", out_path),
            Err(e) => {
                eprintln!("✗ {}: {}", file_path, e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn print_bundle(file_path: &str, bundle: &CodeBundle) {
    println!(
        "✓ {} is code (html {} chars, css {} chars, js {} chars)",
        file_path,
        bundle.markup().chars().count(),
        bundle.style().chars().count(),
        bundle.script().chars().count()
    );
    for issue in lint_css(bundle.style()) {
        println!("  ! css {}", issue);
    }
}

fn write_preview(
    host: &Arc<SrcdocFrameHost>,
    config: &PreviewConfig,
    bundle: &CodeBundle,
    out_path: &str,
) -> Result<(), PreviewError> {
    let mut renderer = PreviewRenderer::new(host.clone(), config.clone());
    let handle = renderer.render(bundle)?.handle();
    let page = host.host_page(handle)?;
    fs::write(out_path, page)
        .map_err(|e| PreviewError::Assembly(format!("Failed to write {}: {}", out_path, e)))
}
