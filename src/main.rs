use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use colored::Colorize;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use tokio::time::{sleep, Duration};

use price_compare_ui::config::load_config;
use price_compare_ui::ui::clipboard::{Clipboard, CommandClipboard, MemoryClipboard};
use price_compare_ui::ui::controller::PageController;
use price_compare_ui::ui::form_guard::SubmitOutcome;
use price_compare_ui::ui::Page;
use price_compare_ui::utilities::format_price::PriceFormatter;
use price_compare_ui::utilities::results_reader::{format_rows, read_results};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .context("Failed to initialise logger")?;

    // Load configuration settings
    let config = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", format!("Failed to load configuration: {}", e).red());
            return Err(e.into());
        }
    };
    println!("{} {}", config.base.name.bold(), config.base.version);

    // Build the page model from the search template
    let html = tokio::fs::read_to_string(&config.page.template)
        .await
        .with_context(|| format!("Failed to read page template {}", config.page.template))?;
    let page = Arc::new(Mutex::new(Page::from_html(&html)?));

    let clipboard: Arc<dyn Clipboard> = match &config.clipboard.command {
        Some(program) => Arc::new(CommandClipboard::new(program, config.clipboard.args.clone())),
        None => Arc::new(MemoryClipboard::new()),
    };

    let mut controller = PageController::new(Arc::clone(&page), &config, clipboard);
    controller.ready();

    // Typing settles after the debounce window
    for text in ["w", "wire", "wireless", "wireless mouse"] {
        controller.on_query_input(text);
    }
    sleep(config.search.debounce() + Duration::from_millis(50)).await;
    if let Some(query) = controller.settled_query() {
        println!("Query settled: {}", query.cyan());
    }

    // Submit attempts
    with_page(&page, |page| page.set_query("   "));
    report(controller.submit());

    with_page(&page, |page| {
        page.set_query("wireless mouse");
        page.set_all_platforms(false);
    });
    report(controller.submit());

    with_page(&page, |page| {
        page.set_platform_checked("amazon", true);
    });
    report(controller.submit());
    with_page(&page, |page| {
        let button = page.submit_button();
        println!("Submit button: \"{}\" disabled={}", button.label, button.disabled);
    });

    // Exported results, prices normalised for display
    let formatter = PriceFormatter::new(config.price.currency.clone());
    let mut first_price = None;
    if let Some(source) = config.results.source_data.as_deref() {
        if Path::new(source).exists() {
            let rows = read_results(source).await?;
            for (row, price) in format_rows(&rows, &formatter) {
                println!("{:<8} {:<24} {}", row.platform, row.title, price.green());
                if first_price.is_none() && price != "N/A" {
                    first_price = Some(price);
                }
            }
        } else {
            log::warn!("Results file {} not found, skipping", source);
        }
    }

    if let Some(price) = first_price {
        controller
            .copy_to_clipboard(price)
            .await
            .context("Clipboard task panicked")?;
    }

    with_page(&page, |page| {
        for toast in page.toasts() {
            println!(
                "[{}] {} {}",
                toast.notification.created_at.format("%H:%M:%S"),
                toast.notification.severity.to_string().yellow(),
                toast.notification.message
            );
        }
    });

    // Let every toast run out
    sleep(controller.notifier().total_lifetime()).await;
    with_page(&page, |page| {
        println!("Toasts left on page: {}", page.toasts().len());
    });

    Ok(())
}

fn with_page<T>(page: &Mutex<Page>, f: impl FnOnce(&mut Page) -> T) -> T {
    let mut page = page.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    f(&mut page)
}

fn report(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Proceed => println!("{}", "Search submitted".green()),
        SubmitOutcome::Blocked(reason) => println!("{} {}", "Search blocked:".red(), reason),
    }
}
