use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use venuefilter::executor::{QueryExecutor, QueueContext};
use venuefilter::list::{ListView, VenueList};
use venuefilter::mutator::BulkMutator;
use venuefilter::persist::{SqliteStore, Store};
use venuefilter::record::{Entity, PriceTier, Venue};
use venuefilter::settings::Settings;
use venuefilter::summary::FilterSummary;

struct LogView;
impl ListView for LogView {
    fn reload(&self, venues: &[Venue]) {
        info!(rows = venues.len(), "list reloaded");
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("venuefilter=info")),
        )
        .init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "startup failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> venuefilter::Result<()> {
    let settings = Settings::load()?;
    let store = SqliteStore::open(settings.persistence_mode())?;
    if let Some(seed) = &settings.startup.seed {
        store.import_file(seed)?;
    }
    let store: Arc<dyn Store> = Arc::new(store);
    let catalog = settings.catalog();

    if settings.startup.normalize_favorites {
        BulkMutator::new(Arc::clone(&store)).normalize_favorites()?;
    }

    let executor = Arc::new(QueryExecutor::new(store, Entity::Venue));
    let summary = FilterSummary::load(&executor, &catalog)?;
    for tier in PriceTier::ALL {
        println!("{:>4}  {}", tier.symbol(), summary.tier_label(tier));
    }
    println!("      {}", summary.deals_label());

    let context = Arc::new(QueueContext::new());
    let list = VenueList::new(executor, Arc::new(LogView));
    let outcome = list.load_async(context.clone())?.wait()?;
    context.drain();
    info!(?outcome, "initial fetch finished");
    for (name, tier) in list.rows() {
        println!("{:<40} {}", name, tier);
    }
    Ok(())
}
