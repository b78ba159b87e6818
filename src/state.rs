use std::sync::Arc;
use crate::domain::ports::{BookingRepository, MovieRepository, TheatreRepository};
use crate::domain::services::{ledger::BookingLedger, reports::BookingQueryService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub movie_repo: Arc<dyn MovieRepository>,
    pub theatre_repo: Arc<dyn TheatreRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub ledger: Arc<BookingLedger>,
    pub reports: Arc<BookingQueryService>,
}

impl AppState {
    pub fn new(
        config: Config,
        movie_repo: Arc<dyn MovieRepository>,
        theatre_repo: Arc<dyn TheatreRepository>,
        booking_repo: Arc<dyn BookingRepository>,
    ) -> Self {
        let ledger = Arc::new(BookingLedger::new(theatre_repo.clone(), booking_repo.clone()));
        let reports = Arc::new(BookingQueryService::new(booking_repo.clone()));

        Self {
            config,
            movie_repo,
            theatre_repo,
            booking_repo,
            ledger,
            reports,
        }
    }
}
