pub mod availability;
pub mod context;
pub mod ledger;
pub mod reporting;
pub mod slot_grid;
pub mod store;
pub mod supabase_store;

pub use availability::AvailabilityResolver;
pub use context::AppointmentContext;
pub use ledger::BookingLedger;
pub use reporting::ReportingService;
pub use slot_grid::{BusinessHours, OpenInterval, SlotGrid, SlotGridError};
pub use store::{with_storage_timeout, BookingStore, InMemoryBookingStore};
pub use supabase_store::SupabaseBookingStore;
